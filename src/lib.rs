//! A forensic block editor core for Oracle-format datafiles.
//!
//! Opens raw datafiles, navigates to arbitrary blocks by `(file_id,
//! block_id)`, parses a block's on-disk layout (cache header, transaction
//! header, row directory, row data), decodes individual column values from
//! Oracle's internal binary representations, and supports in-place
//! byte-level modification with checksum recomputation and persistence.
//!
//! # Example
//!
//! ```no_run
//! use rico_block_rs::{ByteSource, Session};
//!
//! # fn main() -> rico_block_rs::Result<()> {
//! let mut session = Session::new(vec!["/data/system01.dbf".to_string()]);
//! session.get_block(1, 42)?;
//! session.set_offset(0);
//! session.set_mode_edit();
//! session.modify(ByteSource::Hex("deadbeef".to_string()))?;
//! session.checksum(true)?;
//! session.save()?;
//! # Ok(())
//! # }
//! ```

pub mod block;
pub mod checksum;
pub mod config;
pub mod decode;
pub mod error;
pub mod io;
pub mod manifest;
pub mod search;
pub mod session;

pub use block::{analyze, BlockDescriptor, ColumnValue, ItlEntry, Kcbh, KdbrEntry, KtbbhPrefix, RowData};
pub use config::SessionConfig;
pub use decode::{decode_char, decode_date, decode_number, OracleType};
pub use error::{Error, Result};
pub use search::{find, find_in_block, FindResult, Match, ObjdHit};
pub use session::{ByteSource, Session};
