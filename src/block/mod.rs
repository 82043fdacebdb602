//! Block structure: header readers (C2) and the block analyzer (C3).

pub mod analyzer;
pub mod header;
pub mod row;

pub use analyzer::{analyze, BlockDescriptor};
pub use header::{ItlEntry, Kcbh, KtbbhPrefix};
pub use row::{ColumnValue, KdbrEntry, RowData, NULL_SENTINEL};
