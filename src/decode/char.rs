//! CHAR/VARCHAR decoder.
//!
//! Oracle stores character columns as raw bytes in whatever database
//! characterset was active when the row was written. Without knowing that
//! characterset the core can only hand back the raw bytes; callers that
//! know the characterset may decode them with it.

use crate::error::{Error, Result};

/// Decode raw CHAR/VARCHAR bytes.
///
/// With no `charset`, the bytes are returned verbatim (lossy UTF-8, so a
/// corrupted or foreign-encoded column never panics the dump). With
/// `charset`, only `"UTF-8"`/`"US7ASCII"`/`"WE8ISO8859P1"` are understood
/// (the legacy tool never named a specific registry either); anything
/// else is a decode error rather than a silent misread.
pub fn decode_char(bytes: &[u8], charset: Option<&str>) -> Result<String> {
    match charset {
        None => Ok(String::from_utf8_lossy(bytes).into_owned()),
        Some("UTF-8") | Some("US7ASCII") => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::decode(format!("invalid UTF-8 for charset {charset:?}: {e}"))),
        Some("WE8ISO8859P1") => Ok(bytes.iter().map(|&b| b as char).collect()),
        Some(other) => Err(Error::decode(format!("unsupported characterset: {other}"))),
    }
}
