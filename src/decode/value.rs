//! Hex-string-facing decoded value, mirroring the legacy tool's per-column
//! `OracleType(hex, type_tag)` constructor.

use super::{char::decode_char, date::decode_date, number::decode_number};
use crate::error::{Error, Result};

/// A decoded column value together with the raw hex it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleType {
    /// Printable decoded value.
    pub value_string: String,
    /// The raw hex this value was decoded from, kept for side-by-side display.
    pub raw_hex: String,
}

impl OracleType {
    /// Decode a hex-encoded column value given its type tag (`'t'` DATE,
    /// `'n'` NUMBER, `'c'` CHAR with no characterset).
    pub fn new(hex_string: &str, type_tag: char) -> Result<Self> {
        Self::with_charset(hex_string, type_tag, None)
    }

    /// As [`OracleType::new`], but CHAR decoding uses `charset` if given.
    pub fn with_charset(hex_string: &str, type_tag: char, charset: Option<&str>) -> Result<Self> {
        let bytes = hex::decode(hex_string)
            .map_err(|e| Error::decode(format!("malformed hex {hex_string:?}: {e}")))?;

        let value_string = match type_tag {
            't' => decode_date(&bytes)?,
            'n' => decode_number(&bytes)?,
            'c' => decode_char(&bytes, charset)?,
            other => return Err(Error::decode(format!("unknown type tag: {other:?}"))),
        };

        Ok(Self {
            value_string,
            raw_hex: hex_string.to_string(),
        })
    }
}
