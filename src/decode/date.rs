//! Oracle DATE decoder.
//!
//! Oracle DATE is a 7-byte biased encoding: century and year are stored
//! `+100`, hour/minute/second are stored `+1`. Unlike a general-purpose
//! driver, a forensic dump must still render a DATE whose bytes decode to
//! an out-of-range or nonsensical calendar value (corrupted blocks are the
//! whole point of the tool), so no calendar validation is performed here.

use crate::error::{Error, Result};

/// Decode a 7-byte Oracle DATE into `"CCYY-MM-DD:hh:mm:ss"`.
///
/// Century/year are rendered with the same two-digit width even when
/// `byte0`/`byte1` dip below 100 and produce a negative field; no
/// calendar validation is performed.
pub fn decode_date(bytes: &[u8]) -> Result<String> {
    if bytes.len() < 7 {
        return Err(Error::decode(format!(
            "DATE requires 7 bytes, got {}",
            bytes.len()
        )));
    }

    let century = bytes[0] as i32 - 100;
    let year = bytes[1] as i32 - 100;
    let month = bytes[2];
    let day = bytes[3];
    let hour = bytes[4] as i32 - 1;
    let minute = bytes[5] as i32 - 1;
    let second = bytes[6] as i32 - 1;

    Ok(format!(
        "{century:02}{year:02}-{month:02}-{day:02}:{hour:02}:{minute:02}:{second:02}"
    ))
}
