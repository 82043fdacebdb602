//! Oracle NUMBER decoder.
//!
//! Oracle's NUMBER wire/disk format is a base-100 mantissa/exponent
//! encoding: a single exponent byte followed by one base-100 "digit" per
//! remaining byte, with a distinct bias for positive and negative values
//! and a sentinel terminator (`0x66`) closing negative mantissas.
//!
//! Fixed-width floating point loses precision on the tail of a 38-digit
//! mantissa, so the final `mantissa * 10^exp_pot` multiply is done in
//! arbitrary-precision decimal arithmetic.

use crate::error::{Error, Result};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::str::FromStr;

/// Decode raw Oracle NUMBER bytes into their printable decimal string.
pub fn decode_number(bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        return Err(Error::decode("NUMBER requires at least one byte"));
    }

    if bytes.len() == 1 && bytes[0] == 0x80 {
        return Ok("0".to_string());
    }

    let negative = *bytes.last().unwrap() == 102;
    let mantissa_end = if negative { bytes.len() - 1 } else { bytes.len() };

    if mantissa_end < 1 {
        return Err(Error::decode("NUMBER mantissa is empty"));
    }

    let byte0 = bytes[0] as i64;
    let mut digits = String::new();
    let exp_pot = if !negative {
        for &b in &bytes[1..mantissa_end] {
            digits.push_str(&format!("{:02}", b.wrapping_sub(1)));
        }
        (byte0 - 193) * 2 + 2
    } else {
        for &b in &bytes[1..mantissa_end] {
            digits.push_str(&format!("{:02}", 101u8.wrapping_sub(b)));
        }
        (62 - byte0) * 2 + 2
    };

    if digits.is_empty() {
        return Ok("0".to_string());
    }

    let formed = if negative {
        format!("-0.{digits}")
    } else {
        format!("0.{digits}")
    };

    let mantissa = BigDecimal::from_str(&formed)
        .map_err(|e| Error::decode(format!("malformed NUMBER mantissa {formed:?}: {e}")))?;
    let (int_val, scale) = mantissa.as_bigint_and_exponent();
    let shifted_scale = scale - exp_pot;

    Ok(fixed_point_string(int_val, shifted_scale))
}

/// Render `int_val * 10^-scale` as a fixed-point string, stripping
/// trailing fractional zeros and a bare trailing decimal point.
fn fixed_point_string(int_val: BigInt, scale: i64) -> String {
    let negative = int_val < BigInt::from(0);
    let digits = if negative {
        (-&int_val).to_string()
    } else {
        int_val.to_string()
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if scale <= 0 {
        out.push_str(&digits);
        out.push_str(&"0".repeat((-scale) as usize));
    } else {
        let scale = scale as usize;
        if digits.len() > scale {
            let split_at = digits.len() - scale;
            out.push_str(&digits[..split_at]);
            push_fraction(&mut out, &digits[split_at..]);
        } else {
            out.push('0');
            let padded = format!("{}{}", "0".repeat(scale - digits.len()), digits);
            push_fraction(&mut out, &padded);
        }
    }

    if out.is_empty() || out == "-" {
        return "0".to_string();
    }
    out
}

fn push_fraction(out: &mut String, fraction: &str) {
    let trimmed = fraction.trim_end_matches('0');
    if !trimmed.is_empty() {
        out.push('.');
        out.push_str(trimmed);
    }
}
