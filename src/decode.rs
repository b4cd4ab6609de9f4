//! Radix decoding of share coordinates.
//!
//! y-values arrive as digit strings in any base between 2 and 36 using the
//! `0-9a-z` alphabet (letters are case-insensitive). x-values are plain decimal.

use num_bigint::{BigInt, BigUint, Sign};
use thiserror::Error;

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("base {0} is outside the supported range 2..=36")]
    InvalidBase(u32),
    #[error("base {0:?} is not a decimal integer")]
    MalformedBase(String),
    #[error("invalid digit {digit:?} at position {position} for base {base}")]
    InvalidDigit {
        digit: char,
        position: usize,
        base: u32,
    },
    #[error("digit string is empty")]
    Empty,
}

fn check_base(base: u32) -> Result<(), DecodeError> {
    if (MIN_BASE..=MAX_BASE).contains(&base) {
        Ok(())
    } else {
        Err(DecodeError::InvalidBase(base))
    }
}

/// Decodes `digits` written in `base` into an arbitrary-precision integer.
///
/// A single leading `+` or `-` is honoured. Leading zeros are kept as part of
/// the digit string and do not change the value.
pub fn decode(digits: &str, base: u32) -> Result<BigInt, DecodeError> {
    check_base(base)?;

    let (sign, body, offset) = match digits.as_bytes().first() {
        Some(b'-') => (Sign::Minus, &digits[1..], 1),
        Some(b'+') => (Sign::Plus, &digits[1..], 1),
        _ => (Sign::Plus, digits, 0),
    };
    if body.is_empty() {
        return Err(DecodeError::Empty);
    }

    let values = body
        .chars()
        .enumerate()
        .map(|(i, c)| {
            c.to_digit(base)
                .map(|d| d as u8)
                .ok_or(DecodeError::InvalidDigit {
                    digit: c,
                    position: i + offset,
                    base,
                })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let magnitude =
        BigUint::from_radix_be(&values, base).ok_or(DecodeError::InvalidBase(base))?;
    Ok(BigInt::from_biguint(sign, magnitude))
}

/// Decodes a decimal x-coordinate.
pub fn decode_abscissa(x: &str) -> Result<BigInt, DecodeError> {
    decode(x.trim(), 10)
}

/// Parses the decimal base carried next to an encoded value and checks its range.
pub fn parse_base(base: &str) -> Result<u32, DecodeError> {
    let parsed = base
        .trim()
        .parse::<u32>()
        .map_err(|_| DecodeError::MalformedBase(base.to_string()))?;
    check_base(parsed)?;
    Ok(parsed)
}

/// Renders `value` in `base` with lowercase letters, the inverse of [`decode`]
/// up to leading zeros.
pub fn encode(value: &BigInt, base: u32) -> Result<String, DecodeError> {
    check_base(base)?;
    Ok(value.to_str_radix(base))
}
