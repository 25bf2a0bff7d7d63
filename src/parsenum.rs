//! Strict, range-checked decimal parsing over an explicit byte span.
//!
//! Unlike `str::parse`, these functions never require the whole input to be
//! a number: they consume an optional sign and as many digits as possible,
//! then report how many bytes were consumed so that a tokenizer can resume
//! right after the literal.
//!
//! Outcomes are reported through [`ParsedNum::error`]:
//!
//! - `None`: the whole span was a number.
//! - [`NumError::NonDigit`]: parsing stopped at a non-digit byte. The partial
//!   value is still returned; whether this is fatal is up to the caller.
//! - [`NumError::NoDigit`]: not a single digit was found.
//! - [`NumError::TooLarge`] / [`NumError::TooSmall`]: the value does not fit;
//!   it saturates to the type's maximum/minimum. Remaining digits are still
//!   consumed.
//!
//! A leading `-` is accepted for unsigned targets as well and negates the
//! result with wraparound, e.g. `parse_u32(b"-1")` yields `u32::MAX`.

use thiserror::Error;

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum NumError {
    #[error("no digit found")]
    NoDigit,
    #[error("non-digit character found")]
    NonDigit,
    #[error("number too large")]
    TooLarge,
    #[error("number too small")]
    TooSmall,
}

/// Result of parsing a number from the front of a span.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ParsedNum<T> {
    pub value: T,
    /// Number of bytes consumed, sign included.
    pub consumed: usize,
    pub error: Option<NumError>,
}

impl<T> ParsedNum<T> {
    /// Whether the value is usable: either clean, or cut short by a non-digit.
    pub fn is_number(&self) -> bool {
        matches!(self.error, None | Some(NumError::NonDigit))
    }
}

/// Consume an optional sign, returning `(negative, position after it)`.
fn sign(input: &[u8]) -> (bool, usize) {
    match input.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    }
}

macro_rules! parse_unsigned {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(input: &[u8]) -> ParsedNum<$ty> {
            let (negative, mut pos) = sign(input);
            let cutoff = <$ty>::MAX / 10;
            let cutlim = (<$ty>::MAX % 10) as u8;
            let mut acc: $ty = 0;
            let mut any = false;
            let mut overflow = false;
            let mut error = None;

            while pos < input.len() {
                let c = input[pos];
                if !c.is_ascii_digit() {
                    error = Some(NumError::NonDigit);
                    break;
                }
                let d = c - b'0';
                if overflow || acc > cutoff || (acc == cutoff && d > cutlim) {
                    overflow = true;
                } else {
                    any = true;
                    acc = acc * 10 + d as $ty;
                }
                pos += 1;
            }

            if overflow {
                return ParsedNum { value: <$ty>::MAX, consumed: pos, error: Some(NumError::TooLarge) };
            }
            if !any && error.is_none() {
                error = Some(NumError::NoDigit);
            }
            let value = if negative { acc.wrapping_neg() } else { acc };
            ParsedNum { value, consumed: pos, error }
        }
    };
}

macro_rules! parse_signed {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $uty:ty) => {
        $(#[$meta])*
        pub fn $name(input: &[u8]) -> ParsedNum<$ty> {
            let (negative, mut pos) = sign(input);
            // |MIN| = MAX + 1
            let limit = <$ty>::MAX as $uty + negative as $uty;
            let cutoff = limit / 10;
            let cutlim = (limit % 10) as u8;
            let mut acc: $uty = 0;
            let mut any = false;
            let mut overflow = false;
            let mut error = None;

            while pos < input.len() {
                let c = input[pos];
                if !c.is_ascii_digit() {
                    error = Some(NumError::NonDigit);
                    break;
                }
                let d = c - b'0';
                if overflow || acc > cutoff || (acc == cutoff && d > cutlim) {
                    overflow = true;
                } else {
                    any = true;
                    acc = acc * 10 + d as $uty;
                }
                pos += 1;
            }

            if overflow {
                return if negative {
                    ParsedNum { value: <$ty>::MIN, consumed: pos, error: Some(NumError::TooSmall) }
                } else {
                    ParsedNum { value: <$ty>::MAX, consumed: pos, error: Some(NumError::TooLarge) }
                };
            }
            if !any && error.is_none() {
                error = Some(NumError::NoDigit);
            }
            let value = if negative { (acc as $ty).wrapping_neg() } else { acc as $ty };
            ParsedNum { value, consumed: pos, error }
        }
    };
}

parse_unsigned!(
    /// Parse a `u32` from the front of `input`.
    parse_u32, u32
);
parse_unsigned!(
    /// Parse a `u64` from the front of `input`.
    parse_u64, u64
);
parse_signed!(
    /// Parse an `i32` from the front of `input`.
    parse_i32, i32, u32
);
parse_signed!(
    /// Parse an `i64` from the front of `input`.
    parse_i64, i64, u64
);
