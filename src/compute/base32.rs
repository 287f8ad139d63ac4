//! Signed base32 codec over the geohash alphabet.
//!
//! Digits are emitted most significant first. Negative values carry a
//! leading `-`; the magnitude is accumulated as a negative number so that
//! `i64::MIN` round-trips.

use crate::error::{GeomemError, Result};

/// The 32 geohash symbols in digit order.
pub const CHARACTERS: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Width in symbols of a full-length hash.
pub const MAX_LENGTH: usize = 12;

const INVALID: u8 = u8::MAX;

const CHARACTER_INDEX: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < CHARACTERS.len() {
        table[CHARACTERS[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Returns the digit value of a base32 symbol.
///
/// # Examples
///
/// ```
/// use geomem::compute::base32::char_index;
///
/// assert_eq!(char_index('0').unwrap(), 0);
/// assert_eq!(char_index('z').unwrap(), 31);
/// assert!(char_index('a').is_err());
/// ```
pub fn char_index(c: char) -> Result<usize> {
    let index = if c.is_ascii() {
        CHARACTER_INDEX[c as usize]
    } else {
        INVALID
    };
    if index == INVALID {
        return Err(GeomemError::InvalidCharacter(c));
    }
    Ok(index as usize)
}

/// Encodes `i` in base32, left-padded with `'0'` to at least `length`
/// digits. The sign, if any, is not counted in `length`.
///
/// ```
/// use geomem::compute::base32::encode_base32;
///
/// assert_eq!(encode_base32(1234567, 5).unwrap(), "15pn7");
/// assert_eq!(encode_base32(-123, 2).unwrap(), "-3v");
/// assert_eq!(encode_base32(0, 1).unwrap(), "0");
/// ```
pub fn encode_base32(i: i64, length: usize) -> Result<String> {
    if length < 1 {
        return Err(GeomemError::invalid_argument(
            "base32 length must be greater than zero",
        ));
    }

    let negative = i < 0;
    let mut n = if negative { i } else { -i };
    let mut digits = Vec::with_capacity(MAX_LENGTH + 1);
    while n <= -32 {
        digits.push(CHARACTERS[-(n % 32) as usize]);
        n /= 32;
    }
    digits.push(CHARACTERS[-n as usize]);
    digits.reverse();

    let digits: String = digits.into_iter().map(char::from).collect();
    let padded = pad_left_with_zeros(&digits, length);
    if negative {
        Ok(format!("-{}", padded))
    } else {
        Ok(padded)
    }
}

/// Encodes `i` padded to the full hash width of 12 symbols.
pub fn encode_base32_max_length(i: i64) -> String {
    // MAX_LENGTH is non-zero, so encoding cannot fail
    encode_base32(i, MAX_LENGTH).unwrap_or_default()
}

/// Decodes a base32 string produced by [`encode_base32`].
///
/// ```
/// use geomem::compute::base32::decode_base32;
///
/// assert_eq!(decode_base32("15pn7").unwrap(), 1234567);
/// assert_eq!(decode_base32("-3v").unwrap(), -123);
/// assert!(decode_base32("15pa7").is_err());
/// ```
pub fn decode_base32(s: &str) -> Result<i64> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if digits.is_empty() {
        return Err(GeomemError::invalid_argument(format!(
            "no base32 digits in {:?}",
            s
        )));
    }

    let mut acc: i64 = 0;
    for c in digits.chars() {
        let digit = char_index(c)? as i64;
        acc = acc
            .checked_mul(32)
            .and_then(|v| v.checked_sub(digit))
            .ok_or_else(|| overflow(s))?;
    }

    if negative {
        Ok(acc)
    } else {
        acc.checked_neg().ok_or_else(|| overflow(s))
    }
}

fn overflow(s: &str) -> GeomemError {
    GeomemError::invalid_argument(format!("base32 value {:?} overflows i64", s))
}

/// Left-pads `s` with `'0'` to `length` characters. Longer input is
/// returned unchanged.
pub fn pad_left_with_zeros(s: &str, length: usize) -> String {
    format!("{:0>width$}", s, width = length)
}
