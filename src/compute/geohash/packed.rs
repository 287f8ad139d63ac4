//! Packed 64-bit geohash form.
//!
//! The hash bits (5 per symbol, at most 60) are left-justified in the word
//! and the symbol count lives in the low 4 bits:
//!
//! ```text
//!  63                                            4 3    0
//! +-----------------------------------------------+------+
//! | s0 | s1 | s2 | ... | s11                      | len  |
//! +-----------------------------------------------+------+
//! ```
//!
//! Equal-length hashes therefore order the same way as their strings and a
//! prefix is a mask plus a length rewrite.

use crate::compute::base32::{CHARACTERS, char_index};
use crate::compute::geohash::MAX_HASH_LENGTH;
use crate::error::{GeomemError, Result};
use std::fmt;
use std::str::FromStr;

const LENGTH_MASK: u64 = 0xf;
const BITS_PER_SYMBOL: usize = 5;

/// A geohash of 1..=12 symbols packed into a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackedHash(u64);

impl PackedHash {
    /// Wraps raw bits, rejecting lengths outside 1..=12 and stray bits past
    /// the last symbol.
    ///
    /// ```
    /// use geomem::compute::geohash::PackedHash;
    ///
    /// let dr = PackedHash::from_bits(0x65c0000000000002).unwrap();
    /// assert_eq!(dr.to_string(), "dr");
    /// assert!(PackedHash::from_bits(0x65c0000000000000).is_err());
    /// ```
    pub fn from_bits(bits: u64) -> Result<Self> {
        let length = (bits & LENGTH_MASK) as usize;
        if length == 0 || length > MAX_HASH_LENGTH {
            return Err(GeomemError::InvalidPackedHash(bits));
        }
        if bits & !(symbol_mask(length) | LENGTH_MASK) != 0 {
            return Err(GeomemError::InvalidPackedHash(bits));
        }
        Ok(Self(bits))
    }

    /// Packs `length` symbols taken from the low bits of `hash_bits`.
    pub(crate) fn from_parts(hash_bits: u64, length: usize) -> Self {
        Self((hash_bits << (64 - BITS_PER_SYMBOL * length)) | length as u64)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Number of symbols, always in 1..=12.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> usize {
        (self.0 & LENGTH_MASK) as usize
    }

    /// Truncates to the first `length` symbols.
    ///
    /// ```
    /// use geomem::compute::geohash::PackedHash;
    ///
    /// let hash: PackedHash = "dqcjqcp84c6e".parse().unwrap();
    /// assert_eq!(hash.prefix(2).unwrap().bits(), 0x65c0000000000002);
    /// ```
    pub fn prefix(self, length: usize) -> Result<Self> {
        if length == 0 || length > self.len() {
            return Err(GeomemError::invalid_argument(format!(
                "prefix length must be in 1..={}, got: {}",
                self.len(),
                length
            )));
        }
        Ok(self.truncate(length))
    }

    /// Every prefix from one symbol up to the full hash, shortest first.
    pub fn prefixes(self) -> impl Iterator<Item = PackedHash> {
        (1..=self.len()).map(move |length| self.truncate(length))
    }

    fn truncate(self, length: usize) -> Self {
        Self((self.0 & symbol_mask(length)) | length as u64)
    }

    fn symbol(self, i: usize) -> u8 {
        ((self.0 >> (64 - BITS_PER_SYMBOL * (i + 1))) & 0x1f) as u8
    }
}

fn symbol_mask(length: usize) -> u64 {
    !0u64 << (64 - BITS_PER_SYMBOL * length)
}

impl fmt::Display for PackedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            write!(f, "{}", CHARACTERS[self.symbol(i) as usize] as char)?;
        }
        Ok(())
    }
}

impl FromStr for PackedHash {
    type Err = GeomemError;

    fn from_str(hash: &str) -> Result<Self> {
        let length = hash.chars().count();
        if length == 0 || length > MAX_HASH_LENGTH {
            return Err(GeomemError::invalid_argument(format!(
                "hash length must be in 1..={}, got: {}",
                MAX_HASH_LENGTH, length
            )));
        }
        let mut bits = 0u64;
        for c in hash.chars() {
            bits = (bits << BITS_PER_SYMBOL) | char_index(c)? as u64;
        }
        Ok(Self::from_parts(bits, length))
    }
}

impl From<PackedHash> for u64 {
    fn from(hash: PackedHash) -> Self {
        hash.0
    }
}

impl TryFrom<u64> for PackedHash {
    type Error = GeomemError;

    fn try_from(bits: u64) -> Result<Self> {
        Self::from_bits(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let hash: PackedHash = "dr".parse().unwrap();
        assert_eq!(hash.bits(), 0x65c0000000000002);
        assert_eq!(hash.len(), 2);
        assert_eq!(hash.to_string(), "dr");

        let full: PackedHash = "dqcjqcp84c6e".parse().unwrap();
        assert_eq!(full.len(), 12);
        assert_eq!(full.to_string(), "dqcjqcp84c6e");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<PackedHash>().is_err());
        assert!("0123456789bcd".parse::<PackedHash>().is_err());
        assert_eq!(
            "dra".parse::<PackedHash>(),
            Err(GeomemError::InvalidCharacter('a'))
        );
    }

    #[test]
    fn test_from_bits_validation() {
        assert!(PackedHash::from_bits(0x65c0000000000002).is_ok());
        // length 0 and 13
        assert!(PackedHash::from_bits(0x65c0000000000000).is_err());
        assert!(PackedHash::from_bits(0x65c000000000000d).is_err());
        // bits set beyond the second symbol
        assert!(PackedHash::from_bits(0x65e0000000000002).is_err());
    }

    #[test]
    fn test_prefixes() {
        let hash: PackedHash = "dqcjqcp84c6e".parse().unwrap();
        let prefixes: Vec<String> = hash.prefixes().map(|p| p.to_string()).collect();
        assert_eq!(prefixes.len(), 12);
        assert_eq!(prefixes[0], "d");
        assert_eq!(prefixes[5], "dqcjqc");
        assert_eq!(prefixes[11], "dqcjqcp84c6e");

        assert_eq!(hash.prefix(3).unwrap().to_string(), "dqc");
        assert!(hash.prefix(0).is_err());
        assert!(hash.prefix(3).unwrap().prefix(4).is_err());
    }

    #[test]
    fn test_ordering_matches_strings() {
        let mut hashes: Vec<PackedHash> = ["dr7", "0zz", "drs", "zzz", "dre", "drk"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        hashes.sort();
        let sorted: Vec<String> = hashes.iter().map(|h| h.to_string()).collect();
        assert_eq!(sorted, vec!["0zz", "dr7", "dre", "drk", "drs", "zzz"]);
    }

    #[test]
    fn test_same_bits_different_length_are_distinct() {
        let short: PackedHash = "0".parse().unwrap();
        let long: PackedHash = "00".parse().unwrap();
        assert_ne!(short, long);
        assert_eq!(long.prefix(1).unwrap(), short);
    }
}
