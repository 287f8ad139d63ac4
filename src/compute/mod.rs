//! Pure geometry for the index.
//!
//! This module holds everything that does not touch shared state:
//! - the signed base32 codec over the geohash alphabet
//! - geohash encoding, decoding, cell sizes and adjacency
//! - bounding box coverage
//! - argument validation

pub mod base32;
pub mod coverage;
pub mod geohash;
pub mod validation;
