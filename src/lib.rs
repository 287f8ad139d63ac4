//! Geohash codec and a concurrent, time-aware in-memory spatial index.
//!
//! ```rust
//! use geomem::prelude::*;
//!
//! let hash = encode_hash(38.89710201881826, -77.03669792041183, 12)?;
//! assert_eq!(hash, "dqcjqcp84c6e");
//!
//! let coverage = cover_bounding_box(-5.0, 100.0, -45.0, 170.0, 1)?;
//! assert_eq!(coverage.len(), 2);
//!
//! let index: Geomem<&str> = Geomem::new();
//! index.add(-15.0, 120.0, 500, "A1", None)?;
//! assert_eq!(index.find(-5.0, 100.0, -45.0, 170.0, 0, 1000)?.count(), 1);
//! # Ok::<(), geomem::GeomemError>(())
//! ```

pub mod compute;
pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::{Find, Geomem, Info};
pub use error::{GeomemError, Result};

pub use compute::coverage::{
    Coverage, DEFAULT_MAX_HASHES, PackedCoverage, cover_bounding_box, cover_bounding_box_auto,
    cover_bounding_box_max_hashes,
};
pub use compute::geohash::{
    Direction, MAX_HASH_LENGTH, PackedHash, adjacent_hash, decode_hash, encode_hash,
    encode_hash_to_long, hash_length_to_cover_bounding_box, height_degrees, neighbours,
    width_degrees,
};

pub use geomem_types::bbox::BoundingBox;
pub use geomem_types::point::{LatLong, longitude_diff, to180};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, Find, Geomem, GeomemError, Info, Result};

    pub use crate::{BoundingBox, LatLong};

    pub use crate::{Coverage, cover_bounding_box, cover_bounding_box_auto, cover_bounding_box_max_hashes};

    pub use crate::{Direction, adjacent_hash, decode_hash, encode_hash, neighbours};
}
