//! # geomem-types
//!
//! Coordinate types shared by the geomem geohash codec and index.
//!
//! - **Point types**: `LatLong`, plus the `to180` / `longitude_diff`
//!   longitude normalization helpers
//! - **Bounding box types**: `BoundingBox`, described by its north-west and
//!   south-east corners the way geohash coverage queries are phrased
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geomem_types::bbox::BoundingBox;
//! use geomem_types::point::LatLong;
//!
//! let white_house = LatLong::new(38.8971, -77.0366);
//! let dc = BoundingBox::new(39.0, -77.2, 38.8, -76.9);
//! assert!(dc.contains(white_house.lat(), white_house.lon()));
//! ```

pub mod bbox;
pub mod point;
