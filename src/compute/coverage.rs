//! Covering bounding boxes with geohash cells.
//!
//! A box is tiled by sampling a grid of points one cell apart starting at
//! its south-west corner, then sampling the east column, the north row and
//! the north-east corner explicitly so that floating point drift in the
//! stride never drops the last row or column. Cells are collected in packed
//! form and converted to strings only at the edge of the API.

use crate::compute::geohash::{
    MAX_HASH_LENGTH, PackedHash, encode_packed, hash_length_to_cover_bounding_box,
    height_degrees, width_degrees,
};
use crate::compute::validation::{validate_bounding_box, validate_hash_length};
use crate::error::{GeomemError, Result};
use geomem_types::bbox::BoundingBox;
use geomem_types::point::to180;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;

/// Cap on covering cells used when no other is given.
pub const DEFAULT_MAX_HASHES: usize = 12;

/// Above this many cells [`CellSet`] switches from scanning to hashing.
const LINEAR_SCAN_LIMIT: usize = 256;

/// Same-length cells jointly covering a box, with the ratio of their total
/// area to the area of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    hashes: BTreeSet<String>,
    ratio: f64,
}

impl Coverage {
    pub fn hashes(&self) -> &BTreeSet<String> {
        &self.hashes
    }

    pub fn into_hashes(self) -> BTreeSet<String> {
        self.hashes
    }

    /// Cell area over box area. At least 1 for a real box; infinite when the
    /// box has no area.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Length of the covering hashes, 0 when there are none.
    pub fn hash_length(&self) -> usize {
        self.hashes.iter().next().map_or(0, |hash| hash.len())
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coverage [hashes={:?}, ratio={}]", self.hashes, self.ratio)
    }
}

/// [`Coverage`] in packed form, cells in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedCoverage {
    hashes: Vec<PackedHash>,
    ratio: f64,
}

impl PackedCoverage {
    pub fn hashes(&self) -> &[PackedHash] {
        &self.hashes
    }

    pub fn into_hashes(self) -> Vec<PackedHash> {
        self.hashes
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn hash_length(&self) -> usize {
        self.hashes.first().map_or(0, |hash| hash.len())
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl From<PackedCoverage> for Coverage {
    fn from(packed: PackedCoverage) -> Self {
        Coverage {
            hashes: packed.hashes.iter().map(PackedHash::to_string).collect(),
            ratio: packed.ratio,
        }
    }
}

/// Deduplicating collection of cells in insertion order.
struct CellSet {
    cells: SmallVec<[PackedHash; 16]>,
    index: Option<FxHashSet<PackedHash>>,
}

impl CellSet {
    fn new() -> Self {
        Self {
            cells: SmallVec::new(),
            index: None,
        }
    }

    fn insert(&mut self, hash: PackedHash) {
        match &mut self.index {
            Some(index) => {
                if index.insert(hash) {
                    self.cells.push(hash);
                }
            }
            None => {
                if !self.cells.contains(&hash) {
                    self.cells.push(hash);
                    if self.cells.len() > LINEAR_SCAN_LIMIT {
                        self.index = Some(self.cells.iter().copied().collect());
                    }
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn into_sorted(self) -> Vec<PackedHash> {
        let mut cells = self.cells.into_vec();
        cells.sort_unstable();
        cells
    }
}

/// Covers a box with cells of `length` symbols.
///
/// ```
/// use geomem::compute::coverage::cover_bounding_box;
///
/// let coverage = cover_bounding_box(-5.0, 100.0, -45.0, 170.0, 1)?;
/// assert_eq!(coverage.hashes().iter().collect::<Vec<_>>(), ["q", "r"]);
/// # Ok::<(), geomem::GeomemError>(())
/// ```
pub fn cover_bounding_box(
    top_left_lat: f64,
    top_left_lon: f64,
    bottom_right_lat: f64,
    bottom_right_lon: f64,
    length: usize,
) -> Result<Coverage> {
    let bbox = BoundingBox::new(top_left_lat, top_left_lon, bottom_right_lat, bottom_right_lon);
    Ok(cover_packed(&bbox, length)?.into())
}

/// Covers a box at the finest length that needs no more than
/// [`DEFAULT_MAX_HASHES`] cells, or at the coarsest useful length when even
/// that needs more.
pub fn cover_bounding_box_auto(
    top_left_lat: f64,
    top_left_lon: f64,
    bottom_right_lat: f64,
    bottom_right_lon: f64,
) -> Result<Coverage> {
    let bbox = BoundingBox::new(top_left_lat, top_left_lon, bottom_right_lat, bottom_right_lon);
    Ok(cover_packed_auto(&bbox, DEFAULT_MAX_HASHES)?.into())
}

/// Covers a box at the finest length that needs no more than `max_hashes`
/// cells. `None` when the coarsest useful length already needs more.
///
/// ```
/// use geomem::compute::coverage::cover_bounding_box_max_hashes;
///
/// let coverage = cover_bounding_box_max_hashes(42.819581, -73.950691, 41.842967, -72.727175, 12)?
///     .expect("fits in twelve cells");
/// assert_eq!(coverage.hash_length(), 3);
/// assert_eq!(coverage.len(), 4);
/// # Ok::<(), geomem::GeomemError>(())
/// ```
pub fn cover_bounding_box_max_hashes(
    top_left_lat: f64,
    top_left_lon: f64,
    bottom_right_lat: f64,
    bottom_right_lon: f64,
    max_hashes: usize,
) -> Result<Option<Coverage>> {
    let bbox = BoundingBox::new(top_left_lat, top_left_lon, bottom_right_lat, bottom_right_lon);
    Ok(cover_packed_max_hashes(&bbox, max_hashes)?.map(Coverage::from))
}

/// Packed form of [`cover_bounding_box`].
pub fn cover_packed(bbox: &BoundingBox, length: usize) -> Result<PackedCoverage> {
    validate_bounding_box(bbox)?;
    validate_hash_length(length)?;

    let width = width_degrees(length);
    let height = height_degrees(length);
    let lon_span = bbox.lon_span();
    let max_lon = bbox.east_lon();
    let (top, bottom, left) = (bbox.top_left_lat, bbox.bottom_right_lat, bbox.top_left_lon);

    let mut cells = CellSet::new();
    let mut sample = |lat: f64, lon: f64| {
        cells.insert(encode_packed(lat, lon, length));
        // 180 encodes into the eastern column; the next stride would skip
        // the western one.
        if to180(lon) == 180.0 && lon < max_lon {
            cells.insert(encode_packed(lat, -180.0, length));
        }
    };

    let mut lat = bottom;
    while lat <= top {
        let mut lon = left;
        while lon <= max_lon {
            sample(lat, lon);
            lon += width;
        }
        lat += height;
    }

    let mut lat = bottom;
    while lat <= top {
        sample(lat, max_lon);
        lat += height;
    }

    let mut lon = left;
    while lon <= max_lon {
        sample(top, lon);
        lon += width;
    }

    sample(top, max_lon);

    let area = lon_span * bbox.lat_span();
    let ratio = if area > 0.0 {
        cells.len() as f64 * width * height / area
    } else {
        f64::INFINITY
    };
    log::trace!(
        "covered {:?} with {} cells of length {}",
        bbox,
        cells.len(),
        length
    );

    Ok(PackedCoverage {
        hashes: cells.into_sorted(),
        ratio,
    })
}

/// Packed form of [`cover_bounding_box_max_hashes`].
pub fn cover_packed_max_hashes(
    bbox: &BoundingBox,
    max_hashes: usize,
) -> Result<Option<PackedCoverage>> {
    if max_hashes == 0 {
        return Err(GeomemError::invalid_argument(
            "max_hashes must be greater than zero",
        ));
    }
    validate_bounding_box(bbox)?;

    let mut best = None;
    for length in starting_length(bbox)..=MAX_HASH_LENGTH {
        let coverage = cover_packed(bbox, length)?;
        if coverage.len() > max_hashes {
            break;
        }
        best = Some(coverage);
    }
    Ok(best)
}

/// Like [`cover_packed_max_hashes`] but falls back to the coarsest useful
/// length instead of giving up, so there is always a covering set.
pub fn cover_packed_auto(bbox: &BoundingBox, max_hashes: usize) -> Result<PackedCoverage> {
    match cover_packed_max_hashes(bbox, max_hashes)? {
        Some(coverage) => Ok(coverage),
        None => cover_packed(bbox, starting_length(bbox)),
    }
}

fn starting_length(bbox: &BoundingBox) -> usize {
    match hash_length_to_cover_bounding_box(
        bbox.top_left_lat,
        bbox.top_left_lon,
        bbox.bottom_right_lat,
        bbox.bottom_right_lon,
    ) {
        0 => 1,
        length => length,
    }
}
