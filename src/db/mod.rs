//! Concurrent spatial-temporal index.
//!
//! Every record is stored under each of the twelve prefixes of its hash, so a
//! query can read whole cells at whatever resolution suits its box. Within a
//! cell records are ordered by time. Records carrying an identifier are also
//! stored in a per-identifier copy of the same structure.
//!
//! ```
//! use geomem::Geomem;
//!
//! let index: Geomem<&str> = Geomem::new();
//! index.add(-15.0, 120.0, 500, "A1", Some("a1".to_string()))?;
//!
//! let found: Vec<_> = index.find(-5.0, 100.0, -45.0, 170.0, 0, 1000)?.collect();
//! assert_eq!(found.len(), 1);
//! assert_eq!(*found[0].value(), "A1");
//! # Ok::<(), geomem::GeomemError>(())
//! ```

mod bucket;
mod info;
mod query;

pub use info::Info;
pub use query::Find;

use crate::compute::coverage::cover_packed_auto;
use crate::compute::geohash::{MAX_HASH_LENGTH, PackedHash, encode_packed};
use crate::compute::validation::{validate_latitude, validate_longitude};
use crate::config::Config;
use crate::error::{GeomemError, Result};
use bucket::{CellIndex, FxBuildHasher};
use dashmap::DashMap;
use geomem_types::bbox::BoundingBox;
use query::Candidates;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory index of positioned, timestamped records.
///
/// `Geomem` is `Send + Sync` when `T` and `R` are; share it behind an `Arc`
/// and call [`add`](Geomem::add) and [`find`](Geomem::find) from any thread.
/// Records are never removed.
pub struct Geomem<T, R = String> {
    cells: Arc<CellIndex<T, R>>,
    ids: DashMap<R, Arc<CellIndex<T, R>>, FxBuildHasher>,
    sequence: AtomicU64,
    config: Config,
}

impl<T, R> Geomem<T, R>
where
    R: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            cells: Arc::new(CellIndex::new()),
            ids: DashMap::with_hasher(FxBuildHasher::default()),
            sequence: AtomicU64::new(0),
            config: Config::default(),
        }
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(GeomemError::Config)?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Adds a record. Longitude may be any finite value.
    pub fn add(&self, lat: f64, lon: f64, time: i64, value: T, id: Option<R>) -> Result<()> {
        self.add_info(Info::new(lat, lon, time, value, id))
    }

    pub fn add_info(&self, info: Info<T, R>) -> Result<()> {
        validate_latitude(info.lat())?;
        validate_longitude(info.lon())?;

        let hash = encode_packed(info.lat(), info.lon(), MAX_HASH_LENGTH);
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let info = Arc::new(info);

        self.cells.insert(hash, sequence, &info);

        if let Some(id) = info.id() {
            let index = self
                .ids
                .entry(id.clone())
                .or_insert_with(|| {
                    log::debug!("creating cell index for a new identifier");
                    Arc::new(CellIndex::new())
                })
                .value()
                .clone();
            index.insert(hash, sequence, &info);
        }
        Ok(())
    }

    /// Records inside the box with `start <= time < finish`.
    pub fn find(
        &self,
        top_left_lat: f64,
        top_left_lon: f64,
        bottom_right_lat: f64,
        bottom_right_lon: f64,
        start: i64,
        finish: i64,
    ) -> Result<Find<T, R>> {
        let bbox = BoundingBox::new(top_left_lat, top_left_lon, bottom_right_lat, bottom_right_lon);
        self.find_in(&bbox, start, finish)
    }

    pub fn find_in(&self, bbox: &BoundingBox, start: i64, finish: i64) -> Result<Find<T, R>> {
        self.search(Some(Arc::clone(&self.cells)), bbox, start, finish)
    }

    /// Like [`find_in`](Geomem::find_in) restricted to records added with
    /// `id`. An unknown identifier finds nothing.
    pub fn find_by_id<Q>(
        &self,
        id: &Q,
        bbox: &BoundingBox,
        start: i64,
        finish: i64,
    ) -> Result<Find<T, R>>
    where
        R: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.ids.get(id).map(|index| Arc::clone(index.value()));
        self.search(index, bbox, start, finish)
    }

    /// Records stored under the cell `hash` with `start <= time < finish`.
    /// The cell may have any length from 1 to 12.
    ///
    /// ```
    /// use geomem::Geomem;
    ///
    /// let index: Geomem<&str> = Geomem::new();
    /// index.add(38.8971, -77.0366, 10, "White House", None)?;
    ///
    /// assert_eq!(index.find_in_cell("dqc", 0, 20)?.count(), 1);
    /// assert_eq!(index.find_in_cell("dqc", 20, 30)?.count(), 0);
    /// assert_eq!(index.find_in_cell("dr", 0, 20)?.count(), 0);
    /// # Ok::<(), geomem::GeomemError>(())
    /// ```
    pub fn find_in_cell(&self, hash: &str, start: i64, finish: i64) -> Result<Find<T, R>> {
        let cell: PackedHash = hash.to_ascii_lowercase().parse()?;
        let candidates =
            Candidates::new(Some(Arc::clone(&self.cells)), vec![cell], start, finish);
        Ok(Find::new(candidates, None))
    }

    fn search(
        &self,
        index: Option<Arc<CellIndex<T, R>>>,
        bbox: &BoundingBox,
        start: i64,
        finish: i64,
    ) -> Result<Find<T, R>> {
        let coverage = cover_packed_auto(bbox, self.config.max_hashes)?;
        log::debug!(
            "querying {} cells of length {} (ratio {:.3}) for times [{}, {})",
            coverage.len(),
            coverage.hash_length(),
            coverage.ratio(),
            start,
            finish
        );
        let candidates = Candidates::new(index, coverage.into_hashes(), start, finish);
        Ok(Find::new(candidates, Some(*bbox)))
    }

    /// Number of distinct identifiers seen.
    pub fn ids(&self) -> usize {
        self.ids.len()
    }

    /// Number of non-empty cells across all resolutions.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of records added.
    pub fn len(&self) -> usize {
        self.sequence.load(Ordering::Relaxed) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, R> Default for Geomem<T, R>
where
    R: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pacific(index: &Geomem<String>) -> Vec<String> {
        let mut values: Vec<String> = index
            .find(-5.0, 100.0, -45.0, 170.0, 0, 1000)
            .unwrap()
            .map(|info| info.value().clone())
            .collect();
        values.sort();
        values
    }

    #[test]
    fn test_add_and_find() {
        let index: Geomem<String> = Geomem::new();
        index
            .add(-15.0, 120.0, 500, "A1".to_string(), Some("a1".to_string()))
            .unwrap();

        let found: Vec<_> = index.find(-5.0, 100.0, -45.0, 170.0, 0, 1000).unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value(), "A1");
        assert_eq!(found[0].id().map(String::as_str), Some("a1"));
        assert_eq!(found[0].time(), 500);
    }

    #[test]
    fn test_outside_box_is_not_found() {
        let index: Geomem<String> = Geomem::new();
        index.add(15.0, 120.0, 500, "A1".to_string(), None).unwrap();
        assert!(pacific(&index).is_empty());
    }

    #[test]
    fn test_box_edges_are_half_open() {
        let index: Geomem<String> = Geomem::new();
        for (lat, lon, value) in [
            (-6.0, 101.0, "inside"),
            (-4.0, 101.0, "north"),
            (-6.0, 99.0, "west"),
            (-6.0, 171.0, "east"),
            (-46.0, 169.0, "south"),
            (-45.0, 120.0, "bottom edge"),
            (-5.0, 120.0, "top edge"),
            (-10.0, 100.0, "left edge"),
            (-10.0, 170.0, "right edge"),
        ] {
            index.add(lat, lon, 500, value.to_string(), None).unwrap();
        }
        assert_eq!(pacific(&index), vec!["bottom edge", "inside", "right edge"]);
    }

    #[test]
    fn test_time_range_is_half_open() {
        let index: Geomem<String> = Geomem::new();
        for time in [0, 500, 999, 1000, 1500] {
            index.add(-15.0, 120.0, time, time.to_string(), None).unwrap();
        }
        assert_eq!(pacific(&index), vec!["0", "500", "999"]);

        assert_eq!(index.find(-5.0, 100.0, -45.0, 170.0, 500, 500).unwrap().count(), 0);
        assert_eq!(index.find(-5.0, 100.0, -45.0, 170.0, 1000, 0).unwrap().count(), 0);
    }

    #[test]
    fn test_identical_records_are_all_kept() {
        let index: Geomem<String> = Geomem::new();
        index.add(-15.0, 120.0, 500, "first".to_string(), None).unwrap();
        index.add(-15.0, 120.0, 500, "second".to_string(), None).unwrap();
        assert_eq!(pacific(&index), vec!["first", "second"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_find_by_id() {
        let index: Geomem<String> = Geomem::new();
        index.add(-15.0, 120.0, 500, "A1".to_string(), Some("a".to_string())).unwrap();
        index.add(-16.0, 121.0, 600, "B1".to_string(), Some("b".to_string())).unwrap();
        index.add(-17.0, 122.0, 700, "A2".to_string(), Some("a".to_string())).unwrap();
        index.add(-18.0, 123.0, 800, "N".to_string(), None).unwrap();

        let bbox = BoundingBox::new(-5.0, 100.0, -45.0, 170.0);
        let mut values: Vec<String> = index
            .find_by_id("a", &bbox, 0, 1000)
            .unwrap()
            .map(|info| info.value().clone())
            .collect();
        values.sort();
        assert_eq!(values, vec!["A1", "A2"]);

        assert_eq!(index.find_by_id("b", &bbox, 0, 600).unwrap().count(), 0);
        assert_eq!(index.find_by_id("missing", &bbox, 0, 1000).unwrap().count(), 0);
        assert_eq!(index.ids(), 2);
    }

    #[test]
    fn test_counts() {
        let index: Geomem<u32> = Geomem::default();
        assert!(index.is_empty());
        assert_eq!(index.cell_count(), 0);

        index.add(-15.0, 120.0, 1, 1, None).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.cell_count(), 12);

        // shares the first symbol only
        index.add(-40.0, 130.0, 2, 2, None).unwrap();
        assert_eq!(index.cell_count(), 23);
    }

    #[test]
    fn test_invalid_input() {
        let index: Geomem<u32> = Geomem::new();
        assert!(index.add(91.0, 0.0, 0, 1, None).is_err());
        assert!(index.add(0.0, f64::NAN, 0, 1, None).is_err());
        assert!(index.is_empty());

        assert!(index.find(-45.0, 100.0, -5.0, 170.0, 0, 1).is_err());
        assert!(index.find(-5.0, 170.0, -45.0, 100.0, 0, 1).is_err());
    }

    #[test]
    fn test_with_config() {
        let config = Config::default().with_max_hashes(64);
        let index: Geomem<u32> = Geomem::with_config(config.clone()).unwrap();
        assert_eq!(index.config(), &config);

        let err = Geomem::<u32>::with_config(Config::default().with_max_hashes(0));
        assert!(matches!(err, Err(GeomemError::Config(_))));
    }

    #[test]
    fn test_find_across_antimeridian() {
        let index: Geomem<String> = Geomem::new();
        index.add(0.0, 175.0, 1, "west of line".to_string(), None).unwrap();
        index.add(0.0, -175.0, 1, "east of line".to_string(), None).unwrap();
        index.add(0.0, 160.0, 1, "too far west".to_string(), None).unwrap();

        let mut values: Vec<String> = index
            .find(10.0, 170.0, -10.0, 190.0, 0, 10)
            .unwrap()
            .map(|info| info.value().clone())
            .collect();
        values.sort();
        assert_eq!(values, vec!["east of line", "west of line"]);
    }

    #[test]
    fn test_find_when_stride_lands_on_antimeridian() {
        let index: Geomem<String> = Geomem::new();
        index.add(0.5, -175.0, 1, "just east of line".to_string(), None).unwrap();
        let found = index.find(1.0, 157.5, -1.0, 196.25, 0, 10).unwrap().count();
        assert_eq!(found, 1);
    }

    #[test]
    fn test_find_over_full_turn() {
        let index: Geomem<String> = Geomem::new();
        index.add(20.0, -170.0, 1, "far side".to_string(), None).unwrap();
        index.add(20.0, 10.0, 1, "on the edge".to_string(), None).unwrap();
        index.add(40.0, 0.0, 1, "too far north".to_string(), None).unwrap();

        let mut values: Vec<String> = index
            .find(30.0, 10.0, 10.0, 370.0, 0, 10)
            .unwrap()
            .map(|info| info.value().clone())
            .collect();
        values.sort();
        assert_eq!(values, vec!["far side", "on the edge"]);
    }

    #[test]
    fn test_find_in_cell() {
        let index: Geomem<String> = Geomem::new();
        index.add(38.8971, -77.0366, 10, "a".to_string(), None).unwrap();
        index.add(38.8990, -77.0400, 20, "b".to_string(), None).unwrap();
        index.add(42.3601, -71.0589, 15, "elsewhere".to_string(), None).unwrap();

        assert_eq!(index.find_in_cell("dqc", 0, 100).unwrap().count(), 2);
        assert_eq!(index.find_in_cell("DQC", 0, 100).unwrap().count(), 2);
        assert_eq!(index.find_in_cell("dqc", 15, 100).unwrap().count(), 1);
        assert_eq!(index.find_in_cell("dqc", 100, 0).unwrap().count(), 0);
        assert_eq!(index.find_in_cell("d", 0, 100).unwrap().count(), 3);
        assert_eq!(index.find_in_cell("s", 0, 100).unwrap().count(), 0);
    }

    #[test]
    fn test_find_in_cell_rejects_bad_hashes() {
        let index: Geomem<String> = Geomem::new();
        assert!(index.find_in_cell("", 0, 1).is_err());
        assert!(index.find_in_cell("dqcjqcp84c6ee", 0, 1).is_err());
        assert!(matches!(
            index.find_in_cell("dqa", 0, 1),
            Err(GeomemError::InvalidCharacter('a'))
        ));
    }
}
