//! Lazy query pipeline.
//!
//! [`Candidates`] walks the covering cells one at a time and snapshots each
//! cell's time range; [`Find`] keeps only records inside the query box. No
//! lock is held between calls to `next`.

use crate::compute::geohash::PackedHash;
use crate::db::bucket::CellIndex;
use crate::db::info::Info;
use geomem_types::bbox::BoundingBox;
use std::iter::FusedIterator;
use std::sync::Arc;
use std::vec;

/// Records of the covering cells within the time range, unfiltered.
pub(crate) struct Candidates<T, R> {
    index: Option<Arc<CellIndex<T, R>>>,
    cells: vec::IntoIter<PackedHash>,
    current: vec::IntoIter<Arc<Info<T, R>>>,
    start: i64,
    finish: i64,
}

impl<T, R> Candidates<T, R> {
    pub(crate) fn new(
        index: Option<Arc<CellIndex<T, R>>>,
        cells: Vec<PackedHash>,
        start: i64,
        finish: i64,
    ) -> Self {
        Self {
            index,
            cells: cells.into_iter(),
            current: Vec::new().into_iter(),
            start,
            finish,
        }
    }
}

impl<T, R> Iterator for Candidates<T, R> {
    type Item = Arc<Info<T, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index.as_ref()?;
        loop {
            if let Some(info) = self.current.next() {
                return Some(info);
            }
            let cell = self.cells.next()?;
            if let Some(bucket) = index.bucket(cell) {
                self.current = bucket.range(self.start, self.finish).into_iter();
                log::trace!("cell {} yielded {} candidates", cell, self.current.len());
            }
        }
    }
}

/// Iterator over the records matching a query.
///
/// Membership is half-open: latitude in `[bottom, top)`, longitude in
/// `(left, right]`, time in `[start, finish)`. A query of a single cell has
/// no box and yields the whole cell. Results come in no particular order.
pub struct Find<T, R = String> {
    candidates: Candidates<T, R>,
    bbox: Option<BoundingBox>,
}

impl<T, R> Find<T, R> {
    pub(crate) fn new(candidates: Candidates<T, R>, bbox: Option<BoundingBox>) -> Self {
        Self { candidates, bbox }
    }
}

impl<T, R> Iterator for Find<T, R> {
    type Item = Arc<Info<T, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        match &self.bbox {
            Some(bbox) => self
                .candidates
                .find(|info| bbox.contains(info.lat(), info.lon())),
            None => self.candidates.next(),
        }
    }
}

impl<T, R> FusedIterator for Find<T, R> {}
