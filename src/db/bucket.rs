//! Per-cell time buckets.

use crate::compute::geohash::PackedHash;
use crate::db::info::Info;
use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::FxHasher;
use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;
use std::sync::Arc;

pub(crate) type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Records of one cell ordered by time. The insertion sequence breaks ties
/// so records with equal times are all kept.
pub(crate) struct TimeBucket<T, R> {
    entries: RwLock<BTreeMap<(i64, u64), Arc<Info<T, R>>>>,
}

impl<T, R> TimeBucket<T, R> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub(crate) fn insert(&self, sequence: u64, info: Arc<Info<T, R>>) {
        self.entries.write().insert((info.time(), sequence), info);
    }

    /// Snapshot of the records with `start <= time < finish`.
    pub(crate) fn range(&self, start: i64, finish: i64) -> Vec<Arc<Info<T, R>>> {
        if start >= finish {
            return Vec::new();
        }
        self.entries
            .read()
            .range((start, 0)..(finish, 0))
            .map(|(_, info)| Arc::clone(info))
            .collect()
    }
}

/// Time buckets for every prefix of every record's hash.
pub(crate) struct CellIndex<T, R> {
    buckets: DashMap<PackedHash, Arc<TimeBucket<T, R>>, FxBuildHasher>,
}

impl<T, R> CellIndex<T, R> {
    pub(crate) fn new() -> Self {
        Self {
            buckets: DashMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Adds `info` to the bucket of each prefix of `hash`, creating buckets
    /// on first use.
    pub(crate) fn insert(&self, hash: PackedHash, sequence: u64, info: &Arc<Info<T, R>>) {
        for prefix in hash.prefixes() {
            let bucket = self
                .buckets
                .entry(prefix)
                .or_insert_with(|| Arc::new(TimeBucket::new()))
                .value()
                .clone();
            bucket.insert(sequence, Arc::clone(info));
        }
    }

    pub(crate) fn bucket(&self, hash: PackedHash) -> Option<Arc<TimeBucket<T, R>>> {
        self.buckets.get(&hash).map(|bucket| Arc::clone(bucket.value()))
    }

    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }
}
