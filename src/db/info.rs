//! Indexed records.

use geomem_types::point::LatLong;
use serde::{Deserialize, Serialize};

/// A positioned, timestamped record with an optional application
/// identifier. Immutable once added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info<T, R = String> {
    position: LatLong,
    time: i64,
    value: T,
    id: Option<R>,
}

impl<T, R> Info<T, R> {
    pub fn new(lat: f64, lon: f64, time: i64, value: T, id: Option<R>) -> Self {
        Self {
            position: LatLong::new(lat, lon),
            time,
            value,
            id,
        }
    }

    pub fn lat(&self) -> f64 {
        self.position.lat()
    }

    pub fn lon(&self) -> f64 {
        self.position.lon()
    }

    /// Time of the record, typically epoch milliseconds.
    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn id(&self) -> Option<&R> {
        self.id.as_ref()
    }

    pub fn position(&self) -> LatLong {
        self.position
    }
}
