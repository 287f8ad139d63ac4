//! Geohash-convention bounding boxes.

use crate::point::{LatLong, longitude_diff};
use serde::{Deserialize, Serialize};

/// A rectangle on the lat/long grid given by its top-left and bottom-right
/// corners in degrees.
///
/// Boxes crossing the antimeridian are written with an unwrapped eastern
/// edge: a box from 170 east to 170 west is `top_left_lon = 170.0`,
/// `bottom_right_lon = 190.0`. Longitude spans of 360 degrees or more cover
/// the whole globe.
///
/// Membership is half-open: latitude in `[bottom, top)` and longitude in
/// `(left, right]` measured eastward from `left`. A box spanning the whole
/// globe contains every longitude.
///
/// # Examples
///
/// ```
/// use geomem_types::bbox::BoundingBox;
///
/// let bbox = BoundingBox::new(-5.0, 100.0, -45.0, 170.0);
/// assert_eq!(bbox.lon_span(), 70.0);
/// assert_eq!(bbox.lat_span(), 40.0);
/// assert!(bbox.contains(-6.0, 101.0));
/// assert!(!bbox.contains(-4.0, 101.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left_lat: f64,
    pub top_left_lon: f64,
    pub bottom_right_lat: f64,
    pub bottom_right_lon: f64,
}

impl BoundingBox {
    pub fn new(
        top_left_lat: f64,
        top_left_lon: f64,
        bottom_right_lat: f64,
        bottom_right_lon: f64,
    ) -> Self {
        Self {
            top_left_lat,
            top_left_lon,
            bottom_right_lat,
            bottom_right_lon,
        }
    }

    /// Create a bounding box from its two corners.
    pub fn from_corners(top_left: LatLong, bottom_right: LatLong) -> Self {
        Self::new(
            top_left.lat(),
            top_left.lon(),
            bottom_right.lat(),
            bottom_right.lon(),
        )
    }

    pub fn top_left(&self) -> LatLong {
        LatLong::new(self.top_left_lat, self.top_left_lon)
    }

    pub fn bottom_right(&self) -> LatLong {
        LatLong::new(self.bottom_right_lat, self.bottom_right_lon)
    }

    /// Eastward longitude extent in degrees, in [0, 360].
    pub fn lon_span(&self) -> f64 {
        if self.bottom_right_lon - self.top_left_lon >= 360.0 {
            360.0
        } else {
            longitude_diff(self.bottom_right_lon, self.top_left_lon)
        }
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.top_left_lat - self.bottom_right_lat
    }

    /// Eastern edge expressed relative to the western one, so that it is
    /// never less than `top_left_lon`.
    pub fn east_lon(&self) -> f64 {
        self.top_left_lon + self.lon_span()
    }

    /// Area of the box in square degrees.
    pub fn area_degrees(&self) -> f64 {
        self.lon_span() * self.lat_span()
    }

    /// Whether a point lies inside the box under the half-open convention.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.bottom_right_lat || lat >= self.top_left_lat {
            return false;
        }
        let lon_span = self.lon_span();
        if lon_span >= 360.0 {
            return true;
        }
        let offset = longitude_diff(lon, self.top_left_lon);
        offset > 0.0 && offset <= lon_span
    }

    pub fn contains_point(&self, point: &LatLong) -> bool {
        self.contains(point.lat(), point.lon())
    }
}
