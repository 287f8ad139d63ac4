use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// Backed by a `geo::Point` with x as longitude and y as latitude, so it can be
/// handed straight to `geo` algorithms.
///
/// # Examples
///
/// ```
/// use geomem_types::point::LatLong;
///
/// let white_house = LatLong::new(38.89710201881826, -77.03669792041183);
/// assert_eq!(white_house.lat(), 38.89710201881826);
///
/// let moved = white_house.add(1.0, -1.0);
/// assert_eq!(moved.lon(), -78.03669792041183);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    /// The underlying geographic point (x = longitude, y = latitude)
    pub point: Point<f64>,
}

impl LatLong {
    /// Create a new point from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            point: Point::new(lon, lat),
        }
    }

    /// Create from a `geo::Point` (x = longitude, y = latitude).
    pub fn from_point(point: Point<f64>) -> Self {
        Self { point }
    }

    /// Get the latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    /// Get the longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    /// Get the underlying `geo::Point`.
    pub fn to_point(&self) -> Point<f64> {
        self.point
    }

    /// Returns a new point offset by the given deltas. No normalization is
    /// applied.
    pub fn add(&self, delta_lat: f64, delta_lon: f64) -> Self {
        Self::new(self.lat() + delta_lat, self.lon() + delta_lon)
    }

    /// Great-circle distance to another point in kilometres.
    ///
    /// ```
    /// use geomem_types::point::LatLong;
    ///
    /// let hartford = LatLong::new(41.842967, -72.727175);
    /// let schenectady = LatLong::new(42.819581, -73.950691);
    /// let km = hartford.distance_km(&schenectady);
    /// assert!(km > 140.0 && km < 160.0);
    /// ```
    pub fn distance_km(&self, other: &LatLong) -> f64 {
        Haversine.distance(self.point, other.point) / 1000.0
    }
}

impl fmt::Display for LatLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LatLong [lat={}, lon={}]", self.lat(), self.lon())
    }
}

/// Converts an angle in degrees to the range (-180, 180].
///
/// The reduction is sign-symmetric, `to180(-d) == -to180(d)`, so `-180`
/// keeps its sign and continues to address the western edge of the grid.
///
/// # Examples
///
/// ```
/// use geomem_types::point::to180;
///
/// assert_eq!(to180(190.0), -170.0);
/// assert_eq!(to180(-190.0), 170.0);
/// assert_eq!(to180(180.0), 180.0);
/// assert_eq!(to180(-180.0), -180.0);
/// ```
pub fn to180(d: f64) -> f64 {
    if d < 0.0 {
        return -to180(d.abs());
    }
    if d > 180.0 {
        let turns = ((d + 180.0) / 360.0).floor();
        let reduced = d - turns * 360.0;
        // odd multiples of 180 land on -180, the representative is 180
        if reduced == -180.0 { 180.0 } else { reduced }
    } else {
        d
    }
}

/// Returns the eastward angular distance from `b` to `a` in degrees. The
/// result is always in [0, 360).
///
/// ```
/// use geomem_types::point::longitude_diff;
///
/// assert_eq!(longitude_diff(170.0, 100.0), 70.0);
/// assert_eq!(longitude_diff(-170.0, 170.0), 20.0);
/// ```
pub fn longitude_diff(a: f64, b: f64) -> f64 {
    let a = to180(a);
    let b = to180(b);
    if a < b { a - b + 360.0 } else { a - b }
}
