//! Geohash encoding, decoding and cell geometry.
//!
//! A hash is built by alternately bisecting the longitude interval
//! [-180, 180) and the latitude interval [-90, 90), longitude first. Each
//! step emits a 1 when the value falls in the upper half (`value >= mid`)
//! and five steps make one base32 symbol.
//!
//! ```
//! use geomem::compute::geohash::{decode_hash, encode_hash};
//!
//! let hash = encode_hash(38.89710201881826, -77.03669792041183, 12)?;
//! assert_eq!(hash, "dqcjqcp84c6e");
//!
//! let centre = decode_hash(&hash)?;
//! assert!((centre.lat() - 38.89710201881826).abs() < 1e-9);
//! # Ok::<(), geomem::GeomemError>(())
//! ```

mod adjacency;
mod packed;

pub use adjacency::{
    Direction, Parity, adjacent_hash, adjacent_hash_steps, bottom, grid_as_string,
    grid_as_string_around, left, neighbours, right, top,
};
pub use packed::PackedHash;

use crate::compute::base32::{self, char_index};
use crate::compute::validation::{validate_hash_length, validate_latitude, validate_longitude};
use crate::error::Result;
use geomem_types::point::{LatLong, longitude_diff, to180};
use once_cell::sync::Lazy;

/// Longest supported hash in symbols (60 bits).
pub const MAX_HASH_LENGTH: usize = base32::MAX_LENGTH;

static WIDTH_DEGREES: Lazy<[f64; MAX_HASH_LENGTH + 1]> =
    Lazy::new(|| std::array::from_fn(calculate_width_degrees));

static HEIGHT_DEGREES: Lazy<[f64; MAX_HASH_LENGTH + 1]> =
    Lazy::new(|| std::array::from_fn(calculate_height_degrees));

/// Encodes a point as a string hash of `length` symbols.
///
/// Longitude may be any finite value and is normalized first.
pub fn encode_hash(lat: f64, lon: f64, length: usize) -> Result<String> {
    Ok(encode_hash_to_long(lat, lon, length)?.to_string())
}

/// Encodes a [`LatLong`] as a string hash of `length` symbols.
pub fn encode_lat_long(point: &LatLong, length: usize) -> Result<String> {
    encode_hash(point.lat(), point.lon(), length)
}

/// Encodes a point in the packed form.
///
/// ```
/// use geomem::compute::geohash::encode_hash_to_long;
///
/// let hash = encode_hash_to_long(41.842967, -72.727175, 2)?;
/// assert_eq!(hash.bits(), 0x65c0000000000002);
/// # Ok::<(), geomem::GeomemError>(())
/// ```
pub fn encode_hash_to_long(lat: f64, lon: f64, length: usize) -> Result<PackedHash> {
    validate_hash_length(length)?;
    validate_latitude(lat)?;
    validate_longitude(lon)?;
    Ok(encode_packed(lat, lon, length))
}

/// Bisection without argument checks; callers validate.
pub(crate) fn encode_packed(lat: f64, lon: f64, length: usize) -> PackedHash {
    let lon = to180(lon);
    let mut lat_range = (-90.0, 90.0);
    let mut lon_range = (-180.0, 180.0);
    let mut bits = 0u64;
    for i in 0..length * 5 {
        let bit = if i % 2 == 0 {
            bisect(&mut lon_range, lon)
        } else {
            bisect(&mut lat_range, lat)
        };
        bits = (bits << 1) | bit as u64;
    }
    PackedHash::from_parts(bits, length)
}

fn bisect(range: &mut (f64, f64), value: f64) -> bool {
    let mid = (range.0 + range.1) / 2.0;
    if value >= mid {
        range.0 = mid;
        true
    } else {
        range.1 = mid;
        false
    }
}

/// Returns the centre of the cell a hash denotes. The empty hash is the
/// whole sphere and decodes to (0, 0).
pub fn decode_hash(hash: &str) -> Result<LatLong> {
    let mut lat_range = (-90.0f64, 90.0f64);
    let mut lon_range = (-180.0f64, 180.0f64);
    let mut even = true;
    for c in hash.chars() {
        let digit = char_index(c)?;
        for shift in (0..5).rev() {
            let range = if even { &mut lon_range } else { &mut lat_range };
            let mid = (range.0 + range.1) / 2.0;
            if (digit >> shift) & 1 == 1 {
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            even = !even;
        }
    }
    Ok(LatLong::new(
        (lat_range.0 + lat_range.1) / 2.0,
        (lon_range.0 + lon_range.1) / 2.0,
    ))
}

/// Width in degrees of a cell of `n` symbols, `180 / 2^(2.5n + a)` with
/// `a = -1` for even `n` and `-0.5` for odd `n`.
///
/// ```
/// use geomem::compute::geohash::width_degrees;
///
/// assert_eq!(width_degrees(0), 360.0);
/// assert_eq!(width_degrees(1), 45.0);
/// assert_eq!(width_degrees(2), 11.25);
/// ```
pub fn width_degrees(n: usize) -> f64 {
    match WIDTH_DEGREES.get(n) {
        Some(width) => *width,
        None => calculate_width_degrees(n),
    }
}

/// Height in degrees of a cell of `n` symbols, `180 / 2^(2.5n + a)` with
/// `a = 0` for even `n` and `-0.5` for odd `n`.
pub fn height_degrees(n: usize) -> f64 {
    match HEIGHT_DEGREES.get(n) {
        Some(height) => *height,
        None => calculate_height_degrees(n),
    }
}

// Longitude owns ceil(5n/2) of the bits and latitude floor(5n/2), which is
// the closed form above with an integral exponent.
fn calculate_width_degrees(n: usize) -> f64 {
    360.0 / 2f64.powi(((5 * n + 1) / 2) as i32)
}

fn calculate_height_degrees(n: usize) -> f64 {
    180.0 / 2f64.powi((5 * n / 2) as i32)
}

/// Returns the number of symbols both corners of a box share, found by
/// bisecting the two corners together until they fall into different
/// halves.
///
/// Returns 0 when they split within the first symbol and 12 when they never
/// split. A box wider than a hemisphere, or a full turn, returns 0 without
/// bisecting. Longitudes are normalized first, so a box crossing the
/// antimeridian splits immediately.
///
/// ```
/// use geomem::compute::geohash::hash_length_to_cover_bounding_box;
///
/// let length = hash_length_to_cover_bounding_box(42.819581, -73.950691, 41.842967, -72.727175);
/// assert_eq!(length, 2);
/// ```
pub fn hash_length_to_cover_bounding_box(
    top_left_lat: f64,
    top_left_lon: f64,
    bottom_right_lat: f64,
    bottom_right_lon: f64,
) -> usize {
    if bottom_right_lon - top_left_lon >= 360.0
        || longitude_diff(bottom_right_lon, top_left_lon) > 180.0
    {
        return 0;
    }

    let top_left = (top_left_lat, to180(top_left_lon));
    let bottom_right = (bottom_right_lat, to180(bottom_right_lon));
    let mut lat_range = (-90.0f64, 90.0f64);
    let mut lon_range = (-180.0f64, 180.0f64);

    for bits in 0..MAX_HASH_LENGTH * 5 {
        let (range, a, b) = if bits % 2 == 0 {
            (&mut lon_range, top_left.1, bottom_right.1)
        } else {
            (&mut lat_range, top_left.0, bottom_right.0)
        };
        let mid = (range.0 + range.1) / 2.0;
        let upper = a >= mid;
        if upper != (b >= mid) {
            return bits / 5;
        }
        if upper {
            range.0 = mid;
        } else {
            range.1 = mid;
        }
    }
    MAX_HASH_LENGTH
}

/// Whether a point lies within the cell of `hash`, edges included.
///
/// ```
/// use geomem::compute::geohash::hash_contains;
///
/// assert!(hash_contains("dqcjqc", 38.8971, -77.0367)?);
/// assert!(!hash_contains("dqcjqc", 38.8971, -77.2)?);
/// # Ok::<(), geomem::GeomemError>(())
/// ```
pub fn hash_contains(hash: &str, lat: f64, lon: f64) -> Result<bool> {
    let centre = decode_hash(hash)?;
    let length = hash.chars().count();
    Ok((centre.lat() - lat).abs() <= height_degrees(length) / 2.0
        && to180(centre.lon() - lon).abs() <= width_degrees(length) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_encode_white_house() {
        assert_eq!(
            encode_hash(38.89710201881826, -77.03669792041183, 12).unwrap(),
            "dqcjqcp84c6e"
        );
        assert_eq!(
            encode_lat_long(&LatLong::new(38.89710201881826, -77.03669792041183), 6).unwrap(),
            "dqcjqc"
        );
    }

    #[test]
    fn test_encode_other_points() {
        assert_eq!(encode_hash(-25.382708, -49.265506, 12).unwrap(), "6gkzwgjzn820");
        assert_eq!(encode_hash(-25.382708, -49.265506, 6).unwrap(), "6gkzwg");
        assert_eq!(encode_hash(20.0, 31.0, 12).unwrap(), "sew1c2vs2q5r");
    }

    #[test]
    fn test_encode_normalizes_longitude() {
        assert_eq!(
            encode_hash(20.0, 31.0 + 360.0, 12).unwrap(),
            encode_hash(20.0, 31.0, 12).unwrap()
        );
        assert_eq!(
            encode_hash(20.0, 31.0 - 720.0, 12).unwrap(),
            encode_hash(20.0, 31.0, 12).unwrap()
        );
    }

    #[test]
    fn test_encode_edges() {
        assert_eq!(encode_hash(90.0, 0.0, 1).unwrap(), "u");
        assert_eq!(encode_hash(-90.0, 0.0, 1).unwrap(), "h");
        assert_eq!(encode_hash(0.0, 180.0, 12).unwrap(), "xbpbpbpbpbpb");
        assert_eq!(encode_hash(0.0, -180.0, 12).unwrap(), "800000000000");
    }

    #[test]
    fn test_encode_rejects_bad_arguments() {
        assert!(encode_hash(0.0, 0.0, 0).is_err());
        assert!(encode_hash(0.0, 0.0, 13).is_err());
        assert!(encode_hash(91.0, 0.0, 5).is_err());
        assert!(encode_hash(0.0, f64::NAN, 5).is_err());
    }

    #[test]
    fn test_decode() {
        let centre = decode_hash("dqcjqcp84c6e").unwrap();
        assert!((centre.lat() - 38.8971020188).abs() < 1e-9);
        assert!((centre.lon() + 77.0366979204).abs() < 1e-9);
    }

    #[test]
    fn test_decode_empty_is_origin() {
        let centre = decode_hash("").unwrap();
        assert_eq!(centre.lat(), 0.0);
        assert_eq!(centre.lon(), 0.0);
    }

    #[test]
    fn test_decode_invalid_character() {
        assert!(decode_hash("dqcjqa").is_err());
    }

    #[test]
    fn test_packed_and_string_forms_agree() {
        let packed = encode_hash_to_long(-25.382708, -49.265506, 12).unwrap();
        assert_eq!(packed.to_string(), "6gkzwgjzn820");
        assert_eq!("6gkzwgjzn820".parse::<PackedHash>().unwrap(), packed);
    }

    #[test]
    fn test_cell_sizes() {
        assert_eq!(width_degrees(0), 360.0);
        assert_eq!(height_degrees(0), 180.0);
        assert_eq!(width_degrees(1), 45.0);
        assert_eq!(height_degrees(1), 45.0);
        assert_eq!(width_degrees(2), 11.25);
        assert_eq!(height_degrees(2), 5.625);
        for n in 0..=MAX_HASH_LENGTH {
            let a = if n % 2 == 0 { -1.0 } else { -0.5 };
            let expected = 180.0 / 2f64.powf(2.5 * n as f64 + a);
            assert!((width_degrees(n) - expected).abs() <= expected * 1e-12);
        }
        // computed past the table
        assert_eq!(width_degrees(13), 4.190951585769653e-8);
        assert_eq!(height_degrees(13), 4.190951585769653e-8);
    }

    #[test]
    fn test_hash_length_to_cover_bounding_box() {
        assert_eq!(
            hash_length_to_cover_bounding_box(42.819581, -73.950691, 41.842967, -72.727175),
            2
        );
        assert_eq!(
            hash_length_to_cover_bounding_box(71.676351, 178.389963, 70.633291, -177.116629),
            0
        );
        assert_eq!(
            hash_length_to_cover_bounding_box(2.935289, -82.751538, -5.623710, -74.753492),
            0
        );
        assert_eq!(hash_length_to_cover_bounding_box(-80.0, 10.0, 80.0, 20.0), 0);
        assert_eq!(hash_length_to_cover_bounding_box(80.0, -170.0, -80.0, 170.0), 0);
    }

    #[test]
    fn test_hash_length_to_cover_wide_boxes() {
        // corners of a full turn normalize to the same point
        assert_eq!(hash_length_to_cover_bounding_box(20.0, 10.0, 20.0, 370.0), 0);
        assert_eq!(hash_length_to_cover_bounding_box(30.0, -703.0, 10.0, 624.0), 0);
        assert_eq!(hash_length_to_cover_bounding_box(30.0, 10.0, 10.0, 369.0), 0);
        assert_eq!(hash_length_to_cover_bounding_box(30.0, 100.0, 10.0, 370.0), 0);
    }

    #[test]
    fn test_hash_length_to_cover_a_point() {
        assert_eq!(
            hash_length_to_cover_bounding_box(38.8971, -77.0366, 38.8971, -77.0366),
            MAX_HASH_LENGTH
        );
    }

    #[test]
    fn test_hash_contains() {
        let hash = encode_hash(20.0, 31.0, 5).unwrap();
        assert!(hash_contains(&hash, 20.0, 31.0).unwrap());
        assert!(!hash_contains(&hash, 21.0, 31.0).unwrap());
        assert!(!hash_contains(&hash, 20.0, 32.0).unwrap());
        // the longitude difference wraps
        assert!(hash_contains("x", 20.0, 179.0 - 360.0).unwrap());
    }

    #[quickcheck]
    fn test_decode_within_half_a_cell(lat: f64, lon: f64, length: u8) -> TestResult {
        if !lat.is_finite() || !lon.is_finite() {
            return TestResult::discard();
        }
        let lat = lat % 90.0;
        let lon = lon % 180.0;
        let length = (length as usize % MAX_HASH_LENGTH) + 1;

        let centre = decode_hash(&encode_hash(lat, lon, length).unwrap()).unwrap();
        TestResult::from_bool(
            (centre.lat() - lat).abs() <= height_degrees(length) / 2.0
                && (centre.lon() - lon).abs() <= width_degrees(length) / 2.0,
        )
    }
}
