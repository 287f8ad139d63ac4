//! Validation for geographic coordinates, hash lengths and bounding boxes.

use crate::compute::geohash::MAX_HASH_LENGTH;
use crate::error::{GeomemError, Result};
use geomem_types::bbox::BoundingBox;

/// Validates a latitude is finite and within [-90.0, 90.0].
///
/// # Examples
///
/// ```
/// use geomem::compute::validation::validate_latitude;
///
/// assert!(validate_latitude(40.7128).is_ok());
/// assert!(validate_latitude(90.0).is_ok());
/// assert!(validate_latitude(95.0).is_err());
/// assert!(validate_latitude(f64::NAN).is_err());
/// ```
pub fn validate_latitude(lat: f64) -> Result<()> {
    if !lat.is_finite() {
        return Err(GeomemError::InvalidArgument(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeomemError::InvalidArgument(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    Ok(())
}

/// Validates a longitude is finite. Any finite value is accepted and
/// normalized to (-180, 180] where it is used.
pub fn validate_longitude(lon: f64) -> Result<()> {
    if !lon.is_finite() {
        return Err(GeomemError::InvalidArgument(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }
    Ok(())
}

/// Validates a hash length is within 1..=12.
///
/// ```
/// use geomem::compute::validation::validate_hash_length;
///
/// assert!(validate_hash_length(1).is_ok());
/// assert!(validate_hash_length(12).is_ok());
/// assert!(validate_hash_length(0).is_err());
/// assert!(validate_hash_length(13).is_err());
/// ```
pub fn validate_hash_length(length: usize) -> Result<()> {
    if length == 0 {
        return Err(GeomemError::InvalidArgument(
            "Hash length must be greater than zero".to_string(),
        ));
    }

    if length > MAX_HASH_LENGTH {
        return Err(GeomemError::InvalidArgument(format!(
            "Hash length must be at most {}, got: {}",
            MAX_HASH_LENGTH, length
        )));
    }

    Ok(())
}

/// Validates a bounding box.
///
/// Corners must be finite, latitudes within range, the top edge must not be
/// below the bottom edge, and the raw western longitude must not exceed the
/// eastern one. Boxes crossing the antimeridian unwrap one of the edges.
///
/// ```
/// use geomem::compute::validation::validate_bounding_box;
/// use geomem_types::bbox::BoundingBox;
///
/// assert!(validate_bounding_box(&BoundingBox::new(-5.0, 100.0, -45.0, 170.0)).is_ok());
/// // dateline crossing, eastern edge unwrapped
/// assert!(validate_bounding_box(&BoundingBox::new(10.0, 170.0, -10.0, 190.0)).is_ok());
/// // corners swapped
/// assert!(validate_bounding_box(&BoundingBox::new(-45.0, 100.0, -5.0, 170.0)).is_err());
/// ```
pub fn validate_bounding_box(bbox: &BoundingBox) -> Result<()> {
    validate_latitude(bbox.top_left_lat)?;
    validate_latitude(bbox.bottom_right_lat)?;
    validate_longitude(bbox.top_left_lon)?;
    validate_longitude(bbox.bottom_right_lon)?;

    if bbox.top_left_lat < bbox.bottom_right_lat {
        return Err(GeomemError::InvalidArgument(format!(
            "Top left latitude {} must not be below bottom right latitude {}",
            bbox.top_left_lat, bbox.bottom_right_lat
        )));
    }

    if bbox.top_left_lon > bbox.bottom_right_lon {
        return Err(GeomemError::InvalidArgument(format!(
            "Top left longitude {} must not exceed bottom right longitude {}",
            bbox.top_left_lon, bbox.bottom_right_lon
        )));
    }

    Ok(())
}
