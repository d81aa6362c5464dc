//! Geographic position of a location.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Position`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    /// Latitude is not a finite number in `[-90, 90]`.
    #[error("latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),
    /// Longitude is not a finite number in `[-180, 180]`.
    #[error("longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),
}

/// A latitude/longitude pair in decimal degrees.
///
/// Serialized as `{"lat": .., "lng": ..}`.
///
/// ## Examples
///
/// ```
/// use hotspots_core::Position;
///
/// assert!(Position::new(40.0, -75.0).is_ok());
/// assert!(Position::new(91.0, 0.0).is_err());
/// assert!(Position::new(0.0, -180.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees, `[-90, 90]`.
    pub lat: f64,
    /// Longitude in degrees, `[-180, 180]`.
    pub lng: f64,
}

impl Position {
    /// Inclusive latitude bound.
    pub const MAX_LATITUDE: f64 = 90.0;
    /// Inclusive longitude bound.
    pub const MAX_LONGITUDE: f64 = 180.0;

    /// Create a position, checking both coordinates are in range.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] for the first coordinate that is out of range
    /// or not finite.
    pub fn new(lat: f64, lng: f64) -> Result<Self, PositionError> {
        check_latitude(lat)?;
        check_longitude(lng)?;
        Ok(Self { lat, lng })
    }
}

/// Check a latitude on its own.
///
/// # Errors
///
/// Returns `PositionError::LatitudeOutOfRange` if `lat` is outside `[-90, 90]`.
pub fn check_latitude(lat: f64) -> Result<f64, PositionError> {
    if lat.is_finite() && lat.abs() <= Position::MAX_LATITUDE {
        Ok(lat)
    } else {
        Err(PositionError::LatitudeOutOfRange(lat))
    }
}

/// Check a longitude on its own.
///
/// # Errors
///
/// Returns `PositionError::LongitudeOutOfRange` if `lng` is outside `[-180, 180]`.
pub fn check_longitude(lng: f64) -> Result<f64, PositionError> {
    if lng.is_finite() && lng.abs() <= Position::MAX_LONGITUDE {
        Ok(lng)
    } else {
        Err(PositionError::LongitudeOutOfRange(lng))
    }
}
