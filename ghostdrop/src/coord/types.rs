//! Coordinate value types and validation errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced when validating geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A position on the Earth's surface in decimal degrees.
///
/// Values are immutable once captured: a new reading replaces the old one,
/// it is never patched in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinates {
    /// Create validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError`] if either component is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create coordinates without range checks.
    ///
    /// Intended for trusted sources (platform fixes, constants, tests).
    pub const fn from_raw(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters.
    #[inline]
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        super::distance(*self, *other)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_range_limits() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(19.0, -98.2).is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range_latitude() {
        assert_eq!(
            Coordinates::new(90.5, 0.0),
            Err(CoordError::InvalidLatitude(90.5))
        );
        assert!(matches!(
            Coordinates::new(f64::NAN, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_new_rejects_out_of_range_longitude() {
        assert_eq!(
            Coordinates::new(0.0, -180.01),
            Err(CoordError::InvalidLongitude(-180.01))
        );
        assert!(matches!(
            Coordinates::new(0.0, f64::INFINITY),
            Err(CoordError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_display() {
        let coords = Coordinates::from_raw(19.0, -98.2);
        assert_eq!(coords.to_string(), "(19.000000, -98.200000)");
    }

    #[test]
    fn test_coord_error_display() {
        let err = CoordError::InvalidLatitude(91.0);
        assert!(err.to_string().contains("Invalid latitude"));
        assert!(err.to_string().contains("91"));
    }
}
