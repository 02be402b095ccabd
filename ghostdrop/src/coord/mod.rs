//! Great-circle distance between geographic coordinates.
//!
//! Provides the [`Coordinates`] value type and the haversine [`distance`]
//! function used to decide whether a viewer is inside a listing's radius.
//!
//! Inputs are always decimal degrees and the output is always meters.

mod types;

pub use types::{CoordError, Coordinates, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Computes the great-circle surface distance between two points in meters.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_M`].
/// The intermediate term is clamped to `[0, 1]` because rounding can push
/// it fractionally past 1 for identical or antipodal points.
///
/// The function is total and symmetric, and `distance(a, a) == 0`.
///
/// # Example
///
/// ```
/// use ghostdrop::coord::{distance, Coordinates};
///
/// let target = Coordinates::from_raw(19.0, -98.2);
/// let viewer = Coordinates::from_raw(19.001, -98.2);
/// let meters = distance(viewer, target);
/// assert!((meters - 111.19).abs() < 0.1);
/// ```
#[inline]
pub fn distance(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    // Absolute deltas keep the result bit-for-bit symmetric in (a, b).
    let delta_phi = (b.latitude - a.latitude).abs().to_radians();
    let delta_lambda = (b.longitude - a.longitude).abs().to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}
