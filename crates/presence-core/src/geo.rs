//! Geographic points and great-circle distance

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Mean Earth radius used by the haversine formula, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point from untrusted input, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Re-check a point that may have been deserialized without going through `new`
    pub fn validated(self) -> Result<Self, GeoError> {
        Self::new(self.latitude, self.longitude)
    }

    /// Distance to another point in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance(self, other)
    }
}

/// Great-circle distance between two points in meters (haversine, spherical Earth)
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    debug_assert!(
        a.latitude.is_finite()
            && a.longitude.is_finite()
            && b.latitude.is_finite()
            && b.longitude.is_finite(),
        "distance called with non-finite coordinates"
    );

    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push h slightly past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}
