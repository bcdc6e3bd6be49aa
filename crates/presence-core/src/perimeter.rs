//! Square catchment area around a configured center
//!
//! The square is approximated by its circumscribed circle: a point is inside
//! when its distance to the center is at most `(side / 2) * sqrt(2)`. The
//! accepted region is therefore larger than the nominal square near the
//! corners.

use serde::{Deserialize, Serialize};

use crate::error::PerimeterError;
use crate::geo::{distance, GeoPoint};

/// Default catchment center
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    latitude: 6.1833023,
    longitude: 1.1467070,
};

/// Default side length of the square, in meters
pub const DEFAULT_SIDE_LENGTH_METERS: f64 = 100.0;

/// Live geofence settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerimeterConfig {
    pub center: GeoPoint,
    /// Side of the square, in meters
    #[serde(alias = "side_length")]
    pub side_length: f64,
    /// When false every point is accepted
    pub enabled: bool,
}

impl Default for PerimeterConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            side_length: DEFAULT_SIDE_LENGTH_METERS,
            enabled: true,
        }
    }
}

/// Partial configuration; omitted fields keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerimeterUpdate {
    #[serde(default)]
    pub center: Option<GeoPoint>,
    #[serde(default, alias = "side_length")]
    pub side_length: Option<f64>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl PerimeterUpdate {
    pub fn is_empty(&self) -> bool {
        self.center.is_none() && self.side_length.is_none() && self.enabled.is_none()
    }
}

/// Outcome of a containment check, with the numbers behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerimeterCheck {
    pub inside: bool,
    pub distance_meters: f64,
    pub max_radius_meters: f64,
    /// False when the perimeter is disabled and the point was accepted unconditionally
    pub enforced: bool,
}

impl PerimeterConfig {
    /// Radius of the circle circumscribing the square
    pub fn max_radius(&self) -> f64 {
        (self.side_length / 2.0) * std::f64::consts::SQRT_2
    }

    /// Check that the configuration can be enforced
    pub fn validate(&self) -> Result<(), PerimeterError> {
        self.center.validated()?;
        if !self.side_length.is_finite() || self.side_length <= 0.0 {
            return Err(PerimeterError::InvalidSideLength(self.side_length));
        }
        Ok(())
    }

    /// Merge a partial update into a new configuration.
    ///
    /// The current value is left untouched; the caller swaps in the returned
    /// value. A merged configuration that fails `validate` is rejected.
    pub fn apply(&self, update: &PerimeterUpdate) -> Result<PerimeterConfig, PerimeterError> {
        let merged = PerimeterConfig {
            center: update.center.unwrap_or(self.center),
            side_length: update.side_length.unwrap_or(self.side_length),
            enabled: update.enabled.unwrap_or(self.enabled),
        };
        merged.validate()?;
        Ok(merged)
    }

    /// Run the containment check and report the distances involved
    pub fn check(&self, point: &GeoPoint) -> PerimeterCheck {
        let distance_meters = distance(point, &self.center);
        let max_radius_meters = self.max_radius();
        PerimeterCheck {
            inside: is_within_perimeter(point, self),
            distance_meters,
            max_radius_meters,
            enforced: self.enabled,
        }
    }
}

/// True when `point` lies inside the configured perimeter, or the perimeter is disabled
pub fn is_within_perimeter(point: &GeoPoint, config: &PerimeterConfig) -> bool {
    if !config.enabled {
        tracing::warn!("perimeter check disabled, accepting position");
        return true;
    }
    distance(point, &config.center) <= config.max_radius()
}
