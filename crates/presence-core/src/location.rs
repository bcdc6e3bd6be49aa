//! Device geolocation outcomes
//!
//! The device query itself runs on the client. This module fixes the options
//! that query must use and classifies what comes back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PositionError;
use crate::geo::GeoPoint;

/// How long the device may take to produce a fix, in milliseconds
pub const LOCATION_TIMEOUT_MS: u64 = 20_000;

/// Why the device could not produce a position. Always retryable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationFailure {
    #[error("Location permission denied. Enable geolocation in your browser settings.")]
    PermissionDenied,

    #[error("Position unavailable. Check your connection or GPS.")]
    PositionUnavailable,

    #[error("Location request timed out. Please try again.")]
    Timeout,

    #[error("Geolocation is not supported by this device.")]
    Unsupported,
}

impl LocationFailure {
    pub fn code(&self) -> &'static str {
        match self {
            LocationFailure::PermissionDenied => "LOCATION_PERMISSION_DENIED",
            LocationFailure::PositionUnavailable => "LOCATION_POSITION_UNAVAILABLE",
            LocationFailure::Timeout => "LOCATION_TIMEOUT",
            LocationFailure::Unsupported => "LOCATION_UNSUPPORTED",
        }
    }
}

/// Options for the client-side position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequestOptions {
    pub enable_high_accuracy: bool,
    pub timeout: u64,
    /// Zero disables cached fixes
    pub maximum_age: u64,
}

impl Default for LocationRequestOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: LOCATION_TIMEOUT_MS,
            maximum_age: 0,
        }
    }
}

/// What the client reports after querying its device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionReport {
    Fix {
        latitude: f64,
        longitude: f64,
        /// Reported accuracy radius in meters, informational only
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accuracy: Option<f64>,
    },
    Failed {
        error: LocationFailure,
    },
}

impl PositionReport {
    pub fn into_point(self) -> Result<GeoPoint, PositionError> {
        match self {
            PositionReport::Fix {
                latitude,
                longitude,
                ..
            } => Ok(GeoPoint::new(latitude, longitude)?),
            PositionReport::Failed { error } => Err(error.into()),
        }
    }
}
