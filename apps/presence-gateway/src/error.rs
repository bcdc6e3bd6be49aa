//! Error types for the scan gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use presence_core::{
    GeoError, LocationFailure, PerimeterError, PositionError, ScanCodeError, ScanRequestError,
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    QrCode(#[from] ScanCodeError),

    #[error(transparent)]
    Location(#[from] LocationFailure),

    #[error("Invalid coordinates: {0}")]
    Coordinates(#[from] GeoError),

    #[error("Your position is required to record a presence")]
    LocationRequired,

    #[error("You are {distance_meters:.0} m from the site, outside the allowed area ({max_radius_meters:.0} m)")]
    OutsidePerimeter {
        distance_meters: f64,
        max_radius_meters: f64,
    },

    #[error(transparent)]
    InvalidPerimeter(#[from] PerimeterError),

    #[error(transparent)]
    InvalidScan(#[from] ScanRequestError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<PositionError> for GatewayError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::Location(failure) => GatewayError::Location(failure),
            PositionError::Coordinates(e) => GatewayError::Coordinates(e),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::QrCode(_) | GatewayError::Location(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GatewayError::Coordinates(_)
            | GatewayError::LocationRequired
            | GatewayError::InvalidPerimeter(_)
            | GatewayError::InvalidScan(_)
            | GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::OutsidePerimeter { .. } => StatusCode::FORBIDDEN,
            GatewayError::Unauthorized | GatewayError::Backend(BackendError::Unauthorized) => {
                StatusCode::UNAUTHORIZED
            }
            GatewayError::Backend(BackendError::Rejected { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            GatewayError::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::QrCode(e) => e.code(),
            GatewayError::Location(failure) => failure.code(),
            GatewayError::Coordinates(_) => "INVALID_COORDINATES",
            GatewayError::LocationRequired => "LOCATION_REQUIRED",
            GatewayError::OutsidePerimeter { .. } => "OUTSIDE_PERIMETER",
            GatewayError::InvalidPerimeter(_) => "INVALID_PERIMETER",
            GatewayError::InvalidScan(_) | GatewayError::InvalidRequest(_) => "INVALID_REQUEST",
            GatewayError::Unauthorized | GatewayError::Backend(BackendError::Unauthorized) => {
                "UNAUTHORIZED"
            }
            GatewayError::Backend(BackendError::Rejected { .. }) => "BACKEND_REJECTED",
            GatewayError::Backend(_) => "BACKEND_UNAVAILABLE",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        } else {
            tracing::debug!(code = self.code(), "request rejected: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}
