use thiserror::Error;

use crate::location::LocationFailure;

/// Coordinates rejected at construction time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Latitude must be a finite value between -90 and 90, got {0}")]
    InvalidLatitude(f64),

    #[error("Longitude must be a finite value between -180 and 180, got {0}")]
    InvalidLongitude(f64),
}

/// A perimeter configuration that cannot be enforced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerimeterError {
    #[error("Side length must be a positive number of meters, got {0}")]
    InvalidSideLength(f64),

    #[error("Invalid perimeter center: {0}")]
    InvalidCenter(#[from] GeoError),
}

/// Failure to decode a simple `EMP:...` token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid QR code format")]
    BadTag,

    #[error("QR code does not carry a registration number")]
    EmptyRegistrationNumber,
}

impl DecodeError {
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::BadTag => "QR_BAD_TAG",
            DecodeError::EmptyRegistrationNumber => "QR_EMPTY_REGISTRATION",
        }
    }
}

/// Failure to validate a rich JSON payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Could not read QR code data")]
    Parse,

    #[error("Invalid QR data: missing field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid QR code type: {0}")]
    WrongType(String),

    #[error("Invalid date in QR data: {0}")]
    BadTimestamp(String),

    #[error("QR code expired {age_minutes} minutes ago, ask for a fresh code")]
    Expired { age_minutes: i64 },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Parse => "QR_PARSE_ERROR",
            ValidationError::MissingField(_) => "QR_MISSING_FIELD",
            ValidationError::WrongType(_) => "QR_WRONG_TYPE",
            ValidationError::BadTimestamp(_) => "QR_BAD_TIMESTAMP",
            ValidationError::Expired { .. } => "QR_EXPIRED",
        }
    }
}

/// Error from the unified decode entry point
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanCodeError {
    #[error(transparent)]
    Simple(#[from] DecodeError),

    #[error(transparent)]
    Rich(#[from] ValidationError),
}

impl ScanCodeError {
    pub fn code(&self) -> &'static str {
        match self {
            ScanCodeError::Simple(e) => e.code(),
            ScanCodeError::Rich(e) => e.code(),
        }
    }
}

/// A client position report that cannot be turned into a point
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error(transparent)]
    Location(#[from] LocationFailure),

    #[error(transparent)]
    Coordinates(#[from] GeoError),
}

/// A scan submission rejected before reaching the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanRequestError {
    #[error("A reason is required for the {0} action")]
    ReasonRequired(&'static str),

    #[error("Scanned QR data is empty")]
    EmptyQrData,
}
