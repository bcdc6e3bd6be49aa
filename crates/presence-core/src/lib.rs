//! Presence scan core
//!
//! Pure domain logic shared by the scan gateway and any other front-end:
//! - `geo` / `perimeter`: haversine distance and the square catchment check
//! - `qr`: simple (`EMP:...`) and rich (JSON) QR payload codec
//! - `location`: classification of device geolocation outcomes
//! - `presence`: scan actions and the scan-ingestion request model
//!
//! Nothing in this crate performs I/O.

pub mod error;
pub mod geo;
pub mod location;
pub mod perimeter;
pub mod presence;
pub mod qr;

pub use error::{
    DecodeError, GeoError, PerimeterError, PositionError, ScanCodeError, ScanRequestError,
    ValidationError,
};
pub use geo::{distance, GeoPoint, EARTH_RADIUS_METERS};
pub use location::{LocationFailure, LocationRequestOptions, PositionReport};
pub use perimeter::{is_within_perimeter, PerimeterCheck, PerimeterConfig, PerimeterUpdate};
pub use presence::{PresenceRecord, ScanAction, ScanSubmission};
pub use qr::{
    decode_scan, decode_scan_at, decode_simple, encode_rich, encode_rich_at, encode_simple,
    validate_rich, validate_rich_at, EmployeeId, EmployeeQrPayload, ScannedCode, SimpleIdentity,
};
