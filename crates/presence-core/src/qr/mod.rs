//! QR payload codec
//!
//! Two formats coexist:
//! - simple: `EMP:<registration>:<last>:<first>`, compact enough for printed
//!   badges; freshness is not checked, the backend resolves the employee
//! - rich: a JSON object with an issue timestamp, rejected once stale
//!
//! `decode_scan` dispatches on the scanned text and keeps each format's own
//! rules.

pub mod rich;
pub mod simple;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ScanCodeError;

pub use rich::{
    encode_rich, encode_rich_at, validate_rich, validate_rich_at, EmployeeId, EmployeeQrPayload,
    RICH_PAYLOAD_TYPE, RICH_PAYLOAD_VERSION, TOKEN_VALIDITY_MINUTES,
};
pub use simple::{decode_simple, encode_simple, SimpleIdentity, DEFAULT_LAST_NAME, SIMPLE_TAG};

/// A successfully decoded scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ScannedCode {
    Simple {
        #[serde(flatten)]
        identity: SimpleIdentity,
    },
    Rich {
        #[serde(flatten)]
        payload: EmployeeQrPayload,
    },
}

impl ScannedCode {
    pub fn registration_number(&self) -> &str {
        match self {
            ScannedCode::Simple { identity } => &identity.registration_number,
            ScannedCode::Rich { payload } => &payload.registration_number,
        }
    }

    /// Text to send as `qrData` to the scan-ingestion endpoint.
    ///
    /// Always the full simple form with a non-empty last name: the backend
    /// drops trailing empty segments and needs at least three. Rich payloads
    /// get the placeholder last name.
    pub fn ingestion_payload(&self) -> String {
        match self {
            ScannedCode::Simple { identity } => {
                let last_name = if identity.last_name.is_empty() {
                    DEFAULT_LAST_NAME
                } else {
                    &identity.last_name
                };
                encode_simple(
                    &identity.registration_number,
                    last_name,
                    &identity.first_name,
                )
            }
            ScannedCode::Rich { payload } => {
                encode_simple(&payload.registration_number, DEFAULT_LAST_NAME, "")
            }
        }
    }
}

pub fn decode_scan(text: &str) -> Result<ScannedCode, ScanCodeError> {
    decode_scan_at(text, Utc::now())
}

pub fn decode_scan_at(text: &str, now: DateTime<Utc>) -> Result<ScannedCode, ScanCodeError> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        let payload = validate_rich_at(trimmed, now)?;
        return Ok(ScannedCode::Rich { payload });
    }
    let identity = decode_simple(trimmed)?;
    Ok(ScannedCode::Simple { identity })
}
