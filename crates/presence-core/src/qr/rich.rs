//! Time-boxed JSON payloads
//!
//! A rich payload embeds its issue time and is only accepted for
//! `TOKEN_VALIDITY_MINUTES` afterwards, which lets a scanner reject
//! replayed codes without asking the backend.

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Value of the `type` field
pub const RICH_PAYLOAD_TYPE: &str = "employee_qr";

/// Value of the `version` field written by `encode_rich`
pub const RICH_PAYLOAD_VERSION: &str = "1.0";

/// How long a rich payload stays valid after issuance
pub const TOKEN_VALIDITY_MINUTES: i64 = 5;

/// Employee identifier as found in the payload; issuers write numbers, older codes strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeId {
    Numeric(i64),
    Text(String),
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeId::Numeric(id) => write!(f, "{}", id),
            EmployeeId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for EmployeeId {
    fn from(id: i64) -> Self {
        EmployeeId::Numeric(id)
    }
}

impl From<&str> for EmployeeId {
    fn from(id: &str) -> Self {
        EmployeeId::Text(id.to_string())
    }
}

/// A validated rich payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQrPayload {
    pub employee_id: EmployeeId,
    pub registration_number: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

impl EmployeeQrPayload {
    /// Time elapsed between issuance and `now`; negative for codes issued in the future
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }
}

pub fn encode_rich(employee_id: impl Into<EmployeeId>, registration_number: &str) -> String {
    encode_rich_at(employee_id, registration_number, Utc::now())
}

pub fn encode_rich_at(
    employee_id: impl Into<EmployeeId>,
    registration_number: &str,
    now: DateTime<Utc>,
) -> String {
    serde_json::json!({
        "employeeId": employee_id.into(),
        "registrationNumber": registration_number,
        "timestamp": now.to_rfc3339_opts(SecondsFormat::Millis, true),
        "type": RICH_PAYLOAD_TYPE,
        "version": RICH_PAYLOAD_VERSION,
    })
    .to_string()
}

pub fn validate_rich(text: &str) -> Result<EmployeeQrPayload, ValidationError> {
    validate_rich_at(text, Utc::now())
}

pub fn validate_rich_at(
    text: &str,
    now: DateTime<Utc>,
) -> Result<EmployeeQrPayload, ValidationError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ValidationError::Parse)?;
    let empty = Map::new();
    // Valid JSON that is not an object has none of the fields
    let fields = value.as_object().unwrap_or(&empty);

    let employee_id = required(fields, "employeeId")?;
    let registration_number = required(fields, "registrationNumber")?;
    let timestamp = required(fields, "timestamp")?;
    let kind = required(fields, "type")?;

    let kind = match kind {
        Value::String(s) if s == RICH_PAYLOAD_TYPE => s.clone(),
        other => return Err(ValidationError::WrongType(scalar_text(other))),
    };

    let timestamp = match timestamp {
        Value::String(s) => {
            parse_timestamp(s).ok_or_else(|| ValidationError::BadTimestamp(s.clone()))?
        }
        other => return Err(ValidationError::BadTimestamp(scalar_text(other))),
    };

    let age = now - timestamp;
    if age > Duration::minutes(TOKEN_VALIDITY_MINUTES) {
        return Err(ValidationError::Expired {
            age_minutes: age.num_minutes(),
        });
    }

    let employee_id = match employee_id {
        Value::Number(n) => match n.as_i64() {
            Some(id) => EmployeeId::Numeric(id),
            None => EmployeeId::Text(n.to_string()),
        },
        other => EmployeeId::Text(scalar_text(other)),
    };

    let version = fields
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(RICH_PAYLOAD_VERSION)
        .to_string();

    Ok(EmployeeQrPayload {
        employee_id,
        registration_number: scalar_text(registration_number),
        timestamp,
        kind,
        version,
    })
}

/// ISO 8601 date-time: RFC 3339, a colon-less offset, or no offset (taken as UTC)
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.and_utc())
}

/// Absent, null, false, zero and empty strings all count as missing
fn required<'a>(
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {
            Err(ValidationError::MissingField(name))
        }
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::MissingField(name)),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
            Err(ValidationError::MissingField(name))
        }
        Some(value) => Ok(value),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
