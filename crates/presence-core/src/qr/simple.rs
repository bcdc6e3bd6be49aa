//! Colon-delimited identity tokens: `EMP:<registration>:<last name>:<first name>`
//!
//! Fields are not escaped, so a colon inside a name shifts the remaining
//! fields.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Leading tag of a simple token
pub const SIMPLE_TAG: &str = "EMP";

/// Last name used when the token carries none
pub const DEFAULT_LAST_NAME: &str = "Employé";

const DELIMITER: char = ':';

/// Identity carried by a simple token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleIdentity {
    pub registration_number: String,
    pub last_name: String,
    pub first_name: String,
}

pub fn encode_simple(registration_number: &str, last_name: &str, first_name: &str) -> String {
    format!(
        "{SIMPLE_TAG}{DELIMITER}{registration_number}{DELIMITER}{last_name}{DELIMITER}{first_name}"
    )
}

pub fn decode_simple(text: &str) -> Result<SimpleIdentity, DecodeError> {
    let mut segments = text.split(DELIMITER);

    if segments.next() != Some(SIMPLE_TAG) {
        return Err(DecodeError::BadTag);
    }
    let registration_number = segments.next().ok_or(DecodeError::BadTag)?;
    if registration_number.is_empty() {
        return Err(DecodeError::EmptyRegistrationNumber);
    }
    let last_name = segments.next().unwrap_or(DEFAULT_LAST_NAME);
    let first_name = segments.next().unwrap_or_default();

    Ok(SimpleIdentity {
        registration_number: registration_number.to_string(),
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
    })
}
