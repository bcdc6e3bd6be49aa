//! Presence events as exchanged with the attendance backend

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ScanRequestError;

/// Kind of presence event recorded by a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanAction {
    Arrival,
    PauseStart,
    PauseEnd,
    Departure,
    Other,
}

impl ScanAction {
    pub const ALL: [ScanAction; 5] = [
        ScanAction::Arrival,
        ScanAction::PauseStart,
        ScanAction::PauseEnd,
        ScanAction::Departure,
        ScanAction::Other,
    ];

    /// Wire name used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanAction::Arrival => "ARRIVAL",
            ScanAction::PauseStart => "PAUSE_START",
            ScanAction::PauseEnd => "PAUSE_END",
            ScanAction::Departure => "DEPARTURE",
            ScanAction::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanAction::Arrival => "Arrival",
            ScanAction::PauseStart => "Break start",
            ScanAction::PauseEnd => "Break end",
            ScanAction::Departure => "Departure",
            ScanAction::Other => "Other",
        }
    }

    /// Only free-form events need a reason
    pub fn requires_reason(&self) -> bool {
        matches!(self, ScanAction::Other)
    }
}

impl std::fmt::Display for ScanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the scan-ingestion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSubmission {
    pub qr_data: String,
    pub action: ScanAction,
    pub reason: String,
}

impl ScanSubmission {
    /// Build a submission, enforcing the reason rule.
    ///
    /// The reason is trimmed and only kept for `OTHER`; other actions always
    /// send an empty reason.
    pub fn new(
        qr_data: impl Into<String>,
        action: ScanAction,
        reason: Option<&str>,
    ) -> Result<Self, ScanRequestError> {
        let qr_data = qr_data.into();
        if qr_data.trim().is_empty() {
            return Err(ScanRequestError::EmptyQrData);
        }

        let reason = reason.map(str::trim).unwrap_or_default();
        let reason = if action.requires_reason() {
            if reason.is_empty() {
                return Err(ScanRequestError::ReasonRequired(action.as_str()));
            }
            reason.to_string()
        } else {
            String::new()
        };

        Ok(Self {
            qr_data,
            action,
            reason,
        })
    }
}

/// Presence record returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "employeId")]
    pub employee_id: Option<i64>,
    #[serde(default, rename = "nom")]
    pub name: Option<String>,
    #[serde(default, rename = "matricule")]
    pub registration_number: Option<String>,
    #[serde(default, rename = "datePresence")]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "heurePresence")]
    pub time: Option<NaiveTime>,
    pub action: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub scan_method: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_action_wire_names() {
        for action in ScanAction::ALL {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, action.as_str());
            let back: ScanAction = serde_json::from_value(json).unwrap();
            assert_eq!(back, action);
        }
    }

    #[test]
    fn test_only_other_requires_reason() {
        let requiring: Vec<_> = ScanAction::ALL
            .iter()
            .filter(|a| a.requires_reason())
            .collect();
        assert_eq!(requiring, vec![&ScanAction::Other]);
    }

    #[test]
    fn test_other_without_reason_is_rejected() {
        assert_eq!(
            ScanSubmission::new("EMP:1", ScanAction::Other, Some("   ")),
            Err(ScanRequestError::ReasonRequired("OTHER"))
        );
        assert_eq!(
            ScanSubmission::new("EMP:1", ScanAction::Other, None),
            Err(ScanRequestError::ReasonRequired("OTHER"))
        );
    }

    #[test]
    fn test_reason_dropped_for_regular_actions() {
        let submission =
            ScanSubmission::new("EMP:1", ScanAction::Arrival, Some("ignored")).unwrap();
        assert_eq!(submission.reason, "");

        let submission =
            ScanSubmission::new("EMP:1", ScanAction::Other, Some("  doctor visit ")).unwrap();
        assert_eq!(submission.reason, "doctor visit");
    }

    #[test]
    fn test_empty_qr_data_is_rejected() {
        assert_eq!(
            ScanSubmission::new(" ", ScanAction::Arrival, None),
            Err(ScanRequestError::EmptyQrData)
        );
    }

    #[test]
    fn test_submission_wire_format() {
        let submission = ScanSubmission::new("EMP:1:Doe:", ScanAction::PauseStart, None).unwrap();
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"qrData": "EMP:1:Doe:", "action": "PAUSE_START", "reason": ""})
        );
    }

    #[test]
    fn test_presence_record_from_backend() {
        let body = r#"{
            "id": 12,
            "employeId": 3,
            "nom": "Doe Jane",
            "matricule": "M001",
            "datePresence": "2025-03-14",
            "heurePresence": "08:02:11.5203",
            "action": "ARRIVAL",
            "status": "PRESENT",
            "notes": null,
            "scanMethod": "QR_CODE",
            "isActive": true
        }"#;
        let record: PresenceRecord = serde_json::from_str(body).unwrap();
        assert_eq!(record.id, Some(12));
        assert_eq!(record.registration_number.as_deref(), Some("M001"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(record.action, "ARRIVAL");
        assert!(record.notes.is_none());
    }
}
