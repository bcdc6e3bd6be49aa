//! Client for the attendance backend REST API

use std::time::Duration;

use async_trait::async_trait;
use presence_core::{PresenceRecord, ScanSubmission};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend answered with a client error; `message` is its own wording
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Backend rejected the credentials")]
    Unauthorized,

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected backend response: {0}")]
    InvalidResponse(String),
}

/// Operations the gateway needs from the backend
#[async_trait]
pub trait PresenceBackend: Send + Sync {
    /// Record a presence event from a scanned code (unauthenticated endpoint)
    async fn submit_scan(&self, submission: &ScanSubmission)
        -> Result<PresenceRecord, BackendError>;

    /// Check an administrator bearer token
    async fn validate_token(&self, token: &str) -> Result<bool, BackendError>;

    /// Text to print on an employee's badge QR code
    async fn employee_qr(&self, token: &str, employee_id: i64) -> Result<String, BackendError>;
}

/// `reqwest` implementation
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct ValidateBody {
    success: Option<bool>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| BackendError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response, keeping the backend's message when it sent one
    async fn failure(resp: Response, fallback: &str) -> BackendError {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return BackendError::Unauthorized;
        }
        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| fallback.to_string());
        if status.is_client_error() {
            BackendError::Rejected {
                status: status.as_u16(),
                message,
            }
        } else {
            warn!(status = status.as_u16(), "backend error: {}", message);
            BackendError::Unavailable(format!("backend returned {status}: {message}"))
        }
    }
}

fn transport(e: reqwest::Error) -> BackendError {
    BackendError::Unavailable(e.to_string())
}

#[async_trait]
impl PresenceBackend for HttpBackend {
    async fn submit_scan(
        &self,
        submission: &ScanSubmission,
    ) -> Result<PresenceRecord, BackendError> {
        debug!(action = %submission.action, "forwarding scan to backend");
        let resp = self
            .client
            .post(self.url("/presences/scan"))
            .json(submission)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp, "Scan could not be recorded").await);
        }

        resp.json::<PresenceRecord>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn validate_token(&self, token: &str) -> Result<bool, BackendError> {
        let resp = self
            .client
            .get(self.url("/auth/validate"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(Self::failure(resp, "Token validation failed").await);
        }
        // An empty or non-JSON body still means valid; only an explicit `success: false` does not
        let body = resp.json::<ValidateBody>().await.ok();
        Ok(body.and_then(|b| b.success) != Some(false))
    }

    async fn employee_qr(&self, token: &str, employee_id: i64) -> Result<String, BackendError> {
        let resp = self
            .client
            .get(self.url(&format!("/employes/{employee_id}/qr")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp, "QR code generation failed").await);
        }

        resp.text().await.map_err(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Json, Router};
    use serde_json::json;

    /// Serve `/api/auth/validate` with a fixed answer; returns the base URL
    async fn spawn_validate_stub(status: AxumStatus, body: serde_json::Value) -> String {
        let app = Router::new().route(
            "/api/auth/validate",
            get(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    async fn validate_against(
        status: AxumStatus,
        body: serde_json::Value,
    ) -> Result<bool, BackendError> {
        let base = spawn_validate_stub(status, body).await;
        let backend = HttpBackend::new(base, 2000).unwrap();
        backend.validate_token("some-token").await
    }

    #[tokio::test]
    async fn test_validate_token_accepts_success() {
        assert!(validate_against(AxumStatus::OK, json!({ "success": true }))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_validate_token_explicit_failure_body() {
        assert!(!validate_against(AxumStatus::OK, json!({ "success": false }))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_validate_token_rejected_credentials() {
        for status in [AxumStatus::UNAUTHORIZED, AxumStatus::FORBIDDEN] {
            assert!(!validate_against(status, json!({})).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_validate_token_outage_is_unavailable() {
        let err = validate_against(
            AxumStatus::SERVICE_UNAVAILABLE,
            json!({ "message": "maintenance" }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(_)), "got {:?}", err);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let backend = HttpBackend::new("http://localhost:8080/api/", 1000).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080/api");
        assert_eq!(
            backend.url("/presences/scan"),
            "http://localhost:8080/api/presences/scan"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        // Port 9 (discard) is not expected to host an HTTP server
        let backend = HttpBackend::new("http://127.0.0.1:9/api", 500).unwrap();
        let submission = ScanSubmission::new(
            "EMP:M001:Doe:Jane",
            presence_core::ScanAction::Arrival,
            None,
        )
        .unwrap();
        let err = backend.submit_scan(&submission).await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(_)), "got {:?}", err);
    }

    #[test]
    fn test_rejection_displays_backend_message() {
        let err = BackendError::Rejected {
            status: 400,
            message: "Action already recorded today".into(),
        };
        assert_eq!(err.to_string(), "Action already recorded today");
    }
}
