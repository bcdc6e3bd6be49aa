//! API handlers for the scan gateway
//!
//! Provides REST endpoints for:
//! - Presence scans (geofence + QR checks, then forwarded to the backend)
//! - Perimeter configuration
//! - QR decoding and issuance

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use presence_core::{
    decode_scan, encode_rich, LocationRequestOptions, PerimeterCheck, PerimeterConfig,
    PerimeterUpdate, PositionReport, PresenceRecord, ScanAction, ScanSubmission, ScannedCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::state::AppState;

type SharedState = Arc<AppState>;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "presence-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET /api/location/options
pub async fn handle_location_options() -> Json<LocationRequestOptions> {
    Json(LocationRequestOptions::default())
}

// ============================================================
// Authentication
// ============================================================

/// Extract the bearer token and have the backend vouch for it
async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<String, GatewayError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(GatewayError::Unauthorized)?;

    if !state.backend.validate_token(token).await? {
        debug!("bearer token rejected by backend");
        return Err(GatewayError::Unauthorized);
    }
    Ok(token.to_string())
}

// ============================================================
// Perimeter
// ============================================================

/// Handler: GET /api/perimeter
pub async fn handle_get_perimeter(State(state): State<SharedState>) -> Json<PerimeterConfig> {
    Json(state.perimeter.snapshot().await)
}

/// Handler: PUT /api/perimeter
pub async fn handle_update_perimeter(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(update): Json<PerimeterUpdate>,
) -> Result<Json<PerimeterConfig>, GatewayError> {
    require_admin(&state, &headers).await?;

    if update.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Provide at least one of center, sideLength or enabled".into(),
        ));
    }

    let updated = state.perimeter.update(&update).await?;
    Ok(Json(updated))
}

/// Coordinates to test against the perimeter
#[derive(Deserialize)]
pub struct PerimeterCheckRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Handler: POST /api/perimeter/check
pub async fn handle_check_perimeter(
    State(state): State<SharedState>,
    Json(req): Json<PerimeterCheckRequest>,
) -> Result<Json<PerimeterCheck>, GatewayError> {
    let point = presence_core::GeoPoint::new(req.latitude, req.longitude)?;
    let config = state.perimeter.snapshot().await;
    Ok(Json(config.check(&point)))
}

// ============================================================
// QR codes
// ============================================================

/// Raw scanner output
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeRequest {
    pub qr_data: String,
}

/// Decoded QR code
#[derive(Serialize)]
pub struct DecodeResponse {
    pub success: bool,
    pub code: ScannedCode,
}

/// Handler: POST /api/qr/decode
pub async fn handle_decode_qr(
    Json(req): Json<DecodeRequest>,
) -> Result<Json<DecodeResponse>, GatewayError> {
    let code = decode_scan(&req.qr_data)?;
    Ok(Json(DecodeResponse {
        success: true,
        code,
    }))
}

/// Request for a time-boxed QR payload
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichQrRequest {
    pub employee_id: i64,
    pub registration_number: String,
}

/// QR payload to render
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrDataResponse {
    pub success: bool,
    pub qr_data: String,
}

/// Handler: POST /api/qr/rich
pub async fn handle_issue_rich_qr(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<RichQrRequest>,
) -> Result<Json<QrDataResponse>, GatewayError> {
    require_admin(&state, &headers).await?;

    let registration_number = req.registration_number.trim();
    if registration_number.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "registrationNumber must not be empty".into(),
        ));
    }

    info!(employee_id = req.employee_id, "issuing rich QR payload");
    Ok(Json(QrDataResponse {
        success: true,
        qr_data: encode_rich(req.employee_id, registration_number),
    }))
}

/// Handler: GET /api/employees/:id/qr
pub async fn handle_employee_qr(
    State(state): State<SharedState>,
    Path(employee_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<QrDataResponse>, GatewayError> {
    let token = require_admin(&state, &headers).await?;

    let qr_data = state.backend.employee_qr(&token, employee_id).await?;
    // Refuse to hand out a badge the scanner would not accept
    decode_scan(&qr_data)?;

    Ok(Json(QrDataResponse {
        success: true,
        qr_data,
    }))
}

// ============================================================
// Scans
// ============================================================

/// Scan request from the kiosk front-end
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub qr_data: String,
    pub action: ScanAction,
    #[serde(default)]
    pub reason: Option<String>,
    /// Outcome of the device position query; required while the perimeter is enforced
    #[serde(default)]
    pub position: Option<PositionReport>,
}

/// Recorded scan
#[derive(Serialize)]
pub struct ScanResponse {
    pub success: bool,
    pub message: String,
    pub employee: ScannedCode,
    pub presence: PresenceRecord,
}

/// Handler: POST /api/scan
pub async fn handle_scan(
    State(state): State<SharedState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, GatewayError> {
    let action = req.action;
    // Reject a missing reason before asking for anything else
    ScanSubmission::new(req.qr_data.clone(), action, req.reason.as_deref())?;

    let perimeter = state.perimeter.snapshot().await;
    if perimeter.enabled {
        let point = req
            .position
            .ok_or(GatewayError::LocationRequired)?
            .into_point()?;
        let check = perimeter.check(&point);
        if !check.inside {
            info!(
                distance_meters = check.distance_meters,
                max_radius_meters = check.max_radius_meters,
                "scan rejected outside perimeter"
            );
            return Err(GatewayError::OutsidePerimeter {
                distance_meters: check.distance_meters,
                max_radius_meters: check.max_radius_meters,
            });
        }
    } else {
        warn!("perimeter check is disabled, accepting scan without position check");
    }

    let code = decode_scan(&req.qr_data)?;
    let submission =
        ScanSubmission::new(code.ingestion_payload(), action, req.reason.as_deref())?;

    let presence = state.backend.submit_scan(&submission).await?;

    info!(
        registration_number = code.registration_number(),
        action = %action,
        "presence recorded"
    );

    Ok(Json(ScanResponse {
        success: true,
        message: format!("{} recorded successfully", action.label()),
        employee: code,
        presence,
    }))
}
