//! Presence scan gateway
//!
//! Sits between the kiosk front-end and the attendance backend. A scan is
//! only forwarded once the device position is inside the site perimeter and
//! the QR code decodes to a known badge format.
//!
//! Provides REST API endpoints for:
//!
//! - Presence scans (arrival, pause, departure)
//! - Perimeter inspection and live reconfiguration
//! - QR decoding and badge issuance
//!
//! ## Architecture
//!
//! Geofence and codec rules live in `presence-core`; this binary owns the
//! live perimeter, the backend client and the HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod backend;
mod config;
mod error;
mod state;

use api::{
    handle_check_perimeter, handle_decode_qr, handle_employee_qr, handle_get_perimeter,
    handle_health, handle_issue_rich_qr, handle_location_options, handle_scan,
    handle_update_perimeter,
};
use backend::HttpBackend;
use config::{initial_perimeter, Args};
use state::AppState;

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    // Kiosk front-ends are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Location
        .route("/api/location/options", get(handle_location_options))
        .route(
            "/api/perimeter",
            get(handle_get_perimeter).put(handle_update_perimeter),
        )
        .route("/api/perimeter/check", post(handle_check_perimeter))
        // QR codes
        .route("/api/qr/decode", post(handle_decode_qr))
        .route("/api/qr/rich", post(handle_issue_rich_qr))
        .route("/api/employees/:id/qr", get(handle_employee_qr))
        // Scans
        .route("/api/scan", post(handle_scan))
        // Apply middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting presence gateway on {}:{}", args.host, args.port);

    let perimeter = initial_perimeter(args.perimeter_file.as_deref())?;
    let backend = HttpBackend::new(&args.backend_url, args.backend_timeout_ms)?;

    info!("Backend: {}", backend.base_url());
    info!(
        "Perimeter: center ({}, {}), side {} m, radius {:.2} m",
        perimeter.center.latitude,
        perimeter.center.longitude,
        perimeter.side_length,
        perimeter.max_radius()
    );
    if !perimeter.enabled {
        warn!("Perimeter check is disabled at startup");
    }

    let state = Arc::new(AppState::new(perimeter, Arc::new(backend)));
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
