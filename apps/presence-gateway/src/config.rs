//! Gateway configuration
//!
//! Command-line flags (with environment fallbacks, `.env` honoured) and an
//! optional TOML file holding the initial perimeter.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use presence_core::PerimeterConfig;
use serde::Deserialize;

/// Command-line arguments for the scan gateway
#[derive(Parser, Debug)]
#[command(name = "presence-gateway")]
#[command(about = "Geofence and QR checks in front of the attendance backend")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3002")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Base URL of the attendance backend REST API
    #[arg(
        long,
        env = "PRESENCE_BACKEND_URL",
        default_value = "http://localhost:8080/api"
    )]
    pub backend_url: String,

    /// Backend request timeout in milliseconds
    #[arg(long, env = "PRESENCE_BACKEND_TIMEOUT_MS", default_value = "10000")]
    pub backend_timeout_ms: u64,

    /// TOML file with the initial perimeter (defaults apply when absent)
    #[arg(long, env = "PRESENCE_PERIMETER_FILE")]
    pub perimeter_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Layout of the perimeter file
///
/// ```toml
/// [perimeter]
/// enabled = true
/// side_length = 100.0
///
/// [perimeter.center]
/// latitude = 6.1833023
/// longitude = 1.1467070
/// ```
#[derive(Debug, Deserialize)]
struct PerimeterFile {
    perimeter: PerimeterConfig,
}

/// Parse and validate a perimeter TOML document
pub fn perimeter_from_str(s: &str) -> anyhow::Result<PerimeterConfig> {
    let file: PerimeterFile = toml::from_str(s).context("Failed to parse perimeter TOML")?;
    file.perimeter
        .validate()
        .context("Perimeter file describes an unusable perimeter")?;
    Ok(file.perimeter)
}

pub fn perimeter_from_file(path: &Path) -> anyhow::Result<PerimeterConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read perimeter file: {}", path.display()))?;
    perimeter_from_str(&content)
}

/// Initial perimeter: the file when given, the built-in default otherwise
pub fn initial_perimeter(path: Option<&Path>) -> anyhow::Result<PerimeterConfig> {
    match path {
        Some(path) => perimeter_from_file(path),
        None => Ok(PerimeterConfig::default()),
    }
}
