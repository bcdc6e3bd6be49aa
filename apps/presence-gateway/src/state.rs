//! Application state for the scan gateway

use std::sync::Arc;

use presence_core::{PerimeterConfig, PerimeterError, PerimeterUpdate};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::backend::PresenceBackend;

/// Owner of the live perimeter configuration.
///
/// Readers get a copy; updates are merged off-lock and swapped in whole, so
/// a reader never sees half of an update.
#[derive(Default)]
pub struct PerimeterStore {
    current: RwLock<PerimeterConfig>,
}

impl PerimeterStore {
    pub fn new(initial: PerimeterConfig) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    pub async fn snapshot(&self) -> PerimeterConfig {
        *self.current.read().await
    }

    pub async fn update(&self, update: &PerimeterUpdate) -> Result<PerimeterConfig, PerimeterError> {
        let mut current = self.current.write().await;
        let next = current.apply(update)?;
        *current = next;

        info!(
            latitude = next.center.latitude,
            longitude = next.center.longitude,
            side_length = next.side_length,
            enabled = next.enabled,
            "perimeter configuration updated"
        );
        if !next.enabled {
            warn!("perimeter check is disabled, all positions will be accepted");
        }
        Ok(next)
    }
}

/// Shared application state
pub struct AppState {
    pub perimeter: PerimeterStore,
    pub backend: Arc<dyn PresenceBackend>,
}

impl AppState {
    pub fn new(perimeter: PerimeterConfig, backend: Arc<dyn PresenceBackend>) -> Self {
        Self {
            perimeter: PerimeterStore::new(perimeter),
            backend,
        }
    }
}
