//! Application state container
//!
//! This module defines the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::services::{RpcServiceHandler, ServiceHandler};

/// Shared application state
///
/// Holds the immutable resources every handler needs: the settings and the
/// backend facade. Cheaply cloneable via Arc and thread-safe; there is no
/// mutable shared state in this layer.
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Backend service facade
    pub service: Arc<dyn ServiceHandler>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create the application state with the RPC-backed service facade.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let settings = Arc::new(settings);
        let service = Arc::new(RpcServiceHandler::new(&settings)?);

        Ok(Self {
            settings,
            service,
            start_time: Instant::now(),
        })
    }

    /// Build a state around an arbitrary facade, used by handler tests.
    #[cfg(test)]
    pub fn with_service(service: Arc<dyn ServiceHandler>) -> Self {
        Self {
            settings: Arc::new(Settings::default()),
            service,
            start_time: Instant::now(),
        }
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
