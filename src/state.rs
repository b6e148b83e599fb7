//! Application state shared with the HTTP handlers.
//!
//! The state is immutable after startup: every request performs its own
//! fetch through the shared client, so no locking is involved.

use std::sync::Arc;

use crate::config::Config;
use crate::upstream::HubClient;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub hub: HubClient,
}

impl AppState {
    /// Builds the hub client from an already validated configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<SharedState> {
        let hub = HubClient::new(config.hub_url(), config.timeout())?;
        Ok(Arc::new(Self { hub }))
    }
}
