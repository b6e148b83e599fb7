//! HTTP endpoint handlers for the exporter.
//!
//! Every GET request, whatever its path, is answered by
//! [`metrics_handler`]: the hub is queried once and the rendered gauges are
//! returned as plain text.

pub mod metrics;

use axum::{routing::get, Router};

use crate::state::SharedState;

pub use metrics::metrics_handler;

/// Builds the router. `/` and every other path share the metrics handler;
/// methods other than GET are rejected with `405` without contacting the hub.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(metrics_handler))
        .route("/{*path}", get(metrics_handler))
        .with_state(state)
}
