//! Scrape handler.
//!
//! Each request performs one fetch against the hub and answers with the
//! rendered gauges, or with a `500` carrying the error text when the hub is
//! unreachable or its answer cannot be parsed.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::error::ExporterError;
use crate::state::SharedState;

/// Handler for every GET request.
#[instrument(skip(state))]
pub async fn metrics_handler(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ExporterError> {
    let start = Instant::now();
    debug!("Processing scrape request");

    let body = state.hub.fetch_and_render().await.map_err(|e| {
        error!(kind = e.kind(), "Scrape failed: {}", e);
        e
    })?;

    debug!(
        "Scrape served in {:.2}ms ({} bytes)",
        start.elapsed().as_secs_f64() * 1000.0,
        body.len()
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        body,
    ))
}
