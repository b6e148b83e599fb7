//! Error types for hub access and configuration.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Failure of a single fetch-and-render cycle.
///
/// All variants are answered with the same `500` plain-text response; the
/// message carries the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    #[error("Domoticz hub unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    #[error("Domoticz hub returned HTTP {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Domoticz hub returned a malformed device list: {0}")]
    UpstreamMalformed(#[source] serde_json::Error),
}

impl ExporterError {
    /// Short machine-friendly kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ExporterError::UpstreamUnreachable(e) if e.is_timeout() => "timeout",
            ExporterError::UpstreamUnreachable(_) => "unreachable",
            ExporterError::UpstreamStatus(_) => "status",
            ExporterError::UpstreamMalformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for ExporterError {
    fn from(e: reqwest::Error) -> Self {
        ExporterError::UpstreamUnreachable(e)
    }
}

impl From<serde_json::Error> for ExporterError {
    fn from(e: serde_json::Error) -> Self {
        ExporterError::UpstreamMalformed(e)
    }
}

impl IntoResponse for ExporterError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            self.to_string(),
        )
            .into_response()
    }
}

/// Hub URL that cannot be turned into a device-listing URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HubUrlError(pub String);

/// Invalid effective configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("Port must be between 1 and 65535")]
    InvalidPort,

    #[error("Invalid hub_url '{url}': {reason}")]
    InvalidHubUrl { url: String, reason: String },

    #[error("timeout_secs must be greater than 0")]
    InvalidTimeout,

    #[error("Invalid log_level '{0}', expected one of off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}
