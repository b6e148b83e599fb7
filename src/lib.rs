//! Domoticz Exporter Library
//!
//! Polls the Domoticz device-status API on every scrape and exposes the
//! temperature (and, when reported, battery level) of each used temperature
//! device as a plain-text gauge.
//!
//! # Usage
//!
//! ```rust
//! use domoticz_exporter::device::DevicesResponse;
//! use domoticz_exporter::render::render_devices;
//!
//! let body = br#"{"result": [{"Name": "Living Room", "Temp": 21.5}]}"#;
//! let devices = DevicesResponse::from_slice(body).unwrap();
//!
//! assert_eq!(
//!     render_devices(&devices),
//!     "# HELP\n# TYPE living_room_temperature gauge\nliving_room_temperature 21.5"
//! );
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod handlers;
pub mod naming;
pub mod render;
pub mod state;
pub mod upstream;

// Re-export main types for convenience
pub use config::Config;
pub use error::ExporterError;
pub use handlers::router;
pub use naming::normalize;
pub use state::{AppState, SharedState};
pub use upstream::HubClient;
