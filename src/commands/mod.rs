//! CLI command implementations for domoticz-exporter.
//!
//! This module provides implementations for all CLI subcommands:
//! - `test`: One fetch-and-render against the configured hub
//! - `config`: Configuration file generation

pub mod config;
pub mod test;

// Re-export command functions
pub use config::command_config;
pub use test::command_test;
