//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("domoticz-exporter.yaml"));

    let mut content = render_config(&config, format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Domoticz Exporter Configuration
# ===============================
#
# Server Configuration
# --------------------
# bind: "0.0.0.0"              # Bind IP (0.0.0.0 = all interfaces, 127.0.0.1 = local only)
# port: 9192                   # HTTP port
#
# Domoticz Hub
# ------------
# hub_url: "http://localhost:8088"  # Base URL; json.htm?type=devices... is appended
# timeout_secs: 10             # Per-request timeout towards the hub
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
