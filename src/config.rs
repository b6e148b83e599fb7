//! Configuration management for domoticz-exporter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use crate::error::ConfigError;
use crate::upstream::devices_url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9192;
pub const DEFAULT_HUB_URL: &str = "http://localhost:8088";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Locations probed when no `--config` is given.
const DEFAULT_CONFIG_PATHS: [&str; 6] = [
    "/etc/domoticz-exporter/config.yaml",
    "/etc/domoticz-exporter/config.yml",
    "/etc/domoticz-exporter/config.json",
    "./domoticz-exporter.yaml",
    "./domoticz-exporter.yml",
    "./domoticz-exporter.json",
];

/// Exporter configuration. Missing keys fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    // Upstream hub
    #[serde(alias = "hub-url")]
    pub hub_url: Option<String>,
    #[serde(alias = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            port: Some(DEFAULT_PORT),
            hub_url: Some(DEFAULT_HUB_URL.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn bind_addr(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn hub_url(&self) -> &str {
        self.hub_url.as_deref().unwrap_or(DEFAULT_HUB_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Effective log level; an unparsable value falls back to `info` (it is
    /// rejected by [`validate_effective_config`] before the server starts).
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::from_config_str)
            .unwrap_or(LogLevel::Info)
    }

    /// Socket address to listen on.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_addr()
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.bind_addr().to_string()))?;
        Ok(SocketAddr::new(ip, self.port()))
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    cfg.listen_addr()?;

    if cfg.port() == 0 {
        return Err(ConfigError::InvalidPort);
    }

    if let Err(e) = devices_url(cfg.hub_url()) {
        return Err(ConfigError::InvalidHubUrl {
            url: cfg.hub_url().to_string(),
            reason: e.to_string(),
        });
    }

    if cfg.timeout().is_zero() {
        return Err(ConfigError::InvalidTimeout);
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_config_str(level).is_none() {
            return Err(ConfigError::InvalidLogLevel(level.to_string()));
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }

    // Only override port if the user supplied it on the CLI.
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    if let Some(hub_url) = &args.hub_url {
        config.hub_url = Some(hub_url.clone());
    }

    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = Some(timeout_secs);
    }

    if let Some(level) = args.log_level {
        config.log_level = Some(format!("{level:?}").to_lowercase());
    }

    Ok(config)
}

/// Path of the config file that [`load_config`] reads: the explicit one, or
/// the first of the default locations that exists.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists()),
    }
}

/// Loads a config file; without an explicit path the default locations are
/// probed and a missing file yields [`Config::default`].
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    if let Some(p) = path {
        if !p.exists() {
            return Err(format!("Config file not found: {}", p.display()).into());
        }
    }
    let Some(path) = config_path(path) else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&path)?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        // Default to YAML
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(config)
}

/// Serializes a configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(validate_effective_config(&config).is_ok());
        assert_eq!(
            config.listen_addr().unwrap(),
            "0.0.0.0:9192".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.hub_url(), DEFAULT_HUB_URL);
        assert_eq!(config.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(config.log_level(), LogLevel::Info);
    }

    #[test]
    fn test_rejects_port_zero() {
        let config = Config {
            port: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            validate_effective_config(&config),
            Err(ConfigError::InvalidPort)
        ));
    }

    #[test]
    fn test_rejects_bad_hub_url() {
        let config = Config {
            hub_url: Some("localhost:8088".into()),
            ..Config::default()
        };
        assert!(matches!(
            validate_effective_config(&config),
            Err(ConfigError::InvalidHubUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = Config {
            timeout_secs: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            validate_effective_config(&config),
            Err(ConfigError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_rejects_bad_bind_and_log_level() {
        let config = Config {
            bind: Some("everywhere".into()),
            ..Config::default()
        };
        assert!(matches!(
            validate_effective_config(&config),
            Err(ConfigError::InvalidBind(_))
        ));

        let config = Config {
            log_level: Some("loud".into()),
            ..Config::default()
        };
        assert!(matches!(
            validate_effective_config(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_loads_yaml_json_and_toml() {
        let yaml = write_temp(".yaml", "port: 9300\nhub-url: http://hub.lan:8080\n");
        let config = load_config(Some(yaml.path())).unwrap();
        assert_eq!(config.port(), 9300);
        assert_eq!(config.hub_url(), "http://hub.lan:8080");

        let json = write_temp(".json", r#"{"timeout_secs": 2, "bind": "127.0.0.1"}"#);
        let config = load_config(Some(json.path())).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.bind_addr(), "127.0.0.1");

        let toml = write_temp(".toml", "log_level = \"debug\"\n");
        let config = load_config(Some(toml.path())).unwrap();
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_config_path_prefers_explicit_file() {
        let yaml = write_temp(".yaml", "port: 9300\n");
        assert_eq!(
            config_path(Some(yaml.path())),
            Some(yaml.path().to_path_buf())
        );
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/domoticz-exporter.yaml"))).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let yaml = write_temp(".yaml", "port: 9300\ntimeout_secs: 4\n");
        let path = yaml.path().to_str().unwrap().to_string();

        let args = Args::try_parse_from([
            "domoticz-exporter",
            "-c",
            path.as_str(),
            "--port",
            "9400",
            "--log-level",
            "warn",
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.port(), 9400);
        assert_eq!(config.timeout(), Duration::from_secs(4));
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_no_config_skips_files() {
        let args = Args::try_parse_from([
            "domoticz-exporter",
            "--no-config",
            "-c",
            "/nonexistent/config.yaml",
        ])
        .unwrap();
        assert_eq!(resolve_config(&args).unwrap(), Config::default());
    }

    #[test]
    fn test_render_config_round_trips_through_yaml() {
        let rendered = render_config(&Config::default(), ConfigFormat::Yaml).unwrap();
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
