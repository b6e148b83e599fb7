//! domoticz-exporter - version 0.1.0
//!
//! Exporter for Domoticz temperature devices with tracing logging.
//! This is the main entry point that initializes the server and handles subcommands.

use clap::Parser;
use std::process;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;

use domoticz_exporter::cli::{Args, Commands, LogLevel};
use domoticz_exporter::commands::{command_config, command_test};
use domoticz_exporter::config::{
    config_path, resolve_config, show_config, validate_effective_config, Config,
};
use domoticz_exporter::{router, AppState};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config) {
    let level = config.log_level();
    let max_level = match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        process::exit(1);
    }
    Ok(config)
}

/// Resolves once SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    if let Some(command) = &args.command {
        return match command {
            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output.clone(), *format, *commented),

            Commands::Test => {
                let config = load_validated_config(&args)?;
                command_test(&config).await
            }
        };
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config);

    info!("Starting domoticz-exporter");
    if args.no_config {
        info!("Config file loading disabled, using defaults and CLI flags");
    } else {
        match config_path(args.config.as_deref()) {
            Some(path) => info!("Loaded configuration from: {}", path.display()),
            None => info!("No configuration file found, using defaults and CLI flags"),
        }
    }

    let addr = config.listen_addr()?;
    let state = AppState::from_config(&config)?;

    // One synchronous fetch before binding; a broken hub is fatal here.
    info!("Querying Domoticz at {}", state.hub.devices_url());
    match state.hub.fetch_and_render().await {
        Ok(measures) => {
            info!(
                "Checking the hub once before starting the webserver: {}",
                measures
            );
        }
        Err(e) => {
            error!(kind = e.kind(), "❌ Startup check against the hub failed: {}", e);
            error!("   Refusing to serve metrics from a broken backend");
            process::exit(1);
        }
    }

    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Starting webserver on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("domoticz-exporter stopped gracefully");
    Ok(())
}
