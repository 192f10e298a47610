//! preview-broker
//!
//! Usage:
//!   preview-broker [--config <path>] [--port <port>] [--verbose]
//!
//! Loads the configuration (creating a default file if missing), starts
//! logging and serves until Ctrl+C.

use std::path::PathBuf;

use preview_broker::config::{ConfigStore, ConfigStoreConfig};
use preview_broker::logging::{init_basic_logging, LogLevel, LoggingSystem};
use preview_broker::BrokerServer;

/// Command line arguments
struct Args {
    /// Config file path (platform default when absent)
    config: Option<PathBuf>,
    /// Port override
    port: Option<u16>,
    /// Force debug logging
    verbose: bool,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = std::env::args().skip(1);
        let mut config = None;
        let mut port = None;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = Some(args.next().map(PathBuf::from).ok_or("--config needs a path")?);
                }
                "--port" | "-p" => {
                    let val = args.next().ok_or("--port needs a value")?;
                    port = Some(val.parse().map_err(|_| "Invalid port value")?);
                }
                "--verbose" | "-v" => {
                    verbose = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(format!("Unknown argument: {}", other)),
            }
        }

        Ok(Self {
            config,
            port,
            verbose,
        })
    }
}

fn print_usage() {
    eprintln!("Usage: preview-broker [--config <path>] [--port <port>] [--verbose]");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

async fn run(args: Args) -> preview_broker::Result<()> {
    let settings = args
        .config
        .map(ConfigStoreConfig::at)
        .unwrap_or_default();
    let store = ConfigStore::new(settings).await?;

    let mut config = store.get().await;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.verbose {
        config.logging.level = LogLevel::Debug;
    }
    config.validate()?;

    // Keep the guard alive so buffered file output is flushed on exit
    let logging_system = match LoggingSystem::init(config.logging.clone()) {
        Ok(system) => Some(system),
        Err(e) => {
            eprintln!("Failed to initialize logging system: {}. Using basic logging.", e);
            init_basic_logging(config.logging.level);
            None
        }
    };

    tracing::info!(
        "Starting preview-broker with config {}",
        store.config_path().display()
    );
    if let Some(dir) = logging_system.as_ref().and_then(LoggingSystem::log_directory) {
        tracing::info!("Writing logs to {}", dir.display());
    }
    if config.folders.is_empty() && config.input_directory.is_none() {
        tracing::warn!("No folders registered; every token request will come back empty");
    }

    BrokerServer::with_config(&config)
        .start_with_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args).await {
        if e.is_startup_error() {
            eprintln!("preview-broker could not start: {}", e);
            std::process::exit(2);
        }
        return Err(anyhow::Error::new(e).context("media preview server failed"));
    }

    Ok(())
}
