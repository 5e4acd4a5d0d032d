//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── serve
//! │   ├── server: ServerConfig          # Host, port, shutdown
//! │   ├── middleware: MiddlewareConfig  # OpenAPI, recovery/timeouts
//! │   └── service: ServiceConfig        # Probe targets, database
//! └── check
//!     ├── service: ServiceConfig
//!     └── --output, --json
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod middleware;
mod server;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
pub use middleware::MiddlewareConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vigil_server::service::ServiceConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "vigil")]
#[command(about = "Readiness and health orchestration for the platform")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serves the health endpoints over HTTP.
    Serve(ServeArgs),
    /// Runs every probe once and prints the report.
    Check(CheckArgs),
}

/// Arguments of `vigil serve`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ServeArgs {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (OpenAPI, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Probe targets and store connection.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl ServeArgs {
    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.service
            .probe
            .validate()
            .context("invalid probe configuration")?;

        let request_timeout = self.middleware.recovery.request_timeout;
        let probe_timeout = self.service.probe.probe_timeout_secs;
        anyhow::ensure!(
            request_timeout > probe_timeout,
            "request timeout ({request_timeout}s) must exceed the probe timeout ({probe_timeout}s)"
        );
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        self.server.log();
        self.middleware.log();
        log_service_config(&self.service);
    }
}

/// Arguments of `vigil check`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct CheckArgs {
    /// Probe targets and store connection.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Also writes the JSON report to this file.
    #[arg(short, long, env = "VIGIL_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Prints the JSON report instead of the table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl CheckArgs {
    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.service
            .probe
            .validate()
            .context("invalid probe configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        log_service_config(&self.service);
    }
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its values
    /// are picked up as `env` defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// `RUST_LOG` wins over the per-command default. Logs go to stderr so
    /// `vigil check --json` keeps stdout clean.
    pub fn init_tracing(&self) {
        let default_directive = match self.command {
            Command::Serve(_) => "info",
            Command::Check(_) => "warn",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs build information at debug level.
    pub fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn log_service_config(config: &ServiceConfig) {
    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        app_url = %config.probe.app_url,
        automation_url = %config.probe.automation_url,
        media_url = %config.probe.media_url,
        realtime_url = %config.probe.realtime_url,
        probe_timeout_secs = config.probe.probe_timeout_secs,
        "Probe configuration"
    );

    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        database_url = %config.postgres.database_url_masked(),
        postgres_max_connections = config.postgres.postgres_max_connections,
        postgres_connection_timeout_secs = ?config.postgres.postgres_connection_timeout_secs,
        "Database configuration"
    );
}
