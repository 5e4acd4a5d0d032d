#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

use std::process;

use anyhow::Context;
use axum::Router;
use vigil_server::handler::router;
use vigil_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
use vigil_server::service::ServiceState;

use crate::config::{Cli, Command, MiddlewareConfig, ServeArgs};

mod check;
mod config;
mod server;

/// Tracing target for configuration events.
pub const TRACING_TARGET_CONFIG: &str = "vigil_cli::config";

/// Tracing target for server startup events.
pub const TRACING_TARGET_SERVER_STARTUP: &str = "vigil_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "vigil_cli::server::shutdown";

/// Tracing target for one-shot checks.
pub const TRACING_TARGET_CHECK: &str = "vigil_cli::check";

/// Exit code for configuration and startup failures.
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    process::exit(exit_code(run().await));
}

/// Maps the outcome of a run to the process exit code.
fn exit_code(result: anyhow::Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = format!("{error:#}"),
                "Application terminated with error"
            );
            EXIT_ERROR
        }
    }
}

async fn run() -> anyhow::Result<i32> {
    let cli = Cli::init();
    cli.init_tracing();
    Cli::log_build_info();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Check(args) => {
            args.validate()?;
            args.log();
            check::run(&args).await
        }
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<i32> {
    args.validate()?;
    args.log();

    let state = ServiceState::from_config(&args.service)
        .context("failed to create application state")?;
    let app = create_router(state, &args.middleware);

    server::serve(app, args.server)
        .await
        .context("server terminated unexpectedly")?;

    Ok(check::EXIT_OPERATIONAL)
}

/// Creates the router with all middleware layers applied.
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    router(state, &middleware.openapi)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
