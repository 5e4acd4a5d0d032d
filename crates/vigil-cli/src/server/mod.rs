//! HTTP server startup with graceful shutdown.

mod lifecycle;
mod shutdown;

use std::io;
use std::net::SocketAddr;

use axum::Router;
use lifecycle::serve_with_shutdown;
use shutdown::shutdown_signal;
use tokio::net::TcpListener;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;

/// Binds the configured address and serves `app` until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if:
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve(app: Router, config: ServerConfig) -> io::Result<()> {
    let server_addr = config.server_addr();

    let listener = TcpListener::bind(server_addr).await.inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    let shutdown = shutdown_signal(config.shutdown_timeout());
    serve_with_shutdown(&config, || async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
    })
    .await
}
