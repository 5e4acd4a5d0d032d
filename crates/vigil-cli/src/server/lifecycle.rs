//! Uptime and failure reporting around the serve future.

use std::future::Future;
use std::io;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Awaits `serve_fn` and logs how the server stopped.
pub async fn serve_with_shutdown<F>(
    config: &ServerConfig,
    serve_fn: impl FnOnce() -> F,
) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Listening on all interfaces, component details are reachable from the network"
        );
    }

    let started = Instant::now();
    let result = serve_fn().await;
    let uptime_secs = started.elapsed().as_secs();

    match &result {
        Ok(()) => tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            uptime_secs,
            "Server stopped"
        ),
        Err(error) => tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            hint = hint(error).unwrap_or_default(),
            uptime_secs,
            "Server failed"
        ),
    }

    result
}

/// Suggests a fix for the listener errors users actually hit.
fn hint(error: &io::Error) -> Option<&'static str> {
    match error.kind() {
        io::ErrorKind::AddrInUse => Some("another process holds the port, pass a different --port"),
        io::ErrorKind::PermissionDenied => Some("use a port above 1024"),
        io::ErrorKind::AddrNotAvailable => Some("--host is not an address of this machine"),
        _ => None,
    }
}
