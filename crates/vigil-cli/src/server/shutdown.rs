//! Graceful shutdown on SIGINT or SIGTERM.

use std::time::Duration;

use tokio::signal;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Resolves once the process is asked to stop.
///
/// A signal whose handler cannot be installed is logged and never fires, so
/// the other one still shuts the server down.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let received = tokio::select! {
        () = interrupt() => "SIGINT",
        () = terminate() => "SIGTERM",
    };

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal = received,
        timeout_secs = shutdown_timeout.as_secs(),
        "Graceful shutdown initiated"
    );
}

async fn interrupt() {
    if let Err(error) = signal::ctrl_c().await {
        install_failed("SIGINT", &error);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            install_failed("SIGTERM", &error);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

fn install_failed(signal: &'static str, error: &std::io::Error) {
    tracing::error!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal,
        error = %error,
        "Failed to install signal handler"
    );
}
