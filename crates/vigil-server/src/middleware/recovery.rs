//! Request timeout and panic recovery.
//!
//! Both failure paths end in the same JSON error body the handlers use, so
//! clients never see a bare connection reset or an empty 500.

use std::any::Any;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::{BoxError, ServiceBuilder};
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "vigil_server::middleware::recovery";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Request timeout applied to every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Seconds before an in-flight request is abandoned.
    ///
    /// `vigil serve` requires this to exceed the probe timeout.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)
    )]
    pub request_timeout: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self::with_timeout_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

impl RecoveryConfig {
    pub fn with_timeout_secs(request_timeout: u64) -> Self {
        Self { request_timeout }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Adds timeout and panic recovery to an `axum::`[`Router`].
pub trait RouterRecoveryExt<S> {
    /// Layers recovery with the given request timeout.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;

    /// Layers recovery with [`RecoveryConfig::default`].
    fn with_default_recovery(self) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        let layers = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|error: BoxError| async move {
                recover_error(&error)
            }))
            .layer(CatchPanicLayer::custom(recover_panic))
            .layer(TimeoutLayer::new(config.request_timeout()));

        self.layer(layers)
    }

    fn with_default_recovery(self) -> Self {
        self.with_recovery(&RecoveryConfig::default())
    }
}

fn recover_error(error: &BoxError) -> Response {
    if error.is::<Elapsed>() {
        tracing::warn!(target: TRACING_TARGET, "Request timed out");
        return ErrorKind::Timeout.into_response();
    }

    tracing::error!(target: TRACING_TARGET, error = %error, "Middleware failed");
    Error::new(ErrorKind::InternalServerError)
        .with_context(error.to_string())
        .into_response()
}

fn recover_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    tracing::error!(target: TRACING_TARGET, panic = message, "Handler panicked");
    ErrorKind::InternalServerError
        .with_message("Handler panicked")
        .into_response()
}
