//! Middleware configuration for the HTTP server.
//!
//! Both groups are defined in `vigil-server` and support CLI arguments and
//! environment variables.

use clap::Args;
use serde::{Deserialize, Serialize};
use vigil_server::middleware::{OpenApiConfig, RecoveryConfig};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration combining OpenAPI and recovery settings.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// OpenAPI documentation paths.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            openapi_path = %self.openapi.open_api_json,
            scalar_path = %self.openapi.scalar_ui,
            request_timeout_secs = self.recovery.request_timeout,
            "Middleware configuration"
        );
    }
}
