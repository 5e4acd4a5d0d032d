//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Recovery: panics, request timeouts, Tower service errors
//! - Observability: request IDs and tracing spans
//! - OpenAPI documentation with Scalar UI
//!
//! ```rust,no_run
//! use axum::Router;
//! use vigil_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app: Router = Router::new()
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod specification;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
