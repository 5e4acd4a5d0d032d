//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! ```rust,no_run
//! use vigil_core::{Orchestrator, ProbeRegistry};
//! use vigil_server::handler::router;
//! use vigil_server::middleware::OpenApiConfig;
//! use vigil_server::service::{ConsoleReporter, ServiceState};
//!
//! let orchestrator = Orchestrator::new(ProbeRegistry::new());
//! let state = ServiceState::new(orchestrator, ConsoleReporter::default());
//! let app: axum::Router = router(state, &OpenApiConfig::default());
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod health;
mod response;

use aide::axum::ApiRouter;
use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::health::ComponentPathParams;
pub use crate::handler::response::{ErrorResponse, Liveness};
use crate::middleware::{OpenApiConfig, RouterOpenApiExt};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all documented routes.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new().merge(health::routes())
}

/// Returns the complete application router: documented routes, the OpenAPI
/// document and UI, and a JSON 404 fallback.
pub fn router(state: ServiceState, openapi: &OpenApiConfig) -> Router {
    routes()
        .with_open_api(openapi)
        .fallback(fallback)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test {
    use axum_test::TestServer;
    use vigil_core::{Orchestrator, ProbeRegistry};

    use crate::handler::router;
    use crate::middleware::OpenApiConfig;
    use crate::service::{ConsoleReporter, ServiceState};

    /// Returns a new [`TestServer`] over the given orchestrator.
    pub fn create_test_server_with_orchestrator(
        orchestrator: Orchestrator,
    ) -> anyhow::Result<TestServer> {
        let state = ServiceState::new(orchestrator, ConsoleReporter::disabled());
        let app = router(state, &OpenApiConfig::default());
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] over the given registry.
    pub fn create_test_server_with_registry(
        registry: ProbeRegistry,
    ) -> anyhow::Result<TestServer> {
        create_test_server_with_orchestrator(Orchestrator::new(registry))
    }

    #[tokio::test]
    async fn openapi_document_lists_health_routes() -> anyhow::Result<()> {
        let server = create_test_server_with_registry(ProbeRegistry::new())?;

        let response = server.get("/api/openapi.json").await;
        response.assert_status_ok();

        let document = response.json::<serde_json::Value>();
        let paths = &document["paths"];
        assert!(paths.get("/health").is_some());
        assert!(paths.get("/health/comprehensive").is_some());
        assert!(paths.get("/health/{component}").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn scalar_ui_is_served() -> anyhow::Result<()> {
        let server = create_test_server_with_registry(ProbeRegistry::new())?;
        server.get("/api/scalar").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() -> anyhow::Result<()> {
        let server = create_test_server_with_registry(ProbeRegistry::new())?;

        let response = server.get("/status").await;
        response.assert_status_not_found();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn empty_registry_scores_zero() -> anyhow::Result<()> {
        let server = create_test_server_with_registry(ProbeRegistry::new())?;

        let response = server.get("/health/comprehensive").await;
        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["healthScore"], 0);
        assert_eq!(body["overallStatus"], "unhealthy");
        Ok(())
    }
}
