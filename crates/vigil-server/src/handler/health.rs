//! Health reporting handlers.
//!
//! Computed documents are always answered with `200 OK`: the verdict is part
//! of the body, not the status code. Only an unknown component name maps to
//! an HTTP error.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use vigil_core::{HealthStatus, Orchestrator, SystemHealth};

use crate::handler::response::{ErrorResponse, Liveness};
use crate::handler::{ErrorKind, Result};
use crate::service::{ConsoleReporter, ServiceState};

/// Tracing target for health operations.
const TRACING_TARGET: &str = "vigil_server::handler::health";

/// Path parameters for single-component checks.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ComponentPathParams {
    /// Registered probe name, e.g. `database`.
    pub component: String,
}

/// Returns the liveness marker without probing anything.
#[tracing::instrument(skip_all)]
async fn liveness(
    State(orchestrator): State<Orchestrator>,
) -> Result<(StatusCode, Json<Liveness>)> {
    let liveness = Liveness::new(orchestrator.registry().names());

    tracing::debug!(
        target: TRACING_TARGET,
        endpoints = liveness.endpoints.len(),
        "Liveness marker requested"
    );

    Ok((StatusCode::OK, Json(liveness)))
}

fn liveness_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Liveness marker")
        .description("Reports that the health service is up and lists the available health endpoints. No probe is run.")
        .response::<200, Json<Liveness>>()
}

/// Runs every registered probe and returns the scored report.
#[tracing::instrument(skip_all)]
async fn comprehensive(
    State(orchestrator): State<Orchestrator>,
    State(console_reporter): State<ConsoleReporter>,
) -> Result<(StatusCode, Json<SystemHealth>)> {
    tracing::info!(target: TRACING_TARGET, "Performing comprehensive health check");

    let health = orchestrator.run_all().await;
    console_reporter.spawn(health.clone());

    tracing::info!(
        target: TRACING_TARGET,
        overall_status = %health.overall_status,
        health_score = health.health_score,
        "Comprehensive health check completed"
    );

    Ok((StatusCode::OK, Json(health)))
}

fn comprehensive_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Comprehensive health check")
        .description("Runs all probes concurrently, each bounded by the probe timeout, and returns the health score, overall status, missing features and recommendations.")
        .response::<200, Json<SystemHealth>>()
}

/// Runs exactly one probe by name.
#[tracing::instrument(skip_all, fields(component = %path_params.component))]
async fn component(
    State(orchestrator): State<Orchestrator>,
    Path(path_params): Path<ComponentPathParams>,
) -> Result<(StatusCode, Json<HealthStatus>)> {
    tracing::debug!(target: TRACING_TARGET, "Single component check requested");

    let Some(status) = orchestrator.check_one(&path_params.component).await else {
        tracing::debug!(target: TRACING_TARGET, "Unknown component");
        return Err(ErrorKind::NotFound
            .with_message(format!("Unknown component: {}", path_params.component))
            .with_resource("component"));
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status = %status.status,
        "Single component check completed"
    );

    Ok((StatusCode::OK, Json(status)))
}

fn component_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Single component check")
        .description("Runs the probe registered under the given name with the same timeout and panic isolation as the comprehensive check.")
        .response::<200, Json<HealthStatus>>()
        .response::<404, Json<ErrorResponse<'static>>>()
}

/// Returns an [`ApiRouter`] with all health routes.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(liveness, liveness_docs))
        .api_route(
            "/health/comprehensive",
            get_with(comprehensive, comprehensive_docs),
        )
        .api_route("/health/{component}", get_with(component, component_docs))
        .with_path_items(|item| item.tag("Health"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use vigil_core::mock::{HangingProbe, PanickingProbe, StaticProbe};
    use vigil_core::{OverallStatus, ProbeRegistry, Status, TIMEOUT_ERROR};

    use super::*;
    use crate::handler::test::create_test_server_with_registry;

    fn healthy_registry() -> anyhow::Result<ProbeRegistry> {
        let registry = ProbeRegistry::new()
            .with(StaticProbe::healthy("api"))?
            .with(StaticProbe::healthy("database"))?;
        Ok(registry)
    }

    #[tokio::test]
    async fn liveness_lists_endpoints() -> anyhow::Result<()> {
        let server = create_test_server_with_registry(healthy_registry()?)?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let liveness = response.json::<Liveness>();
        assert_eq!(liveness.status, Liveness::ONLINE);
        assert_eq!(liveness.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            liveness.endpoints,
            ["/health/comprehensive", "/health/api", "/health/database"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn liveness_runs_no_probe() -> anyhow::Result<()> {
        let probe = Arc::new(StaticProbe::healthy("api"));
        let mut registry = ProbeRegistry::new();
        registry.register_arc(probe.clone())?;
        let server = create_test_server_with_registry(registry)?;

        server.get("/health").await.assert_status_ok();
        assert_eq!(probe.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn comprehensive_all_healthy() -> anyhow::Result<()> {
        let server = create_test_server_with_registry(healthy_registry()?)?;

        let response = server.get("/health/comprehensive").await;
        response.assert_status_ok();

        let health = response.json::<SystemHealth>();
        assert_eq!(health.health_score, 100);
        assert_eq!(health.overall_status, OverallStatus::Healthy);
        assert!(health.recommendations.is_empty());
        assert_eq!(health.components.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn comprehensive_is_ok_even_when_unhealthy() -> anyhow::Result<()> {
        let registry = ProbeRegistry::new()
            .with(StaticProbe::healthy("api"))?
            .with(StaticProbe::unhealthy("database", "connection refused"))?;
        let server = create_test_server_with_registry(registry)?;

        let response = server.get("/health/comprehensive").await;
        response.assert_status_ok();

        let health = response.json::<SystemHealth>();
        assert_eq!(health.health_score, 50);
        assert_eq!(health.overall_status, OverallStatus::Unhealthy);
        assert_eq!(
            health.recommendations,
            ["Critical: Fix database - connection refused"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn comprehensive_contains_panicking_probe() -> anyhow::Result<()> {
        let registry = ProbeRegistry::new()
            .with(StaticProbe::healthy("api"))?
            .with(PanickingProbe::new("bots"))?;
        let server = create_test_server_with_registry(registry)?;

        let response = server.get("/health/comprehensive").await;
        response.assert_status_ok();

        let health = response.json::<SystemHealth>();
        let bots = health.component("bots").expect("bots result");
        assert_eq!(bots.status, Status::Unhealthy);
        assert!(bots.error_list()[0].contains("bots probe exploded"));
        assert_eq!(health.component("api").map(|c| c.status), Some(Status::Healthy));
        Ok(())
    }

    #[tokio::test]
    async fn comprehensive_times_out_hanging_probe() -> anyhow::Result<()> {
        let registry = ProbeRegistry::new()
            .with(StaticProbe::healthy("api"))?
            .with(HangingProbe::new("websocket"))?;
        let orchestrator =
            Orchestrator::new(registry).with_probe_timeout(Duration::from_millis(50));
        let server = crate::handler::test::create_test_server_with_orchestrator(orchestrator)?;

        let response = server.get("/health/comprehensive").await;
        response.assert_status_ok();

        let health = response.json::<SystemHealth>();
        let websocket = health.component("websocket").expect("websocket result");
        assert_eq!(websocket.status, Status::Unhealthy);
        assert_eq!(websocket.error_list(), [TIMEOUT_ERROR]);
        Ok(())
    }

    #[tokio::test]
    async fn single_component_check() -> anyhow::Result<()> {
        let registry = ProbeRegistry::new()
            .with(StaticProbe::healthy("api"))?
            .with(StaticProbe::degraded("database"))?;
        let server = create_test_server_with_registry(registry)?;

        let response = server.get("/health/database").await;
        response.assert_status_ok();

        let status = response.json::<HealthStatus>();
        assert_eq!(status.component, "database");
        assert_eq!(status.status, Status::Degraded);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_component_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server_with_registry(healthy_registry()?)?;

        let response = server.get("/health/mail").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "not_found");
        assert_eq!(body["message"], "Unknown component: mail");
        assert_eq!(body["resource"], "component");
        Ok(())
    }
}
