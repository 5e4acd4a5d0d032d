//! HTTP API tier probe.

use futures::future::join_all;
use serde_json::{Value, json};
use tokio::time::Instant;
use url::Url;
use vigil_core::{HealthStatus, Probe, Status};

use crate::{HttpChecker, TRACING_TARGET_PROBE};

/// A named endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub url: Url,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// Checks a set of HTTP endpoints concurrently.
///
/// `Healthy` if every endpoint answers 2xx, `Degraded` if at least one does,
/// `Unhealthy` if none does. An empty endpoint set reports `Unknown`.
#[derive(Debug, Clone)]
pub struct ApiProbe {
    endpoints: Vec<Endpoint>,
    http: HttpChecker,
}

impl ApiProbe {
    pub fn new(endpoints: Vec<Endpoint>, http: HttpChecker) -> Self {
        Self { endpoints, http }
    }
}

#[async_trait::async_trait]
impl Probe for ApiProbe {
    fn name(&self) -> &str {
        "api"
    }

    fn label(&self) -> &str {
        "API Endpoints"
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        if self.endpoints.is_empty() {
            return HealthStatus::unknown(self.name()).with_detail("totalCount", 0);
        }

        let checks = join_all(self.endpoints.iter().map(|e| self.http.check(&e.url))).await;
        let healthy = checks.iter().filter(|c| c.reachable).count();
        let total = checks.len();

        let status = match healthy {
            n if n == total => Status::Healthy,
            0 => Status::Unhealthy,
            _ => Status::Degraded,
        };

        tracing::debug!(
            target: TRACING_TARGET_PROBE,
            probe = self.name(),
            healthy,
            total,
            "Endpoints checked"
        );

        let endpoints: Vec<Value> = self
            .endpoints
            .iter()
            .zip(&checks)
            .map(|(endpoint, check)| {
                let mut detail = check.to_detail();
                detail["name"] = json!(endpoint.name);
                detail
            })
            .collect();

        let mut result = HealthStatus::new(self.name(), status)
            .with_detail("endpoints", endpoints)
            .with_detail("healthyCount", healthy)
            .with_detail("totalCount", total);

        if status == Status::Unhealthy {
            for failure in checks.iter().filter_map(|c| c.failure()) {
                result = result.with_error(failure);
            }
        }
        result
    }
}
