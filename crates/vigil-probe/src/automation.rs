//! Chat/automation tier probe.

use tokio::time::Instant;
use url::Url;
use vigil_core::{HealthStatus, Probe, Status};

use crate::config::ProbeConfig;
use crate::{HttpChecker, TRACING_TARGET_PROBE};

/// Checks the automation API root and its two bot sub-routes.
///
/// Only the root decides the status: `Degraded` if it answers, `Unhealthy`
/// otherwise. The sub-route results and the integration flags are reported
/// in the details and never raise the status to `Healthy`.
#[derive(Debug, Clone)]
pub struct AutomationProbe {
    base: Url,
    ai_integration: bool,
    realtime_integration: bool,
    http: HttpChecker,
}

impl AutomationProbe {
    pub fn new(base: Url, http: HttpChecker) -> Self {
        Self {
            base,
            ai_integration: false,
            realtime_integration: false,
            http,
        }
    }

    /// Declares whether the AI backend is wired in.
    pub fn with_ai_integration(mut self, enabled: bool) -> Self {
        self.ai_integration = enabled;
        self
    }

    /// Declares whether the tier is connected to the realtime transport.
    pub fn with_realtime_integration(mut self, enabled: bool) -> Self {
        self.realtime_integration = enabled;
        self
    }
}

#[async_trait::async_trait]
impl Probe for AutomationProbe {
    fn name(&self) -> &str {
        "bots"
    }

    fn label(&self) -> &str {
        "Bot System"
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        let root = ProbeConfig::join(&self.base, "/health");
        let client_bot = ProbeConfig::join(&self.base, "/api/client/message");
        let contractor_bot = ProbeConfig::join(&self.base, "/api/contractor/login");

        let (root, client_bot, contractor_bot) = tokio::join!(
            self.http.check(&root),
            self.http.check(&client_bot),
            self.http.check(&contractor_bot),
        );

        tracing::debug!(
            target: TRACING_TARGET_PROBE,
            probe = self.name(),
            root = root.reachable,
            client_bot = client_bot.reachable,
            contractor_bot = contractor_bot.reachable,
            "Automation routes checked"
        );

        let status = if root.reachable {
            Status::Degraded
        } else {
            Status::Unhealthy
        };

        let mut result = HealthStatus::new(self.name(), status)
            .with_detail("apiHealthy", root.reachable)
            .with_detail("clientBot", client_bot.reachable)
            .with_detail("contractorBot", contractor_bot.reachable)
            .with_detail("aiIntegration", self.ai_integration)
            .with_detail("websocketIntegration", self.realtime_integration);

        if status == Status::Unhealthy
            && let Some(failure) = root.failure()
        {
            result = result.with_error(failure);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::DEFAULT_TIMEOUT;

    fn probe(server: &mockito::Server) -> AutomationProbe {
        AutomationProbe::new(
            Url::parse(&server.url()).unwrap(),
            HttpChecker::new(DEFAULT_TIMEOUT).unwrap(),
        )
    }

    #[tokio::test]
    async fn reachable_root_is_degraded_even_when_everything_answers() {
        let mut server = mockito::Server::new_async().await;
        let _root = server.mock("GET", "/health").with_status(200).create_async().await;
        let _client = server
            .mock("GET", "/api/client/message")
            .with_status(200)
            .create_async()
            .await;
        let _contractor = server
            .mock("GET", "/api/contractor/login")
            .with_status(200)
            .create_async()
            .await;

        let status = probe(&server)
            .with_ai_integration(true)
            .with_realtime_integration(true)
            .check(Instant::now())
            .await;

        assert_eq!(status.status, Status::Degraded);
        assert_eq!(status.detail_bool("clientBot"), Some(true));
        assert_eq!(status.detail_bool("aiIntegration"), Some(true));
        assert!(status.errors.is_none());
    }

    #[tokio::test]
    async fn sub_routes_do_not_affect_status() {
        let mut server = mockito::Server::new_async().await;
        let _root = server.mock("GET", "/health").with_status(200).create_async().await;

        let status = probe(&server).check(Instant::now()).await;

        assert_eq!(status.status, Status::Degraded);
        assert_eq!(status.detail_bool("apiHealthy"), Some(true));
        assert_eq!(status.detail_bool("clientBot"), Some(false));
        assert_eq!(status.detail_bool("contractorBot"), Some(false));
        assert_eq!(status.detail_bool("aiIntegration"), Some(false));
    }

    #[tokio::test]
    async fn unreachable_root_is_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        let _root = server.mock("GET", "/health").with_status(503).create_async().await;

        let status = probe(&server).check(Instant::now()).await;

        assert_eq!(status.status, Status::Unhealthy);
        assert_eq!(status.detail_bool("apiHealthy"), Some(false));
        assert!(status.error_list()[0].ends_with("HTTP 503"));
    }
}
