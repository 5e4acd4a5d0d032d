//! Media-generation tier probe.

use tokio::time::Instant;
use url::Url;
use vigil_core::{HealthStatus, Probe};

use crate::HttpChecker;

/// Checks the media API health route. `Healthy` or `Unhealthy`, nothing in between.
#[derive(Debug, Clone)]
pub struct MediaProbe {
    url: Url,
    http: HttpChecker,
}

impl MediaProbe {
    pub fn new(url: Url, http: HttpChecker) -> Self {
        Self { url, http }
    }
}

#[async_trait::async_trait]
impl Probe for MediaProbe {
    fn name(&self) -> &str {
        "audio"
    }

    fn label(&self) -> &str {
        "Audio System"
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        let check = self.http.check(&self.url).await;
        let status = match check.failure() {
            None => HealthStatus::healthy(self.name()),
            Some(failure) => HealthStatus::unhealthy(self.name(), failure),
        };
        status.with_details(check.details())
    }
}
