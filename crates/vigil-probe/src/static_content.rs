//! Static content tier probe.

use std::path::PathBuf;

use serde_json::Map;
use tokio::time::Instant;
use url::Url;
use vigil_core::{HealthStatus, Probe, Status};

use crate::HttpChecker;

/// Checks that the homepage answers and the critical files exist.
///
/// Anything short of full success is `Degraded`; this tier is never
/// reported as `Unhealthy`.
#[derive(Debug, Clone)]
pub struct StaticContentProbe {
    homepage: Url,
    web_root: PathBuf,
    files: Vec<String>,
    http: HttpChecker,
}

impl StaticContentProbe {
    pub fn new(homepage: Url, web_root: PathBuf, files: Vec<String>, http: HttpChecker) -> Self {
        Self {
            homepage,
            web_root,
            files,
            http,
        }
    }

    async fn file_exists(&self, file: &str) -> bool {
        tokio::fs::try_exists(self.web_root.join(file))
            .await
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl Probe for StaticContentProbe {
    fn name(&self) -> &str {
        "frontend"
    }

    fn label(&self) -> &str {
        "Frontend"
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        let homepage = self.http.check(&self.homepage).await;

        let mut files = Map::new();
        let mut missing = Vec::new();
        for file in &self.files {
            let exists = self.file_exists(file).await;
            if !exists {
                missing.push(file.clone());
            }
            files.insert(file.clone(), exists.into());
        }

        let status = if homepage.reachable && missing.is_empty() {
            Status::Healthy
        } else {
            Status::Degraded
        };

        let mut result = HealthStatus::new(self.name(), status)
            .with_detail("homepage", homepage.reachable)
            .with_detail("files", files)
            .with_detail("missingCount", missing.len())
            .with_detail("missing", missing);

        if homepage.status_code.is_none()
            && let Some(failure) = homepage.failure()
        {
            result = result.with_error(failure);
        }
        result
    }
}
