//! Container runtime probe.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use tokio::process::Command;
use tokio::time::Instant;
use vigil_core::{Error, HealthStatus, Probe, Result, Status};

use crate::TRACING_TARGET_PROBE;

/// Lists running containers on the local engine.
#[async_trait::async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Names of the running containers.
    async fn running_containers(&self) -> Result<Vec<String>>;
}

/// [`ContainerEngine`] backed by the `docker` command line.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    /// Uses the given executable instead of `docker`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait::async_trait]
impl ContainerEngine for DockerCli {
    async fn running_containers(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.program)
            .args(["ps", "--format", "{{.Names}}"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::external_error()
                    .with_message(format!("Failed to run {}: {e}", self.program))
                    .with_source(e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::external_error().with_message(stderr.trim().to_owned()));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }
}

/// Matches expected container names against the running ones.
///
/// `Degraded` whenever the engine answers, however many containers run;
/// `Unknown` if the engine itself cannot be reached.
#[derive(Clone)]
pub struct ContainerProbe {
    engine: Arc<dyn ContainerEngine>,
    expected: Vec<String>,
}

impl ContainerProbe {
    pub fn new(engine: Arc<dyn ContainerEngine>, expected: Vec<String>) -> Self {
        Self { engine, expected }
    }
}

#[async_trait::async_trait]
impl Probe for ContainerProbe {
    fn name(&self) -> &str {
        "docker"
    }

    fn label(&self) -> &str {
        "Docker Services"
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        let running = match self.engine.running_containers().await {
            Ok(running) => running,
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET_PROBE,
                    probe = self.name(),
                    error = %error,
                    "Container engine unavailable"
                );
                return HealthStatus::unknown(self.name())
                    .with_detail("engineAvailable", false)
                    .with_error(format!("Docker not available: {}", error.reason()));
            }
        };

        let containers: Vec<_> = self
            .expected
            .iter()
            .map(|name| {
                let up = running.iter().any(|c| c.contains(name.as_str()));
                json!({ "name": name, "running": up })
            })
            .collect();
        let running_count = containers.iter().filter(|c| c["running"] == true).count();

        HealthStatus::new(self.name(), Status::Degraded)
            .with_detail("engineAvailable", true)
            .with_detail("containers", containers)
            .with_detail("runningCount", running_count)
            .with_detail("expectedCount", self.expected.len())
    }
}

impl fmt::Debug for ContainerProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerProbe")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}
