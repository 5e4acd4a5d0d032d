//! The probe contract.

use tokio::time::Instant;

use crate::HealthStatus;

/// A self-contained check of one subsystem.
///
/// Probes never fail: internal errors are reported as an `Unhealthy`
/// [`HealthStatus`] with `errors` filled in. The orchestrator overwrites
/// `latency_ms` and `last_checked`, and converts timeouts and panics itself.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Registered name, unique within a registry.
    fn name(&self) -> &str;

    /// Human-readable title used by console reports.
    fn label(&self) -> &str {
        self.name()
    }

    /// Checks the subsystem.
    ///
    /// The `deadline` is advisory; the orchestrator cancels the call once it
    /// passes.
    async fn check(&self, deadline: Instant) -> HealthStatus;
}
