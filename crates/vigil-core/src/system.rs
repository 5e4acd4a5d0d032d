//! Run-level health document.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{HealthStatus, OverallStatus, StatusCounts};

/// Aggregated result of one orchestrator run.
///
/// Built fresh for every run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    /// Worst-case verdict across all components.
    pub overall_status: OverallStatus,
    /// Score in `[0, 100]`.
    pub health_score: u8,
    /// One entry per registered probe, in registry order.
    pub components: Vec<HealthStatus>,
    /// Capabilities that are not available in this run.
    pub missing_features: Vec<String>,
    /// Remediation actions, most severe first.
    pub recommendations: Vec<String>,
    /// Run completion time.
    pub timestamp: Timestamp,
}

impl SystemHealth {
    /// Returns the component result with the given name.
    pub fn component(&self, name: &str) -> Option<&HealthStatus> {
        self.components.iter().find(|c| c.component == name)
    }

    /// Returns the per-status counts of this run.
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_components(&self.components)
    }

    /// Returns `true` unless the overall verdict is unhealthy.
    pub fn is_operational(&self) -> bool {
        self.overall_status != OverallStatus::Unhealthy
    }
}
