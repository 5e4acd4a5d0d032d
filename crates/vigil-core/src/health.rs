//! Per-component health results.
//!
//! A [`HealthStatus`] is produced by exactly one probe invocation. Probes fill
//! in the status, details and errors; the orchestrator owns the latency and
//! the `last_checked` timestamp.

use std::time::Duration;

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Status;

/// Free-form, probe-specific diagnostics.
pub type Details = Map<String, Value>;

/// Result of checking one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Registered probe name.
    pub component: String,
    /// Component status.
    pub status: Status,
    /// Wall-clock probe duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Probe-specific diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    /// Human-readable failure reasons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// When the component was last checked.
    pub last_checked: Timestamp,
}

impl HealthStatus {
    /// Creates a result with the given status and nothing else.
    pub fn new(component: impl Into<String>, status: Status) -> Self {
        Self {
            component: component.into(),
            status,
            latency_ms: None,
            details: None,
            errors: None,
            last_checked: Timestamp::now(),
        }
    }

    /// Creates a healthy result.
    pub fn healthy(component: impl Into<String>) -> Self {
        Self::new(component, Status::Healthy)
    }

    /// Creates a degraded result.
    pub fn degraded(component: impl Into<String>) -> Self {
        Self::new(component, Status::Degraded)
    }

    /// Creates an unhealthy result carrying one error.
    pub fn unhealthy(component: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(component, Status::Unhealthy).with_error(error)
    }

    /// Creates an unknown result.
    pub fn unknown(component: impl Into<String>) -> Self {
        Self::new(component, Status::Unknown)
    }

    /// Appends an error message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(error.into());
        self
    }

    /// Adds a detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replaces all details.
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the measured latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = Some(u64::try_from(latency.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Looks up a detail entry.
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref()?.get(key)
    }

    /// Looks up a boolean detail entry.
    pub fn detail_bool(&self, key: &str) -> Option<bool> {
        self.detail(key)?.as_bool()
    }

    /// Returns the errors, or an empty slice.
    pub fn error_list(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }
}
