//! Concurrent fan-out/fan-in over the probe registry.
//!
//! Every probe runs on its own task under its own deadline. A probe that
//! overruns is cancelled and recorded as `Unhealthy` with
//! [`TIMEOUT_ERROR`]; a probe that panics is recorded as `Unhealthy` with the
//! panic message. Neither affects its siblings, so a run always yields one
//! result per registered probe.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;

use crate::{
    HealthStatus, Probe, ProbeRegistry, RunObserver, SystemHealth, TRACING_TARGET_ORCHESTRATOR,
    scoring,
};

/// Default per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Error recorded for probes that overrun their deadline.
pub const TIMEOUT_ERROR: &str = "Connection timeout";

/// Runs registered probes and aggregates their results.
///
/// Cheap to clone; the registry and observers are shared.
#[derive(Clone)]
pub struct Orchestrator {
    registry: Arc<ProbeRegistry>,
    probe_timeout: Duration,
    observers: Vec<Arc<dyn RunObserver>>,
}

impl Orchestrator {
    /// Creates an orchestrator with [`DEFAULT_PROBE_TIMEOUT`].
    pub fn new(registry: ProbeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            observers: Vec::new(),
        }
    }

    /// Sets the per-probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Adds a progress observer.
    pub fn with_observer(mut self, observer: impl RunObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Returns the registry.
    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    /// Returns the per-probe timeout.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Runs every registered probe concurrently and scores the results.
    ///
    /// Completes in roughly the slowest probe's time, bounded by the
    /// per-probe timeout. Components are returned in registry order.
    pub async fn run_all(&self) -> SystemHealth {
        let started = Instant::now();
        let names = self.registry.names();
        self.observers.iter().for_each(|o| o.run_started(&names));

        let mut tasks = JoinSet::new();
        let mut positions = HashMap::with_capacity(self.registry.len());
        for (index, probe) in self.registry.iter().enumerate() {
            let handle = tasks.spawn(run_probe(Arc::clone(probe), self.probe_timeout));
            positions.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<HealthStatus>> = vec![None; self.registry.len()];
        while let Some(joined) = tasks.join_next_with_id().await {
            let (index, status) = match joined {
                Ok((id, status)) => (positions.get(&id).copied(), status),
                Err(error) => {
                    let index = positions.get(&error.id()).copied();
                    let name = index.map_or("unknown", |i| names[i]);
                    (index, failed_task(name, error))
                }
            };

            self.observers
                .iter()
                .for_each(|o| o.component_checked(&status));
            if let Some(slot) = index.and_then(|i| slots.get_mut(i)) {
                *slot = Some(status);
            }
        }

        let components = slots
            .into_iter()
            .zip(names.iter())
            .map(|(slot, name)| {
                slot.unwrap_or_else(|| HealthStatus::unhealthy(*name, "Probe did not report"))
            })
            .collect();

        let health = scoring::score(components);
        tracing::debug!(
            target: TRACING_TARGET_ORCHESTRATOR,
            elapsed_ms = started.elapsed().as_millis() as u64,
            health_score = health.health_score,
            "Run finished"
        );

        self.observers.iter().for_each(|o| o.run_completed(&health));
        health
    }

    /// Runs exactly one probe under the same timeout and isolation rules.
    ///
    /// Returns `None` if no probe with that name is registered.
    pub async fn check_one(&self, name: &str) -> Option<HealthStatus> {
        let probe = Arc::clone(self.registry.get(name)?);
        let status = match tokio::spawn(run_probe(probe, self.probe_timeout)).await {
            Ok(status) => status,
            Err(error) => failed_task(name, error),
        };

        self.observers
            .iter()
            .for_each(|o| o.component_checked(&status));
        Some(status)
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("probe_timeout", &self.probe_timeout)
            .finish_non_exhaustive()
    }
}

/// Runs one probe with its deadline and stamps the result.
async fn run_probe(probe: Arc<dyn Probe>, timeout: Duration) -> HealthStatus {
    let started = Instant::now();
    let deadline = started + timeout;
    let name = probe.name().to_owned();

    match tokio::time::timeout_at(deadline, probe.check(deadline)).await {
        Ok(mut status) => {
            status.component = name;
            status.last_checked = Timestamp::now();
            status.with_latency(started.elapsed())
        }
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET_ORCHESTRATOR,
                probe = %name,
                timeout_ms = timeout.as_millis() as u64,
                "Probe timed out"
            );
            HealthStatus::unhealthy(name, TIMEOUT_ERROR)
        }
    }
}

/// Converts a panicked or cancelled probe task into a result.
fn failed_task(name: &str, error: JoinError) -> HealthStatus {
    let message = if error.is_panic() {
        format!("Probe panicked: {}", panic_message(error.into_panic()))
    } else {
        "Probe task was cancelled".to_owned()
    };

    tracing::error!(
        target: TRACING_TARGET_ORCHESTRATOR,
        probe = name,
        error = %message,
        "Probe failed"
    );

    HealthStatus::unhealthy(name, message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "Unknown panic message".to_owned()
    }
}
