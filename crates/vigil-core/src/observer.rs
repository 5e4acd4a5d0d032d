//! Run progress notifications.
//!
//! Observers are informational only: they see every component result as it
//! settles and the final document, but cannot alter either.

use tokio::sync::mpsc;

use crate::{HealthStatus, SystemHealth, TRACING_TARGET_ORCHESTRATOR};

/// Receives progress callbacks from the orchestrator.
pub trait RunObserver: Send + Sync {
    /// Called once before any probe starts.
    fn run_started(&self, _probes: &[&str]) {}

    /// Called as soon as a component result is known, in completion order.
    fn component_checked(&self, _status: &HealthStatus) {}

    /// Called once with the aggregated document.
    fn run_completed(&self, _health: &SystemHealth) {}
}

/// Logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn run_started(&self, probes: &[&str]) {
        tracing::info!(
            target: TRACING_TARGET_ORCHESTRATOR,
            probes = ?probes,
            "Starting health checks"
        );
    }

    fn component_checked(&self, status: &HealthStatus) {
        tracing::info!(
            target: TRACING_TARGET_ORCHESTRATOR,
            component = %status.component,
            status = %status.status,
            latency_ms = status.latency_ms,
            "Component checked"
        );
    }

    fn run_completed(&self, health: &SystemHealth) {
        tracing::info!(
            target: TRACING_TARGET_ORCHESTRATOR,
            overall_status = %health.overall_status,
            health_score = health.health_score,
            components = health.components.len(),
            "Health checks completed"
        );
    }
}

/// Event forwarded by [`ChannelObserver`].
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// A run started with the given probe names.
    Started(Vec<String>),
    /// A component result settled.
    Checked(HealthStatus),
    /// The run finished.
    Completed(Box<SystemHealth>),
}

/// Forwards progress over an unbounded channel.
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelObserver {
    /// Creates an observer and the receiving half of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: RunEvent) {
        let _ = self.sender.send(event);
    }
}

impl RunObserver for ChannelObserver {
    fn run_started(&self, probes: &[&str]) {
        self.send(RunEvent::Started(
            probes.iter().map(|name| (*name).to_owned()).collect(),
        ));
    }

    fn component_checked(&self, status: &HealthStatus) {
        self.send(RunEvent::Checked(status.clone()));
    }

    fn run_completed(&self, health: &SystemHealth) {
        self.send(RunEvent::Completed(Box::new(health.clone())));
    }
}
