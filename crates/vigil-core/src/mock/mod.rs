//! Mock probes and stores for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! vigil-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use vigil_core::mock::{HangingProbe, StaticProbe};
//! use vigil_core::ProbeRegistry;
//!
//! let registry = ProbeRegistry::new()
//!     .with(StaticProbe::healthy("api"))?
//!     .with(HangingProbe::new("websocket"))?;
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use crate::{Error, HealthStatus, Probe, RecordStore, Result, Status};

/// Probe that always reports the same result.
#[derive(Debug)]
pub struct StaticProbe {
    name: String,
    result: HealthStatus,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticProbe {
    /// Creates a probe that reports the given result.
    pub fn new(result: HealthStatus) -> Self {
        Self {
            name: result.component.clone(),
            result,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a probe reporting `status`.
    pub fn with_status(name: impl Into<String>, status: Status) -> Self {
        Self::new(HealthStatus::new(name, status))
    }

    /// Creates a healthy probe.
    pub fn healthy(name: impl Into<String>) -> Self {
        Self::with_status(name, Status::Healthy)
    }

    /// Creates a degraded probe.
    pub fn degraded(name: impl Into<String>) -> Self {
        Self::with_status(name, Status::Degraded)
    }

    /// Creates an unhealthy probe with one error.
    pub fn unhealthy(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(HealthStatus::unhealthy(name, error))
    }

    /// Sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `check` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Probe for StaticProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        // Left stale; the orchestrator restamps it.
        let mut result = self.result.clone();
        result.last_checked = jiff::Timestamp::UNIX_EPOCH;
        result
    }
}

/// Probe that panics when checked.
#[derive(Debug)]
pub struct PanickingProbe {
    name: String,
}

impl PanickingProbe {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait::async_trait]
impl Probe for PanickingProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        panic!("{} probe exploded", self.name)
    }
}

/// Probe that never settles.
#[derive(Debug)]
pub struct HangingProbe {
    name: String,
}

impl HangingProbe {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait::async_trait]
impl Probe for HangingProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        std::future::pending().await
    }
}

/// In-memory [`RecordStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, u64>>,
    failure: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store that answers every ping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Adds a table with the given row count.
    pub fn with_table(self, table: impl Into<String>, rows: u64) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.insert(table.into(), rows);
        }
        self
    }

    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::store_error().with_message(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.check_failure()
    }

    async fn count_rows(&self, table: &str) -> Result<u64> {
        self.check_failure()?;
        let tables = self
            .tables
            .lock()
            .map_err(|_| Error::internal_error().with_message("store lock poisoned"))?;
        tables.get(table).copied().ok_or_else(|| {
            Error::not_found().with_message(format!("relation \"{table}\" does not exist"))
        })
    }
}
