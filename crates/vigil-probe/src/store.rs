//! Relational store probe.

use std::fmt;
use std::sync::Arc;

use serde_json::Map;
use tokio::time::Instant;
use vigil_core::{HealthStatus, Probe, RecordStore};

use crate::TRACING_TARGET_PROBE;

/// Runs a liveness query, then counts rows in the key tables.
///
/// Any failure makes the component `Unhealthy` with the error message.
#[derive(Clone)]
pub struct StoreProbe {
    store: Arc<dyn RecordStore>,
    tables: Vec<String>,
}

impl StoreProbe {
    pub fn new(store: Arc<dyn RecordStore>, tables: Vec<String>) -> Self {
        Self { store, tables }
    }

    async fn inspect(&self) -> vigil_core::Result<Map<String, serde_json::Value>> {
        self.store.ping().await?;

        let mut counts = Map::new();
        for table in &self.tables {
            let rows = self.store.count_rows(table).await?;
            counts.insert(table.clone(), rows.into());
        }
        Ok(counts)
    }
}

#[async_trait::async_trait]
impl Probe for StoreProbe {
    fn name(&self) -> &str {
        "database"
    }

    fn label(&self) -> &str {
        "Database"
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        match self.inspect().await {
            Ok(counts) => HealthStatus::healthy(self.name())
                .with_detail("connected", true)
                .with_detail("tables", counts),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_PROBE,
                    probe = self.name(),
                    error = %error,
                    "Store check failed"
                );
                HealthStatus::unhealthy(self.name(), error.reason())
            }
        }
    }
}

impl fmt::Debug for StoreProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreProbe")
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}
