use std::sync::Arc;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use vigil_core::{Orchestrator, TracingObserver};
use vigil_postgres::PgConfig;
use vigil_probe::{DockerCli, ProbeConfig, build_registry};

use crate::Result;

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Probe targets and timeouts.
    #[cfg_attr(feature = "config", command(flatten))]
    pub probe: ProbeConfig,

    /// Record store connection.
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres: PgConfig,

    /// Suppresses the console report printed after each comprehensive run.
    #[cfg_attr(feature = "config", arg(long, env = "VIGIL_QUIET", default_value_t = false))]
    #[serde(default)]
    pub quiet: bool,
}

impl ServiceConfig {
    /// Builds the orchestrator over the standard probe registry.
    ///
    /// The store pool is created lazily, so an unreachable database shows up
    /// as an unhealthy `database` component rather than an error here.
    pub fn build_orchestrator(&self) -> Result<Orchestrator> {
        let store = self.postgres.clone().build()?;
        let engine = DockerCli::default();
        let registry = build_registry(&self.probe, Arc::new(store), Arc::new(engine))?;

        let orchestrator = Orchestrator::new(registry)
            .with_probe_timeout(self.probe.probe_timeout())
            .with_observer(TracingObserver);

        Ok(orchestrator)
    }
}
