//! Application state and dependency injection.

mod config;
mod report;

use vigil_core::Orchestrator;

pub use crate::service::config::ServiceConfig;
pub use crate::service::report::{ConsoleReporter, render as render_report};
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub orchestrator: Orchestrator,
    pub console_reporter: ConsoleReporter,
}

impl ServiceState {
    /// Creates state from an already-built orchestrator.
    pub fn new(orchestrator: Orchestrator, console_reporter: ConsoleReporter) -> Self {
        Self {
            orchestrator,
            console_reporter,
        }
    }

    /// Initializes application state from configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let orchestrator = config.build_orchestrator()?;
        let console_reporter = ConsoleReporter::new(!config.quiet);
        Ok(Self::new(orchestrator, console_reporter))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(orchestrator: Orchestrator);
impl_di!(console_reporter: ConsoleReporter);
