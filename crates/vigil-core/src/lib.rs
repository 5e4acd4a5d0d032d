#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for orchestrator runs.
pub const TRACING_TARGET_ORCHESTRATOR: &str = "vigil_core::orchestrator";

/// Tracing target for registry construction.
pub const TRACING_TARGET_REGISTRY: &str = "vigil_core::registry";

mod error;
mod health;
mod status;
mod system;

pub mod observer;
pub mod orchestrator;
pub mod probe;
pub mod registry;
pub mod rules;
pub mod scoring;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{Details, HealthStatus};
pub use observer::{ChannelObserver, RunEvent, RunObserver, TracingObserver};
pub use orchestrator::{DEFAULT_PROBE_TIMEOUT, Orchestrator, TIMEOUT_ERROR};
pub use probe::Probe;
pub use registry::ProbeRegistry;
pub use rules::{Priority, Recommendation};
pub use scoring::{StatusCounts, score};
pub use status::{OverallStatus, Status};
pub use store::RecordStore;
pub use system::SystemHealth;
