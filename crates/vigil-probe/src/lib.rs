#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for HTTP checks.
pub const TRACING_TARGET_HTTP: &str = "vigil_probe::http";

/// Tracing target for probe execution.
pub const TRACING_TARGET_PROBE: &str = "vigil_probe::probe";

mod api;
mod automation;
mod config;
mod container;
mod http;
mod integrations;
mod media;
mod realtime;
mod registry;
mod static_content;
mod store;

pub use api::{ApiProbe, Endpoint};
pub use automation::AutomationProbe;
pub use config::ProbeConfig;
pub use container::{ContainerEngine, ContainerProbe, DockerCli};
pub use http::{EndpointCheck, HttpChecker};
pub use integrations::{DEFAULT_INTEGRATIONS, EnvLookup, Integration, IntegrationProbe};
pub use media::MediaProbe;
pub use realtime::RealtimeProbe;
pub use registry::build_registry;
pub use static_content::StaticContentProbe;
pub use store::StoreProbe;
