//! Health response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Liveness marker returned by `GET /health`.
///
/// Produced without running any probe.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Liveness {
    /// Fixed marker text.
    pub status: String,
    /// When the marker was generated.
    pub timestamp: Timestamp,
    /// Application version.
    pub version: String,
    /// Paths served by the health router.
    pub endpoints: Vec<String>,
}

impl Liveness {
    /// Marker text reported while the service is up.
    pub const ONLINE: &'static str = "Health Check System Online";

    /// Creates the marker listing the comprehensive route and one route per component.
    pub fn new<'a>(components: impl IntoIterator<Item = &'a str>) -> Self {
        let endpoints = std::iter::once("/health/comprehensive".to_owned())
            .chain(components.into_iter().map(|name| format!("/health/{name}")))
            .collect();

        Self {
            status: Self::ONLINE.to_owned(),
            timestamp: Timestamp::now(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_component_order() {
        let liveness = Liveness::new(["api", "database"]);
        assert_eq!(
            liveness.endpoints,
            ["/health/comprehensive", "/health/api", "/health/database"]
        );
        assert_eq!(liveness.status, Liveness::ONLINE);
    }
}
