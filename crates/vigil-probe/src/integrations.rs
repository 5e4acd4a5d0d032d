//! Third-party integration configuration probe.

use std::fmt;
use std::sync::Arc;

use serde_json::Map;
use tokio::time::Instant;
use vigil_core::{HealthStatus, Probe, Status};

/// Looks up a configuration value by name.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A third-party service and the variable that configures it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integration {
    /// Detail key reported for this service.
    pub key: &'static str,
    /// Variable holding its credential; `None` if there is no integration yet.
    pub variable: Option<&'static str>,
}

/// Services checked by default.
pub const DEFAULT_INTEGRATIONS: &[Integration] = &[
    Integration { key: "stripe", variable: Some("STRIPE_SECRET_KEY") },
    Integration { key: "twilio", variable: Some("TWILIO_ACCOUNT_SID") },
    Integration { key: "sendgrid", variable: Some("SENDGRID_API_KEY") },
    Integration { key: "elevenLabs", variable: Some("ELEVENLABS_API_KEY") },
    Integration { key: "googleMaps", variable: Some("NEXT_PUBLIC_GOOGLE_MAPS_API_KEY") },
    Integration { key: "cleanClaims", variable: None },
    Integration { key: "backgroundChecks", variable: None },
];

/// Reports which integrations have credentials configured.
///
/// Only presence is checked, never connectivity, so the component is always
/// reported as `Degraded`.
#[derive(Clone)]
pub struct IntegrationProbe {
    integrations: Vec<Integration>,
    lookup: EnvLookup,
}

impl Default for IntegrationProbe {
    fn default() -> Self {
        Self::new(Arc::new(|name: &str| std::env::var(name).ok()))
    }
}

impl IntegrationProbe {
    /// Checks [`DEFAULT_INTEGRATIONS`] through `lookup`.
    pub fn new(lookup: EnvLookup) -> Self {
        Self {
            integrations: DEFAULT_INTEGRATIONS.to_vec(),
            lookup,
        }
    }

    fn is_configured(&self, integration: &Integration) -> bool {
        integration
            .variable
            .and_then(|variable| (self.lookup)(variable))
            .is_some_and(|value| !value.trim().is_empty())
    }
}

#[async_trait::async_trait]
impl Probe for IntegrationProbe {
    fn name(&self) -> &str {
        "integrations"
    }

    fn label(&self) -> &str {
        "Integrations"
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        let mut details = Map::new();
        let mut configured = 0;
        for integration in &self.integrations {
            let present = self.is_configured(integration);
            configured += usize::from(present);
            details.insert(integration.key.to_owned(), present.into());
        }

        details.insert("configuredCount".to_owned(), configured.into());
        details.insert("totalCount".to_owned(), self.integrations.len().into());
        HealthStatus::new(self.name(), Status::Degraded).with_details(details)
    }
}

impl fmt::Debug for IntegrationProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationProbe")
            .field("integrations", &self.integrations)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> EnvLookup {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Arc::new(move |name: &str| vars.get(name).cloned())
    }

    #[tokio::test]
    async fn reports_presence_flags() {
        let probe = IntegrationProbe::new(lookup(&[
            ("STRIPE_SECRET_KEY", "sk_test"),
            ("SENDGRID_API_KEY", "  "),
        ]));
        let status = probe.check(Instant::now()).await;

        assert_eq!(status.status, Status::Degraded);
        assert_eq!(status.detail_bool("stripe"), Some(true));
        assert_eq!(status.detail_bool("sendgrid"), Some(false));
        assert_eq!(status.detail_bool("elevenLabs"), Some(false));
        assert_eq!(status.detail_bool("cleanClaims"), Some(false));
        assert_eq!(status.detail("configuredCount"), Some(&json!(1)));
        assert_eq!(status.detail("totalCount"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn fully_configured_is_still_degraded() {
        let probe = IntegrationProbe::new(Arc::new(|_: &str| Some("set".to_owned())));
        let status = probe.check(Instant::now()).await;

        assert_eq!(status.status, Status::Degraded);
        assert_eq!(status.detail_bool("googleMaps"), Some(true));
        assert_eq!(status.detail_bool("backgroundChecks"), Some(false));
    }
}
