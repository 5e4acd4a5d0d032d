//! Probe configuration.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;
use vigil_core::{Error, Result};

/// Default probe timeout in seconds.
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Files the static content tier cannot render without.
const DEFAULT_CRITICAL_FILES: &[&str] = &[
    "app/layout.tsx",
    "app/page.tsx",
    "components/ui/ultra-modern-header.tsx",
    "components/ui/navigation/mobile-nav.tsx",
    "components/ui/navigation/breadcrumbs.tsx",
    "components/ui/navigation/location-dropdown.tsx",
];

/// Where the probed subsystems live and what they are expected to contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[serde(default)]
pub struct ProbeConfig {
    /// Base URL of the application tier (API and homepage).
    #[cfg_attr(
        feature = "config",
        arg(long = "app-url", env = "VIGIL_APP_URL", default_value = "http://localhost:3000")
    )]
    pub app_url: Url,

    /// Base URL of the chat/automation API.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "automation-url",
            env = "VIGIL_AUTOMATION_URL",
            default_value = "http://localhost:3005"
        )
    )]
    pub automation_url: Url,

    /// Base URL of the media-generation API.
    #[cfg_attr(
        feature = "config",
        arg(long = "media-url", env = "VIGIL_MEDIA_URL", default_value = "http://localhost:3007")
    )]
    pub media_url: Url,

    /// WebSocket URL of the realtime transport.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "realtime-url",
            env = "VIGIL_REALTIME_URL",
            default_value = "ws://localhost:3002"
        )
    )]
    pub realtime_url: Url,

    /// Directory the critical files are resolved against.
    #[cfg_attr(
        feature = "config",
        arg(long = "web-root", env = "VIGIL_WEB_ROOT", default_value = ".")
    )]
    pub web_root: PathBuf,

    /// Critical static content files, relative to the web root.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "critical-files",
            env = "VIGIL_CRITICAL_FILES",
            value_delimiter = ',',
            default_values_t = default_critical_files()
        )
    )]
    pub critical_files: Vec<String>,

    /// Container names expected to be running.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "expected-containers",
            env = "VIGIL_EXPECTED_CONTAINERS",
            value_delimiter = ',',
            default_values_t = default_expected_containers()
        )
    )]
    pub expected_containers: Vec<String>,

    /// Tables whose row counts are reported by the store probe.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "store-tables",
            env = "VIGIL_STORE_TABLES",
            value_delimiter = ',',
            default_values_t = default_store_tables()
        )
    )]
    pub store_tables: Vec<String>,

    /// Whether the automation tier has its AI backend wired in.
    #[cfg_attr(
        feature = "config",
        arg(long = "automation-ai", env = "VIGIL_AUTOMATION_AI", default_value_t = false)
    )]
    pub automation_ai_integration: bool,

    /// Whether the automation tier is connected to the realtime transport.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "automation-realtime",
            env = "VIGIL_AUTOMATION_REALTIME",
            default_value_t = false
        )
    )]
    pub automation_realtime_integration: bool,

    /// Per-probe timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "probe-timeout-secs",
            env = "VIGIL_PROBE_TIMEOUT_SECS",
            default_value_t = DEFAULT_PROBE_TIMEOUT_SECS
        )
    )]
    pub probe_timeout_secs: u64,
}

fn default_critical_files() -> Vec<String> {
    DEFAULT_CRITICAL_FILES.iter().map(|s| (*s).to_owned()).collect()
}

fn default_expected_containers() -> Vec<String> {
    ["nrp-bot-api", "nrp-websocket", "nrp-redis", "nrp-postgres"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn default_store_tables() -> Vec<String> {
    ["User", "Contractor", "Lead"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn local(url: &str) -> Url {
    Url::parse(url).expect("built-in url is valid")
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            app_url: local("http://localhost:3000"),
            automation_url: local("http://localhost:3005"),
            media_url: local("http://localhost:3007"),
            realtime_url: local("ws://localhost:3002"),
            web_root: PathBuf::from("."),
            critical_files: default_critical_files(),
            expected_containers: default_expected_containers(),
            store_tables: default_store_tables(),
            automation_ai_integration: false,
            automation_realtime_integration: false,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl ProbeConfig {
    /// Returns the per-probe timeout.
    #[inline]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.probe_timeout_secs == 0 || self.probe_timeout_secs > 300 {
            return Err(Error::configuration()
                .with_message("probe timeout must be between 1 and 300 seconds"));
        }

        for (name, url, schemes) in [
            ("app", &self.app_url, &["http", "https"]),
            ("automation", &self.automation_url, &["http", "https"]),
            ("media", &self.media_url, &["http", "https"]),
            ("realtime", &self.realtime_url, &["ws", "wss"]),
        ] {
            if !schemes.contains(&url.scheme()) {
                return Err(Error::configuration().with_message(format!(
                    "{name} url must use one of {schemes:?}, got '{}'",
                    url.scheme()
                )));
            }
        }

        Ok(())
    }

    /// Resolves `path` against `base`, keeping the base path.
    pub(crate) fn join(base: &Url, path: &str) -> Url {
        let mut url = base.clone();
        let joined = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ProbeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.store_tables, ["User", "Contractor", "Lead"]);
        assert_eq!(config.expected_containers.len(), 4);
    }

    #[test]
    fn rejects_wrong_schemes() {
        let config = ProbeConfig {
            realtime_url: Url::parse("http://localhost:3002").unwrap(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ProbeConfig {
            probe_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn joins_paths() {
        let base = Url::parse("http://localhost:3000").unwrap();
        assert_eq!(
            ProbeConfig::join(&base, "/api/health").as_str(),
            "http://localhost:3000/api/health"
        );

        let base = Url::parse("http://example.com/prefix/").unwrap();
        assert_eq!(
            ProbeConfig::join(&base, "health").as_str(),
            "http://example.com/prefix/health"
        );
    }
}
