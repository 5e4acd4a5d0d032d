use std::sync::Arc;

use vigil_core::{ProbeRegistry, RecordStore, Result};

use crate::config::ProbeConfig;
use crate::{
    ApiProbe, AutomationProbe, ContainerEngine, ContainerProbe, Endpoint, HttpChecker,
    IntegrationProbe, MediaProbe, RealtimeProbe, StaticContentProbe, StoreProbe,
};

/// Builds the standard registry:
/// `api`, `database`, `websocket`, `frontend`, `bots`, `audio`, `docker`,
/// `integrations`, in that order.
///
/// # Errors
///
/// Fails if the configuration is invalid or the HTTP client cannot be built.
pub fn build_registry(
    config: &ProbeConfig,
    store: Arc<dyn RecordStore>,
    engine: Arc<dyn ContainerEngine>,
) -> Result<ProbeRegistry> {
    config.validate()?;

    let timeout = config.probe_timeout();
    let http = HttpChecker::new(timeout)?;
    let join = ProbeConfig::join;

    let endpoints = vec![
        Endpoint::new("Main API", join(&config.app_url, "/api/health")),
        Endpoint::new("Homepage", config.app_url.clone()),
        Endpoint::new("Automation API", join(&config.automation_url, "/health")),
        Endpoint::new("Media API", join(&config.media_url, "/audio/health")),
    ];

    let mut registry = ProbeRegistry::new();
    registry.register(ApiProbe::new(endpoints, http.clone()))?;
    registry.register(StoreProbe::new(store, config.store_tables.clone()))?;
    registry.register(RealtimeProbe::new(config.realtime_url.clone(), timeout))?;
    registry.register(StaticContentProbe::new(
        config.app_url.clone(),
        config.web_root.clone(),
        config.critical_files.clone(),
        http.clone(),
    ))?;
    registry.register(
        AutomationProbe::new(config.automation_url.clone(), http.clone())
            .with_ai_integration(config.automation_ai_integration)
            .with_realtime_integration(config.automation_realtime_integration),
    )?;
    registry.register(MediaProbe::new(
        join(&config.media_url, "/audio/health"),
        http,
    ))?;
    registry.register(ContainerProbe::new(
        engine,
        config.expected_containers.clone(),
    ))?;
    registry.register(IntegrationProbe::default())?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;
    use vigil_core::mock::MemoryStore;

    use super::*;
    use crate::DockerCli;

    #[test]
    fn registers_every_probe_in_order() {
        let registry = build_registry(
            &ProbeConfig::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(DockerCli::default()),
        )
        .unwrap();

        assert_eq!(
            registry.names(),
            [
                "api",
                "database",
                "websocket",
                "frontend",
                "bots",
                "audio",
                "docker",
                "integrations",
            ]
        );
        assert_eq!(registry.get("bots").unwrap().label(), "Bot System");
    }

    #[tokio::test]
    async fn default_integrations_report_missing_services() {
        let registry = build_registry(
            &ProbeConfig::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(DockerCli::default()),
        )
        .unwrap();

        let probe = registry.get("integrations").unwrap();
        let status = probe.check(Instant::now()).await;
        let health = vigil_core::scoring::score(vec![status]);

        assert_eq!(
            health.missing_features,
            [
                "Clean Claims API integration",
                "Background check service integration",
            ]
        );
        assert!(
            health
                .recommendations
                .contains(&"Warning: Optimize integrations performance".to_owned())
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ProbeConfig {
            probe_timeout_secs: 0,
            ..Default::default()
        };
        let result = build_registry(
            &config,
            Arc::new(MemoryStore::new()),
            Arc::new(DockerCli::default()),
        );
        assert!(result.is_err());
    }
}
