//! Ordered, name-keyed collection of probes.

use std::fmt;
use std::sync::Arc;

use crate::{Error, Probe, Result, TRACING_TARGET_REGISTRY};

/// Ordered set of probes, keyed by [`Probe::name`].
///
/// The registry is assembled once at startup and is read-only afterwards;
/// run results always follow registration order.
#[derive(Clone, Default)]
pub struct ProbeRegistry {
    probes: Vec<Arc<dyn Probe>>,
}

impl ProbeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a probe.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DuplicateProbe`](crate::ErrorKind::DuplicateProbe)
    /// if a probe with the same name is already registered.
    pub fn register(&mut self, probe: impl Probe + 'static) -> Result<()> {
        self.register_arc(Arc::new(probe))
    }

    /// Registers an already shared probe.
    pub fn register_arc(&mut self, probe: Arc<dyn Probe>) -> Result<()> {
        let name = probe.name();
        if name.is_empty() {
            return Err(Error::invalid_input().with_message("probe name must not be empty"));
        }

        if self.contains(name) {
            return Err(Error::duplicate_probe()
                .with_message(format!("probe '{name}' is already registered")));
        }

        tracing::debug!(
            target: TRACING_TARGET_REGISTRY,
            probe = name,
            position = self.probes.len(),
            "Probe registered"
        );

        self.probes.push(probe);
        Ok(())
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, probe: impl Probe + 'static) -> Result<Self> {
        self.register(probe)?;
        Ok(self)
    }

    /// Returns the probe with the given name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Probe>> {
        self.probes.iter().find(|probe| probe.name() == name)
    }

    /// Returns `true` if a probe with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns probe names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.probes.iter().map(|probe| probe.name()).collect()
    }

    /// Iterates over the probes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Probe>> {
        self.probes.iter()
    }

    /// Number of registered probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl fmt::Debug for ProbeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeRegistry")
            .field("probes", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::mock::StaticProbe;

    #[test]
    fn keeps_registration_order() -> Result<()> {
        let registry = ProbeRegistry::new()
            .with(StaticProbe::healthy("websocket"))?
            .with(StaticProbe::healthy("api"))?
            .with(StaticProbe::degraded("database"))?;

        assert_eq!(registry.names(), ["websocket", "api", "database"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("api"));
        assert!(registry.get("frontend").is_none());
        Ok(())
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = ProbeRegistry::new();
        registry.register(StaticProbe::healthy("api")).unwrap();

        let error = registry.register(StaticProbe::degraded("api")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DuplicateProbe);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_empty_names() {
        let error = ProbeRegistry::new()
            .with(StaticProbe::healthy(""))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }
}
