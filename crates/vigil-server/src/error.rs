//! Service layer error types.
//!
//! Errors raised while assembling the [`ServiceState`] (building the store
//! client, validating probe configuration, wiring the registry). Once the
//! state exists, probe failures are data and never surface here.
//!
//! [`ServiceState`]: crate::service::ServiceState

use std::borrow::Cow;
use std::error::Error as StdError;

use strum::{AsRefStr, Display, IntoStaticStr};

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What went wrong while assembling the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, IntoStaticStr)]
pub enum ErrorKind {
    /// Probe or store configuration was rejected.
    #[strum(serialize = "config")]
    Config,
    /// A client for an external system could not be created.
    #[strum(serialize = "external_service")]
    External,
    /// Registry wiring failed.
    #[strum(serialize = "internal_service")]
    Internal,
}

/// Service assembly error.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    fn scoped(kind: ErrorKind, scope: &str, message: impl AsRef<str>) -> Self {
        Self::new(kind, format!("{scope}: {}", message.as_ref()))
    }

    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Failure talking to or building a client for `service`.
    pub fn external(service: &str, message: impl AsRef<str>) -> Self {
        Self::scoped(ErrorKind::External, service, message)
    }

    /// Failure inside `service` itself.
    pub fn internal(service: &str, message: impl AsRef<str>) -> Self {
        Self::scoped(ErrorKind::Internal, service, message)
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<vigil_core::Error> for Error {
    fn from(err: vigil_core::Error) -> Self {
        let error = match err.kind() {
            vigil_core::ErrorKind::Configuration | vigil_core::ErrorKind::InvalidInput => {
                Error::config(err.reason())
            }
            vigil_core::ErrorKind::StoreError | vigil_core::ErrorKind::ExternalError => {
                Error::external("probe", err.reason())
            }
            _ => Error::internal("registry", err.reason()),
        };

        error.with_source(err)
    }
}

impl From<vigil_postgres::PgError> for Error {
    fn from(err: vigil_postgres::PgError) -> Self {
        Error::external("postgres", "Failed to create database client").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_creation() {
        let error = Error::config("invalid configuration");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "invalid configuration");
    }

    #[test]
    fn error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::internal("report", "cannot write report").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[test]
    fn external_service_error() {
        let error = Error::external("postgres", "Connection refused");

        assert_eq!(error.kind(), ErrorKind::External);
        assert!(error.to_string().contains("postgres"));
        assert!(error.to_string().contains("Connection refused"));
    }

    #[test]
    fn from_core_configuration_error() {
        let core = vigil_core::Error::configuration().with_message("probe timeout out of range");
        let error = Error::from(core);

        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "probe timeout out of range");
    }

    #[test]
    fn from_core_duplicate_probe_error() {
        let core = vigil_core::Error::duplicate_probe().with_message("api");
        let error = Error::from(core);

        assert_eq!(error.kind(), ErrorKind::Internal);
        assert!(error.message().starts_with("registry: "));
    }

    #[test]
    fn from_core_store_error() {
        let core = vigil_core::Error::store_error().with_message("pool closed");
        let error = Error::from(core);

        assert_eq!(error.kind(), ErrorKind::External);
        assert_eq!(error.message(), "probe: pool closed");
    }

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::Config.as_ref(), "config");
        assert_eq!(ErrorKind::External.to_string(), "external_service");
        assert_eq!(Error::internal("registry", "x").to_string(), "internal_service error: registry: x");
    }
}
