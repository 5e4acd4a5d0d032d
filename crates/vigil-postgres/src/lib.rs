#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for client-related operations.
pub const TRACING_TARGET_CLIENT: &str = "vigil_postgres::client";

/// Tracing target for database query operations.
pub const TRACING_TARGET_QUERY: &str = "vigil_postgres::queries";

/// Tracing target for database connection operations.
///
/// Use this target for logging connection establishment, pool management, and connection errors.
pub const TRACING_TARGET_CONNECTION: &str = "vigil_postgres::connection";

mod client;
pub mod query;

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::ConnectionError;
use diesel::result::Error;
pub use diesel_async::AsyncPgConnection as PgConnection;

use crate::error::ErrorHint;

pub use crate::client::{ConnectionPool, PgClient, PgConfig, PgConn, PgPoolStatus, PooledConnection};
pub use crate::query::{StatsRepository, TableName};

pub mod error {
    //! Error types and utilities for database operations.
    //!
    //! See [`PgError`] for the main error type used throughout this crate.
    //!
    //! [`PgError`]: crate::PgError

    use std::borrow::Cow;

    pub use deadpool::managed::TimeoutType;
    pub use diesel::result::{ConnectionError as DieselConnectionError, Error as DieselError};
    pub use diesel_async::pooled_connection::PoolError as DieselPoolError;
    pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

    /// Provides contextual hints for error types to aid in debugging and user messaging.
    pub trait ErrorHint {
        /// Returns an additional hint for an error type.
        fn hint(&self) -> Cow<'static, str>;
    }

    impl ErrorHint for TimeoutType {
        fn hint(&self) -> Cow<'static, str> {
            match self {
                TimeoutType::Wait => Cow::Borrowed("Connection pool is exhausted"),
                TimeoutType::Create => Cow::Borrowed(
                    "Unable to establish new database connection, check the database url and availability",
                ),
                TimeoutType::Recycle => Cow::Borrowed("Failed to recycle database connection"),
            }
        }
    }
}

/// Error type for all PostgreSQL operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Invalid configuration parameters or missing settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection creation, pool wait or recycling timed out.
    #[error("Database operation timed out: {}", .0.hint())]
    Timeout(TimeoutType),

    /// Failed to establish or maintain a database connection.
    #[error("Database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Query execution failed.
    #[error("Database query error: {0}")]
    Query(#[from] Error),

    /// A table name was rejected before reaching the database.
    #[error("Invalid table name: {0}")]
    InvalidTable(String),

    /// Unexpected error occurred.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Returns whether this error indicates a transient failure.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_) | PgError::Connection(ConnectionError::BadConnection(_))
        )
    }
}

impl From<error::DeadpoolError> for PgError {
    fn from(value: error::DeadpoolError) -> Self {
        use error::{DeadpoolError, DieselPoolError};

        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => {
                tracing::warn!(target: TRACING_TARGET_CONNECTION, "Unexpected post-create hook error: {}", err);
                Self::Unexpected(err.to_string().into())
            }
            DeadpoolError::NoRuntimeSpecified => {
                tracing::error!(target: TRACING_TARGET_CONNECTION, "No tokio runtime specified for connection pool");
                Self::Unexpected("No runtime specified".into())
            }
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "Connection pool is closed".into(),
            )),
        }
    }
}

impl From<PgError> for vigil_core::Error {
    fn from(value: PgError) -> Self {
        let error = match &value {
            PgError::Config(_) | PgError::InvalidTable(_) => vigil_core::Error::configuration(),
            PgError::Timeout(_) => vigil_core::Error::timeout(),
            PgError::Connection(_) | PgError::Query(_) | PgError::Unexpected(_) => {
                vigil_core::Error::store_error()
            }
        };

        error.with_message(value.to_string()).with_source(value)
    }
}

/// Specialized [`Result`] type for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use vigil_core::ErrorKind;

    use super::*;

    #[test]
    fn converts_into_core_error() {
        let error: vigil_core::Error = PgError::Timeout(TimeoutType::Create).into();
        assert_eq!(error.kind(), ErrorKind::Timeout);
        assert!(error.reason().starts_with("Database operation timed out"));

        let error: vigil_core::Error = PgError::InvalidTable("users;--".into()).into();
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert_eq!(error.reason(), "Invalid table name: users;--");
    }

    #[test]
    fn timeouts_are_transient() {
        assert!(PgError::Timeout(TimeoutType::Wait).is_transient());
        assert!(!PgError::Config("bad".into()).is_transient());
    }
}
