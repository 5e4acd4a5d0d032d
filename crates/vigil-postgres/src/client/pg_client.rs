use std::fmt;
use std::sync::Arc;

use deadpool::managed::{Hook, Pool};
use derive_more::{Deref, DerefMut};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use vigil_core::RecordStore;

use super::custom_hooks;
use crate::query::{StatsRepository, TableName};
use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CLIENT,
    TRACING_TARGET_CONNECTION,
};

/// Connection pool status information.
#[derive(Debug, Clone)]
pub struct PgPoolStatus {
    /// Maximum number of connections in the pool
    pub max_size: usize,
    /// Current number of connections in the pool
    pub size: usize,
    /// Number of available connections
    pub available: usize,
    /// Number of requests waiting for connections
    pub waiting: usize,
}

/// Pooled PostgreSQL client.
///
/// Cheap to clone. The pool opens connections lazily, so building a client
/// never touches the network; a dead database shows up on the first query.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool configuration is invalid.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::debug!(target: TRACING_TARGET_CONNECTION, "Initializing database client");

        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(custom_hooks::setup_callback);
        let manager =
            AsyncDieselConnectionManager::new_with_config(&config.postgres_url, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(custom_hooks::post_create))
            .build()
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CONNECTION, error = %e, "Failed to create connection pool");
                PgError::Unexpected(format!("Failed to build connection pool: {}", e).into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Checks a connection out of the pool, opening one if needed.
    ///
    /// # Errors
    ///
    /// Fails when the database cannot be reached within the connection
    /// timeout.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let conn = self.inner.pool.get().await.inspect_err(|error| {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                error = %error,
                pool = ?self.pool_status(),
                "Connection checkout failed"
            );
        })?;

        Ok(PgConn::new(conn))
    }

    /// Gets the current pool status and statistics.
    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Gets the database configuration used by this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

#[async_trait::async_trait]
impl RecordStore for PgClient {
    async fn ping(&self) -> vigil_core::Result<()> {
        let mut conn = self.get_connection().await?;
        conn.select_one().await?;
        Ok(())
    }

    async fn count_rows(&self, table: &str) -> vigil_core::Result<u64> {
        let table = TableName::new(table)?;
        let mut conn = self.get_connection().await?;
        let rows = conn.count_rows(&table).await?;

        tracing::debug!(target: TRACING_TARGET_CLIENT, table = %table, rows, "Counted rows");
        Ok(rows)
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgClient")
            .field("config", &self.inner.config)
            .field("pool", &self.pool_status())
            .finish()
    }
}

/// A pooled database connection, returned to the pool on drop.
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Creates a new connection wrapper from a pooled connection.
    pub fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}
