//! Connection setup and post-create hooks for the deadpool manager.

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::TRACING_TARGET_CONNECTION;
use crate::client::PgConfig;

/// Opens a connection and records how long the handshake took.
///
/// A failed handshake is what the `database` probe reports, so it is logged
/// with the masked address and left for the caller to surface.
pub fn setup_callback<C>(addr: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    async move {
        let started = Instant::now();
        let connection = C::establish(addr).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if let Err(error) = &connection {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                addr = %PgConfig::mask_url(addr),
                elapsed_ms,
                error = %error,
                "Connection handshake failed"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                elapsed_ms,
                "Connection opened"
            );
        }

        connection
    }
    .boxed()
}

/// Flags connections that arrive broken; the next query reports the failure.
pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            created = ?metrics.created,
            "Pooled connection is broken"
        );
    }

    Ok(())
}
