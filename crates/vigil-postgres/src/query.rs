//! Read-only statistics queries.

use std::fmt;
use std::future::Future;

use diesel::sql_types::{BigInt, Integer};
use diesel_async::RunQueryDsl;

use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Longest identifier PostgreSQL accepts without truncation.
const MAX_IDENTIFIER_LEN: usize = 63;

/// A table name that is safe to splice into SQL.
///
/// Only ASCII letters, digits and underscores are accepted, and the name is
/// always double-quoted, so mixed-case names such as `"User"` keep their case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Validates a table name.
    pub fn new(name: &str) -> PgResult<Self> {
        let valid = !name.is_empty()
            && name.len() <= MAX_IDENTIFIER_LEN
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid {
            Ok(Self(name.to_owned()))
        } else {
            Err(PgError::InvalidTable(name.to_owned()))
        }
    }

    /// Returns the unquoted name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

#[derive(diesel::QueryableByName)]
struct Liveness {
    #[diesel(sql_type = Integer)]
    #[allow(dead_code)]
    result: i32,
}

#[derive(diesel::QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Repository for store statistics.
pub trait StatsRepository {
    /// Runs `SELECT 1`.
    fn select_one(&mut self) -> impl Future<Output = PgResult<()>> + Send;

    /// Counts the rows of a table.
    fn count_rows(&mut self, table: &TableName) -> impl Future<Output = PgResult<u64>> + Send;
}

impl StatsRepository for PgConnection {
    async fn select_one(&mut self) -> PgResult<()> {
        let _: Liveness = diesel::sql_query("SELECT 1 AS result")
            .get_result(self)
            .await
            .map_err(PgError::from)?;
        Ok(())
    }

    async fn count_rows(&mut self, table: &TableName) -> PgResult<u64> {
        let query = format!("SELECT COUNT(*) AS count FROM {table}");
        tracing::trace!(target: TRACING_TARGET_QUERY, %query, "Counting rows");

        let row: RowCount = diesel::sql_query(query)
            .get_result(self)
            .await
            .map_err(PgError::from)?;
        Ok(u64::try_from(row.count).unwrap_or_default())
    }
}
