//! Database connection seam.
//!
//! The inspector and migrator talk to Postgres through the
//! [`Connection`] trait: one catalog read and one statement executor.
//! The real implementation wraps `tokio_postgres::Client` and logs
//! every round-trip via tracing; tests substitute a scripted mock.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio_postgres::error::SqlState;
use tracing::Instrument;

use crate::error::Error as TendError;

/// A statement-level database error.
///
/// Carries the SQLSTATE when the server reported one, so callers can
/// tell a duplicate-column rejection apart from, say, a permission
/// failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SqlError {
    code: Option<SqlState>,
    message: String,
}

impl SqlError {
    pub fn new(code: Option<SqlState>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The SQLSTATE reported by the server, if any.
    pub fn code(&self) -> Option<&SqlState> {
        self.code.as_ref()
    }

    /// True when the server rejected an ADD COLUMN because the column
    /// already exists (SQLSTATE 42701): another run won the race.
    pub fn is_duplicate_column(&self) -> bool {
        self.code.as_ref() == Some(&SqlState::DUPLICATE_COLUMN)
    }
}

impl From<tokio_postgres::Error> for SqlError {
    fn from(e: tokio_postgres::Error) -> Self {
        let code = e.as_db_error().map(|db| db.code().clone());
        Self {
            code,
            message: e.to_string(),
        }
    }
}

/// Minimal surface the inspector and migrator need from a database
/// session.
///
/// Implemented for `tokio_postgres::Client`.
pub trait Connection: Send + Sync {
    /// Column names of `table` from the catalog, in ordinal order, or
    /// `None` when the table does not exist in the active schema.
    ///
    /// Always a live read; schema state can change between runs by
    /// external actors, so results must never be cached.
    fn table_columns<'a>(
        &'a self,
        table: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<String>>, SqlError>> + Send + 'a>>;

    /// Execute a single statement as its own atomic unit.
    fn execute<'a>(
        &'a self,
        sql: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, SqlError>> + Send + 'a>>;
}

const TABLE_EXISTS_SQL: &str = "SELECT 1 FROM information_schema.tables \
     WHERE table_schema = current_schema() AND table_name = $1";

const TABLE_COLUMNS_SQL: &str = "SELECT column_name FROM information_schema.columns \
     WHERE table_schema = current_schema() AND table_name = $1 \
     ORDER BY ordinal_position";

impl Connection for tokio_postgres::Client {
    fn table_columns<'a>(
        &'a self,
        table: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<String>>, SqlError>> + Send + 'a>> {
        Box::pin(async move {
            let span = tracing::debug_span!(
                "db.catalog",
                table = %table,
                columns = tracing::field::Empty,
            );

            let exists = self
                .query_opt(TABLE_EXISTS_SQL, &[&table])
                .instrument(span.clone())
                .await
                .map_err(SqlError::from)?;
            if exists.is_none() {
                return Ok(None);
            }

            let rows = self
                .query(TABLE_COLUMNS_SQL, &[&table])
                .instrument(span.clone())
                .await
                .map_err(SqlError::from)?;
            span.record("columns", rows.len());

            Ok(Some(
                rows.into_iter()
                    .map(|row| row.get::<_, String>(0))
                    .collect(),
            ))
        })
    }

    fn execute<'a>(
        &'a self,
        sql: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, SqlError>> + Send + 'a>> {
        Box::pin(async move {
            let span = tracing::debug_span!(
                "db.execute",
                sql = %sql,
                affected = tracing::field::Empty,
            );
            let affected = tokio_postgres::Client::execute(self, sql, &[])
                .instrument(span.clone())
                .await
                .map_err(SqlError::from)?;
            span.record("affected", affected);
            Ok(affected)
        })
    }
}

/// Open a single exclusive connection to the database.
///
/// The connection driver is spawned onto the runtime; the returned
/// client owns the session for the rest of the run. No pooling: these
/// are one-shot administrative runs, not a serving path.
pub async fn connect(url: &str) -> Result<tokio_postgres::Client, TendError> {
    let (client, connection) = tokio_postgres::connect(url, tokio_postgres::NoTls)
        .await
        .map_err(TendError::Connection)?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!("database connection error: {e}");
        }
    });

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_column_detection() {
        let dup = SqlError::new(
            Some(SqlState::DUPLICATE_COLUMN),
            "column \"ward_no\" of relation \"user\" already exists",
        );
        assert!(dup.is_duplicate_column());

        let denied = SqlError::new(
            Some(SqlState::INSUFFICIENT_PRIVILEGE),
            "permission denied for table user",
        );
        assert!(!denied.is_duplicate_column());

        let unknown = SqlError::new(None, "connection reset");
        assert!(!unknown.is_duplicate_column());
    }
}
