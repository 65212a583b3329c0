//! Error taxonomy.
//!
//! Fatal errors abort a run before any column work. Per-column
//! failures never surface here: they are captured inside the
//! [`MigrationReport`](crate::MigrationReport) and the run continues.

use thiserror::Error;

use crate::conn::SqlError;

#[derive(Debug, Error)]
pub enum Error {
    /// Could not reach or authenticate to the database.
    #[error("failed to connect to database: {0}")]
    Connection(#[source] tokio_postgres::Error),

    /// The target table is not present in the active schema.
    #[error("table {0} does not exist in the current schema")]
    NoSuchTable(String),

    /// The catalog query itself failed.
    #[error("catalog query for table {table} failed: {source}")]
    SchemaQuery {
        table: String,
        #[source]
        source: SqlError,
    },

    /// A statement outside the per-column migration loop failed.
    #[error("statement failed: {0}")]
    Sql(#[from] SqlError),

    /// Hashing a credential failed.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}
