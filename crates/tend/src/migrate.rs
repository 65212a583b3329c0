//! The additive migrator.
//!
//! Convergence, not history: each run reads the live catalog and issues
//! exactly the `ADD COLUMN` statements needed to reach the desired set.
//! A second run with the same input adds nothing.

use std::fmt;

use crate::Result;
use crate::column::ColumnSpec;
use crate::conn::{Connection, SqlError};
use crate::inspect::existing_columns;

/// What one migration run did, in declaration order.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Columns added by this run.
    pub added: Vec<ColumnSpec>,
    /// Columns that were already present, including lost races.
    pub skipped: Vec<ColumnSpec>,
    /// Columns whose ADD COLUMN statement failed, with the error.
    pub failed: Vec<(ColumnSpec, SqlError)>,
}

impl MigrationReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// True when the run changed nothing and nothing went wrong.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.failed.is_empty()
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for spec in &self.added {
            writeln!(f, "+ {}: {}", spec.name, spec.col_type)?;
        }
        for spec in &self.skipped {
            writeln!(f, "= {} (already present)", spec.name)?;
        }
        for (spec, err) in &self.failed {
            writeln!(f, "! {}: {}", spec.name, err)?;
        }
        write!(
            f,
            "{} added, {} skipped, {} failed",
            self.added.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Bring `table` up to the desired column set.
///
/// Columns are processed strictly in declaration order. Each addition
/// is its own statement: one failure is recorded and the run continues
/// with the next column. A duplicate-column rejection from the server
/// means another run added the column between our catalog read and the
/// statement; that counts as already present.
///
/// Fatal errors (unreachable database, missing table, failing catalog
/// query) abort before any column work.
pub async fn migrate(
    conn: &dyn Connection,
    table: &str,
    desired: &[ColumnSpec],
) -> Result<MigrationReport> {
    let mut existing = existing_columns(conn, table).await?;

    let mut report = MigrationReport::default();
    for spec in desired {
        if existing.contains(&spec.name) {
            report.skipped.push(spec.clone());
            continue;
        }

        let sql = spec.add_column_sql(table);
        match conn.execute(&sql).await {
            Ok(_) => {
                tracing::info!(table, column = %spec.name, "added column");
                existing.insert(&spec.name);
                report.added.push(spec.clone());
            }
            Err(err) if err.is_duplicate_column() => {
                tracing::debug!(table, column = %spec.name, "column appeared concurrently");
                existing.insert(&spec.name);
                report.skipped.push(spec.clone());
            }
            Err(err) => {
                tracing::warn!(table, column = %spec.name, error = %err, "column addition failed");
                report.failed.push((spec.clone(), err));
            }
        }
    }

    Ok(report)
}

/// Re-inspect `table` and return the desired columns still missing.
///
/// Empty means the table has converged.
pub async fn verify(
    conn: &dyn Connection,
    table: &str,
    desired: &[ColumnSpec],
) -> Result<Vec<String>> {
    let existing = existing_columns(conn, table).await?;
    Ok(desired
        .iter()
        .filter(|spec| !existing.contains(&spec.name))
        .map(|spec| spec.name.clone())
        .collect())
}
