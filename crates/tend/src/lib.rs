//! Maintenance chores for a Postgres-backed application.
//!
//! The heart of this crate is an idempotent additive-column migrator:
//! given the list of columns the application expects on a table, it
//! reads the live catalog and issues one `ALTER TABLE ... ADD COLUMN`
//! per missing column, skipping everything already present. Running it
//! twice in a row is safe by construction; the second run adds nothing.
//!
//! Schema changes here are additive only. Columns are never altered or
//! dropped, and there is no migration history to keep in sync: every
//! run converges the table toward the desired set from whatever state
//! the catalog reports at that moment.
//!
//! # Example
//!
//! ```ignore
//! use tend::{ColType, ColumnSpec};
//!
//! let client = tend::connect(&database_url).await?;
//!
//! let desired = vec![
//!     ColumnSpec::text("municipality"),
//!     ColumnSpec::new("ward_no", ColType::Integer),
//! ];
//!
//! let report = tend::migrate(&client, "user", &desired).await?;
//! println!("{report}");
//! ```
//!
//! The crate also carries the admin-account chores that live alongside
//! schema maintenance in practice: inspecting the privileged account,
//! creating it, and resetting its password. See [`find_admin`],
//! [`create_admin`], and [`reset_password`].

mod admin;
mod column;
mod conn;
mod error;
mod inspect;
mod migrate;

pub use admin::{
    AdminAccount, CreateOutcome, NewAdmin, create_admin, find_admin, hash_password,
    reset_password, verify_password,
};
pub use column::{ColType, ColumnSpec, quote_ident};
pub use conn::{Connection, SqlError, connect};
pub use error::Error;
pub use inspect::{ColumnSet, existing_columns};
pub use migrate::{MigrationReport, migrate, verify};

// Re-export the client type so binaries don't need their own
// tokio-postgres dependency.
pub use tokio_postgres::Client;

/// Result type for tend operations.
pub type Result<T> = std::result::Result<T, Error>;
