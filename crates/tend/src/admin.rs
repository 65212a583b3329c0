//! Privileged-account chores.
//!
//! The application keeps a single privileged account in the `user`
//! table (`role = 'admin'`). These operations inspect it, create it,
//! and reset its password. Passwords are stored as Argon2 PHC strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use tokio_postgres::Client;

use crate::Result;
use crate::conn::SqlError;
use crate::error::Error;

/// The privileged account as stored.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: i32,
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub is_approved: bool,
    /// Creation time, rendered by the server.
    pub created_at: String,
}

/// Parameters for creating the privileged account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub password: String,
}

/// Outcome of a create attempt.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(AdminAccount),
    /// An admin already exists; nothing was written.
    AlreadyExists(AdminAccount),
}

const ACCOUNT_COLUMNS: &str =
    "id, email, phone, full_name, role, is_active, is_approved, created_at::text";

fn find_admin_sql() -> String {
    format!("SELECT {ACCOUNT_COLUMNS} FROM \"user\" WHERE role = 'admin' ORDER BY id LIMIT 1")
}

fn insert_admin_sql() -> String {
    format!(
        "INSERT INTO \"user\" \
         (email, phone, full_name, password_hash, role, is_active, is_approved, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, 'admin', true, true, now(), now()) \
         RETURNING {ACCOUNT_COLUMNS}"
    )
}

fn reset_password_sql() -> String {
    format!(
        "UPDATE \"user\" SET password_hash = $1, updated_at = now() \
         WHERE email = $2 \
         RETURNING {ACCOUNT_COLUMNS}"
    )
}

fn account_from_row(row: &tokio_postgres::Row) -> AdminAccount {
    AdminAccount {
        id: row.get(0),
        email: row.get(1),
        phone: row.get(2),
        full_name: row.get(3),
        role: row.get(4),
        is_active: row.get(5),
        is_approved: row.get(6),
        created_at: row.get(7),
    }
}

/// Look up the privileged account, if one exists.
pub async fn find_admin(client: &Client) -> Result<Option<AdminAccount>> {
    let row = client
        .query_opt(&find_admin_sql(), &[])
        .await
        .map_err(SqlError::from)?;
    Ok(row.as_ref().map(account_from_row))
}

/// Create the privileged account.
///
/// Refuses when one already exists and reports it instead, so a re-run
/// never clobbers live credentials.
pub async fn create_admin(client: &Client, new: &NewAdmin) -> Result<CreateOutcome> {
    if let Some(existing) = find_admin(client).await? {
        return Ok(CreateOutcome::AlreadyExists(existing));
    }

    let hash = hash_password(&new.password)?;
    let row = client
        .query_one(
            &insert_admin_sql(),
            &[&new.email, &new.phone, &new.full_name, &hash],
        )
        .await
        .map_err(SqlError::from)?;

    tracing::info!(email = %new.email, "created admin account");
    Ok(CreateOutcome::Created(account_from_row(&row)))
}

/// Re-key the account with the given email.
///
/// Returns `None` when no such account exists; nothing is written in
/// that case.
pub async fn reset_password(
    client: &Client,
    email: &str,
    new_password: &str,
) -> Result<Option<AdminAccount>> {
    let hash = hash_password(new_password)?;
    let row = client
        .query_opt(&reset_password_sql(), &[&hash, &email])
        .await
        .map_err(SqlError::from)?;

    if row.is_some() {
        tracing::info!(email = %email, "reset password");
    }
    Ok(row.as_ref().map(account_from_row))
}

/// Hash a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("Admin@123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Admin@123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Admin@123").unwrap();
        let b = hash_password("Admin@123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_stored_hash_is_an_error() {
        assert!(verify_password("Admin@123", "not-a-phc-string").is_err());
    }
}
