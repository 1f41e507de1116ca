//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access traits per record family.
//! - Keep SQL and transaction details out of the service layer.
//!
//! # Invariants
//! - Multi-row writes run inside one `BEGIN IMMEDIATE` transaction, so
//!   competing writers are serialized and a failure leaves no partial
//!   change behind.
//! - Repository constructors reject connections that are not fully
//!   migrated.

pub mod error;
pub mod list_repo;
pub mod meal_repo;
pub mod recipe_repo;

use crate::db::migrations::{current_user_version, latest_version};
use error::{RepoError, RepoResult};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Starts a write transaction that takes the database write lock up front.
///
/// Dropping the returned transaction without commit rolls it back.
pub(crate) fn begin_write(conn: &Connection) -> RepoResult<Transaction<'_>> {
    Ok(Transaction::new_unchecked(
        conn,
        TransactionBehavior::Immediate,
    )?)
}

pub(crate) fn ensure_schema_ready(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
