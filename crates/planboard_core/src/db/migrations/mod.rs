//! Planner schema history.
//!
//! Each step creates one record family: lists and tasks, then the recipe
//! catalogue, then the meal plan. Steps only ever get appended; a database
//! opened by this build moves forward to the last step in a single
//! transaction, and `PRAGMA user_version` records how far it got.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    family: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        family: "lists_tasks",
        sql: include_str!("0001_lists_tasks.sql"),
    },
    SchemaStep {
        version: 2,
        family: "recipes",
        sql: include_str!("0002_recipes.sql"),
    },
    SchemaStep {
        version: 3,
        family: "meal_plan",
        sql: include_str!("0003_meal_plan.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the schema up to [`latest_version`].
///
/// A database written by a newer build is refused untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS.iter().filter(|step| step.version > from).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        log::debug!(
            "event=db_migrate module=db status=ok version={} family={}",
            step.version,
            step.family
        );
    }
    tx.commit()?;
    log::info!("event=db_migrate module=db status=done from={from} to={to}");
    Ok(())
}

/// Schema version stored in the database file.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
