//! Meal plan repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist meal plan entries keyed by calendar day.
//! - Resolve the weak recipe reference on every read.
//!
//! # Invariants
//! - Days are stored as days-from-CE integers, so range queries stay
//!   correct for arbitrarily distant dates.
//! - Entries of one day are read in creation order (`created_order`).
//! - `recipe_uuid` carries no foreign key; a missing recipe is reported
//!   through `recipe_resolved = false`, never as a read error.

use crate::model::meal::{MealEntryId, MealPlanEntry};
use crate::model::recipe::RecipeId;
use crate::model::validation::{require_text, ValidationError};
use crate::repo::error::{Entity, RepoError, RepoResult};
use crate::repo::{begin_write, ensure_schema_ready, parse_flag, parse_uuid};
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    m.entry_uuid AS entry_uuid,
    m.plan_day AS plan_day,
    m.display_text AS display_text,
    m.recipe_uuid AS recipe_uuid,
    CASE WHEN r.recipe_uuid IS NULL THEN 0 ELSE 1 END AS recipe_resolved,
    m.created_order AS created_order,
    m.created_at AS created_at
FROM meal_plan_entries m
LEFT JOIN recipes r ON r.recipe_uuid = m.recipe_uuid";

/// Repository interface for meal plan entries.
pub trait MealPlanRepository {
    fn add_entry(
        &self,
        date: NaiveDate,
        display_text: &str,
        recipe_id: Option<RecipeId>,
    ) -> RepoResult<MealPlanEntry>;
    fn get_entry(&self, entry_id: MealEntryId) -> RepoResult<Option<MealPlanEntry>>;
    /// Replaces the display text; the recipe reference is untouched.
    fn update_entry_text(&self, entry_id: MealEntryId, display_text: &str) -> RepoResult<()>;
    /// Removes one entry. Returns `false` when it did not exist.
    fn delete_entry(&self, entry_id: MealEntryId) -> RepoResult<bool>;
    /// Entries with `first <= date <= last`, ordered by day then creation.
    fn list_entries_between(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> RepoResult<Vec<MealPlanEntry>>;
}

/// SQLite-backed meal plan repository.
pub struct SqliteMealPlanRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMealPlanRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["meal_plan_entries", "recipes"])?;
        Ok(Self { conn })
    }
}

impl MealPlanRepository for SqliteMealPlanRepository<'_> {
    fn add_entry(
        &self,
        date: NaiveDate,
        display_text: &str,
        recipe_id: Option<RecipeId>,
    ) -> RepoResult<MealPlanEntry> {
        let display_text = require_text(display_text, ValidationError::EmptyMealText)?;
        let entry_id = Uuid::new_v4();

        let tx = begin_write(self.conn)?;
        let created_order: i64 = tx.query_row(
            "SELECT COALESCE(MAX(created_order), -1) + 1 FROM meal_plan_entries;",
            [],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO meal_plan_entries (
                entry_uuid,
                plan_day,
                display_text,
                recipe_uuid,
                created_order
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entry_id.to_string(),
                day_number(date),
                display_text,
                recipe_id.map(|value| value.to_string()),
                created_order,
            ],
        )?;
        let entry = load_entry(&tx, entry_id)?
            .ok_or_else(|| RepoError::not_found(Entity::MealEntry, entry_id))?;
        tx.commit()?;
        Ok(entry)
    }

    fn get_entry(&self, entry_id: MealEntryId) -> RepoResult<Option<MealPlanEntry>> {
        load_entry(self.conn, entry_id)
    }

    fn update_entry_text(&self, entry_id: MealEntryId, display_text: &str) -> RepoResult<()> {
        let display_text = require_text(display_text, ValidationError::EmptyMealText)?;
        let changed = self.conn.execute(
            "UPDATE meal_plan_entries
             SET display_text = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE entry_uuid = ?1;",
            params![entry_id.to_string(), display_text],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(Entity::MealEntry, entry_id));
        }
        Ok(())
    }

    fn delete_entry(&self, entry_id: MealEntryId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM meal_plan_entries WHERE entry_uuid = ?1;",
            [entry_id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn list_entries_between(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> RepoResult<Vec<MealPlanEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE m.plan_day BETWEEN ?1 AND ?2
             ORDER BY m.plan_day ASC, m.created_order ASC;"
        ))?;
        let mut rows = stmt.query(params![day_number(first), day_number(last)])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}

fn load_entry(conn: &Connection, entry_id: MealEntryId) -> RepoResult<Option<MealPlanEntry>> {
    let mut stmt = conn.prepare(&format!("{ENTRY_SELECT_SQL} WHERE m.entry_uuid = ?1;"))?;
    let mut rows = stmt.query([entry_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_entry_row(row)?));
    }
    Ok(None)
}

fn day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

fn date_from_day_number(value: i64) -> RepoResult<NaiveDate> {
    i32::try_from(value)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid day number `{value}` in meal_plan_entries.plan_day"
            ))
        })
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<MealPlanEntry> {
    let entry_text: String = row.get("entry_uuid")?;
    let recipe_id = row
        .get::<_, Option<String>>("recipe_uuid")?
        .map(|value| parse_uuid(&value, "meal_plan_entries.recipe_uuid"))
        .transpose()?;

    Ok(MealPlanEntry {
        id: parse_uuid(&entry_text, "meal_plan_entries.entry_uuid")?,
        date: date_from_day_number(row.get("plan_day")?)?,
        display_text: row.get("display_text")?,
        recipe_id,
        recipe_resolved: parse_flag(row.get("recipe_resolved")?, "recipe_resolved")?,
        created_order: row.get("created_order")?,
        created_at: row.get("created_at")?,
    })
}
