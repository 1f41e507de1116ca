//! Task list repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist lists and their tasks.
//! - Own the position rewrite for reorder and the append-at-end rule.
//!
//! # Invariants
//! - Task listing is deterministic: `position ASC, created_at ASC,
//!   task_uuid ASC`.
//! - Append assigns `MAX(position) + 1` (or 0) inside the same write
//!   transaction that inserts the rows.
//! - Reorder rewrites every task of the list in one transaction, or none.
//! - Completion updates never write `position`.
//! - Appended task text is stored exactly as given; callers trim user input.

use crate::model::list::{ListId, Task, TaskId, TaskList};
use crate::model::validation::{require_text, ValidationError};
use crate::ordering::{plan_order, PlannedOrder};
use crate::repo::error::{Entity, RepoError, RepoResult};
use crate::repo::{begin_write, bool_to_int, ensure_schema_ready, parse_flag, parse_uuid};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const LIST_SELECT_SQL: &str = "SELECT
    list_uuid,
    name,
    created_at
FROM lists";

const TASK_SELECT_SQL: &str = "SELECT
    task_uuid,
    list_uuid,
    text,
    completed,
    position,
    created_at
FROM tasks";

/// Repository interface for lists and tasks.
pub trait ListRepository {
    fn create_list(&self, name: &str) -> RepoResult<TaskList>;
    fn get_list(&self, list_id: ListId) -> RepoResult<Option<TaskList>>;
    /// All lists in creation order.
    fn list_lists(&self) -> RepoResult<Vec<TaskList>>;
    fn rename_list(&self, list_id: ListId, name: &str) -> RepoResult<()>;
    /// Deletes a list together with all of its tasks.
    fn delete_list(&self, list_id: ListId) -> RepoResult<()>;
    /// Appends tasks at the end of a list, in the given order, atomically.
    fn append_tasks(&self, list_id: ListId, texts: &[String]) -> RepoResult<Vec<Task>>;
    fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>>;
    /// Tasks of one list in read order.
    fn list_tasks(&self, list_id: ListId) -> RepoResult<Vec<Task>>;
    fn set_completed(&self, task_id: TaskId, completed: bool) -> RepoResult<()>;
    fn toggle_completed(&self, task_id: TaskId) -> RepoResult<Task>;
    fn update_task_text(&self, task_id: TaskId, text: &str) -> RepoResult<()>;
    /// Removes one task. Returns `false` when it did not exist.
    fn delete_task(&self, task_id: TaskId) -> RepoResult<bool>;
    /// Rewrites all positions of a list from a requested order snapshot.
    fn reorder_tasks(
        &self,
        list_id: ListId,
        requested: &[TaskId],
    ) -> RepoResult<PlannedOrder<TaskId>>;
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["lists", "tasks"])?;
        Ok(Self { conn })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&self, name: &str) -> RepoResult<TaskList> {
        let name = require_text(name, ValidationError::EmptyListName)?;
        let list_id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO lists (list_uuid, name) VALUES (?1, ?2);",
            params![list_id.to_string(), name],
        )?;
        load_list(self.conn, list_id)?
            .ok_or_else(|| RepoError::not_found(Entity::List, list_id))
    }

    fn get_list(&self, list_id: ListId) -> RepoResult<Option<TaskList>> {
        load_list(self.conn, list_id)
    }

    fn list_lists(&self) -> RepoResult<Vec<TaskList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }

    fn rename_list(&self, list_id: ListId, name: &str) -> RepoResult<()> {
        let name = require_text(name, ValidationError::EmptyListName)?;
        let changed = self.conn.execute(
            "UPDATE lists
             SET name = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE list_uuid = ?1;",
            params![list_id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(Entity::List, list_id));
        }
        Ok(())
    }

    fn delete_list(&self, list_id: ListId) -> RepoResult<()> {
        let tx = begin_write(self.conn)?;
        // Explicit delete keeps the cascade independent of the
        // foreign_keys pragma of the caller's connection.
        tx.execute(
            "DELETE FROM tasks WHERE list_uuid = ?1;",
            [list_id.to_string()],
        )?;
        let changed = tx.execute(
            "DELETE FROM lists WHERE list_uuid = ?1;",
            [list_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(Entity::List, list_id));
        }
        tx.commit()?;
        Ok(())
    }

    fn append_tasks(&self, list_id: ListId, texts: &[String]) -> RepoResult<Vec<Task>> {
        // Text is stored verbatim; only blank text is rejected.
        if texts.iter().any(|text| text.trim().is_empty()) {
            return Err(ValidationError::EmptyTaskText.into());
        }

        let tx = begin_write(self.conn)?;
        ensure_list_exists(&tx, list_id)?;

        let first_position = next_position(&tx, list_id)?;
        let mut created_ids = Vec::with_capacity(texts.len());
        {
            let mut insert = tx.prepare_cached(
                "INSERT INTO tasks (task_uuid, list_uuid, text, completed, position)
                 VALUES (?1, ?2, ?3, 0, ?4);",
            )?;
            for (offset, text) in texts.iter().enumerate() {
                let task_id = Uuid::new_v4();
                insert.execute(params![
                    task_id.to_string(),
                    list_id.to_string(),
                    text,
                    first_position + offset as i64,
                ])?;
                created_ids.push(task_id);
            }
        }

        let mut created = Vec::with_capacity(created_ids.len());
        for task_id in created_ids {
            let task = load_task(&tx, task_id)?
                .ok_or_else(|| RepoError::not_found(Entity::Task, task_id))?;
            created.push(task);
        }
        tx.commit()?;
        Ok(created)
    }

    fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>> {
        load_task(self.conn, task_id)
    }

    fn list_tasks(&self, list_id: ListId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE list_uuid = ?1
             ORDER BY position ASC, created_at ASC, task_uuid ASC;"
        ))?;
        let mut rows = stmt.query([list_id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn set_completed(&self, task_id: TaskId, completed: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET completed = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE task_uuid = ?1;",
            params![task_id.to_string(), bool_to_int(completed)],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(Entity::Task, task_id));
        }
        Ok(())
    }

    fn toggle_completed(&self, task_id: TaskId) -> RepoResult<Task> {
        let tx = begin_write(self.conn)?;
        let changed = tx.execute(
            "UPDATE tasks
             SET completed = 1 - completed,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE task_uuid = ?1;",
            [task_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(Entity::Task, task_id));
        }
        let task = load_task(&tx, task_id)?
            .ok_or_else(|| RepoError::not_found(Entity::Task, task_id))?;
        tx.commit()?;
        Ok(task)
    }

    fn update_task_text(&self, task_id: TaskId, text: &str) -> RepoResult<()> {
        let text = require_text(text, ValidationError::EmptyTaskText)?;
        let changed = self.conn.execute(
            "UPDATE tasks
             SET text = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE task_uuid = ?1;",
            params![task_id.to_string(), text],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(Entity::Task, task_id));
        }
        Ok(())
    }

    fn delete_task(&self, task_id: TaskId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE task_uuid = ?1;",
            [task_id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn reorder_tasks(
        &self,
        list_id: ListId,
        requested: &[TaskId],
    ) -> RepoResult<PlannedOrder<TaskId>> {
        let tx = begin_write(self.conn)?;
        ensure_list_exists(&tx, list_id)?;

        let current = list_task_ids(&tx, list_id)?;
        let plan = plan_order(&current, requested);
        {
            let mut update = tx.prepare_cached(
                "UPDATE tasks
                 SET position = ?3,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE task_uuid = ?1
                   AND list_uuid = ?2;",
            )?;
            for (index, task_id) in plan.order.iter().enumerate() {
                update.execute(params![
                    task_id.to_string(),
                    list_id.to_string(),
                    index as i64
                ])?;
            }
        }

        tx.commit()?;
        Ok(plan)
    }
}

fn load_list(conn: &Connection, list_id: ListId) -> RepoResult<Option<TaskList>> {
    let mut stmt = conn.prepare(&format!("{LIST_SELECT_SQL} WHERE list_uuid = ?1;"))?;
    let mut rows = stmt.query([list_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_list_row(row)?));
    }
    Ok(None)
}

fn load_task(conn: &Connection, task_id: TaskId) -> RepoResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE task_uuid = ?1;"))?;
    let mut rows = stmt.query([task_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_task_row(row)?));
    }
    Ok(None)
}

fn ensure_list_exists(conn: &Connection, list_id: ListId) -> RepoResult<()> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM lists WHERE list_uuid = ?1;",
            [list_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::not_found(Entity::List, list_id)),
    }
}

fn next_position(conn: &Connection, list_id: ListId) -> RepoResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1
         FROM tasks
         WHERE list_uuid = ?1;",
        [list_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn list_task_ids(conn: &Connection, list_id: ListId) -> RepoResult<Vec<TaskId>> {
    let mut stmt = conn.prepare(
        "SELECT task_uuid
         FROM tasks
         WHERE list_uuid = ?1
         ORDER BY position ASC, created_at ASC, task_uuid ASC;",
    )?;
    let mut rows = stmt.query([list_id.to_string()])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.push(parse_uuid(&value, "tasks.task_uuid")?);
    }
    Ok(ids)
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<TaskList> {
    let id_text: String = row.get("list_uuid")?;
    Ok(TaskList {
        id: parse_uuid(&id_text, "lists.list_uuid")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("task_uuid")?;
    let list_text: String = row.get("list_uuid")?;
    Ok(Task {
        id: parse_uuid(&id_text, "tasks.task_uuid")?,
        list_id: parse_uuid(&list_text, "tasks.list_uuid")?,
        text: row.get("text")?,
        completed: parse_flag(row.get("completed")?, "tasks.completed")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
    })
}
