//! Task list and task records.
//!
//! # Invariants
//! - A list exclusively owns its tasks; deleting the list deletes them.
//! - `position` is meaningful only relative to other tasks of the same list.
//! - `completed` is independent of `position`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task list.
pub type ListId = Uuid;
/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Named, ordered collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: ListId,
    /// Display name; not required to be unique.
    pub name: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// One actionable item of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub list_id: ListId,
    pub text: String,
    pub completed: bool,
    /// Read order key within `list_id`. Gaps are allowed.
    pub position: i64,
    /// Epoch milliseconds.
    pub created_at: i64,
}
