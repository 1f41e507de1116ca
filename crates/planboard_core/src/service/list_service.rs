//! Task list use-case service (ordering engine entry points).
//!
//! # Responsibility
//! - Validate list/task input above the repository layer.
//! - Expose create/append/complete/reorder/delete operations.
//!
//! # Invariants
//! - `reorder` is a full-snapshot, last-write-wins replace.
//! - `append_task` always lands after every existing task of the list.
//! - Completion changes never move a task.

use crate::model::list::{ListId, Task, TaskId, TaskList};
use crate::model::validation::{require_text, ValidationError};
use crate::repo::error::Entity;
use crate::repo::list_repo::ListRepository;
use crate::service::error::{DeleteOutcome, ServiceError, ServiceResult};
use log::{info, warn};
use std::time::Instant;

/// Task list service facade.
pub struct TaskListService<R: ListRepository> {
    repo: R,
}

impl<R: ListRepository> TaskListService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_list(&self, name: impl Into<String>) -> ServiceResult<TaskList> {
        let name = require_text(&name.into(), ValidationError::EmptyListName)?;
        let list = self.repo.create_list(&name)?;
        info!("event=list_create module=lists status=ok list_id={}", list.id);
        Ok(list)
    }

    /// All lists in creation order.
    pub fn lists(&self) -> ServiceResult<Vec<TaskList>> {
        Ok(self.repo.list_lists()?)
    }

    pub fn get_list(&self, list_id: ListId) -> ServiceResult<TaskList> {
        self.repo
            .get_list(list_id)?
            .ok_or_else(|| ServiceError::not_found(Entity::List, list_id))
    }

    pub fn rename_list(&self, list_id: ListId, name: impl Into<String>) -> ServiceResult<()> {
        let name = require_text(&name.into(), ValidationError::EmptyListName)?;
        Ok(self.repo.rename_list(list_id, &name)?)
    }

    /// Deletes the list and every task it owns.
    pub fn delete_list(&self, list_id: ListId) -> ServiceResult<()> {
        self.repo.delete_list(list_id)?;
        info!("event=list_delete module=lists status=ok list_id={list_id}");
        Ok(())
    }

    /// Appends one task after all current tasks of the list.
    pub fn append_task(&self, list_id: ListId, text: impl Into<String>) -> ServiceResult<Task> {
        let text = require_text(&text.into(), ValidationError::EmptyTaskText)?;
        let mut created = self.repo.append_tasks(list_id, &[text])?;
        let task = created
            .pop()
            .ok_or_else(|| ServiceError::not_found(Entity::List, list_id))?;
        info!(
            "event=task_append module=lists status=ok list_id={} position={}",
            list_id, task.position
        );
        Ok(task)
    }

    pub fn get_task(&self, task_id: TaskId) -> ServiceResult<Task> {
        self.repo
            .get_task(task_id)?
            .ok_or_else(|| ServiceError::not_found(Entity::Task, task_id))
    }

    /// Tasks of the list in read order.
    pub fn tasks(&self, list_id: ListId) -> ServiceResult<Vec<Task>> {
        if self.repo.get_list(list_id)?.is_none() {
            return Err(ServiceError::not_found(Entity::List, list_id));
        }
        Ok(self.repo.list_tasks(list_id)?)
    }

    /// Sets the completed flag. Repeating the call is harmless.
    pub fn set_completed(&self, task_id: TaskId, completed: bool) -> ServiceResult<()> {
        Ok(self.repo.set_completed(task_id, completed)?)
    }

    /// Flips the completed flag and returns the updated task.
    pub fn toggle_completed(&self, task_id: TaskId) -> ServiceResult<Task> {
        Ok(self.repo.toggle_completed(task_id)?)
    }

    pub fn edit_task_text(&self, task_id: TaskId, text: impl Into<String>) -> ServiceResult<()> {
        let text = require_text(&text.into(), ValidationError::EmptyTaskText)?;
        Ok(self.repo.update_task_text(task_id, &text)?)
    }

    /// Removes one task; other positions are left as they are.
    pub fn delete_task(&self, task_id: TaskId) -> ServiceResult<DeleteOutcome> {
        let outcome = DeleteOutcome::from_removed(self.repo.delete_task(task_id)?);
        if outcome == DeleteOutcome::AlreadyAbsent {
            warn!("event=task_delete module=lists status=absent task_id={task_id}");
        }
        Ok(outcome)
    }

    /// Applies a client order snapshot to the list.
    ///
    /// Ids not in the list are skipped. Tasks missing from the snapshot keep
    /// their relative order after the supplied ones. Returns the resulting
    /// read order.
    pub fn reorder(&self, list_id: ListId, ordered_task_ids: &[TaskId]) -> ServiceResult<Vec<TaskId>> {
        let started_at = Instant::now();
        match self.repo.reorder_tasks(list_id, ordered_task_ids) {
            Ok(plan) => {
                info!(
                    "event=task_reorder module=lists status=ok list_id={} supplied={} ignored={} carried_over={} duration_ms={}",
                    list_id,
                    plan.supplied,
                    plan.ignored,
                    plan.carried_over(),
                    started_at.elapsed().as_millis()
                );
                Ok(plan.order)
            }
            Err(err) => {
                warn!(
                    "event=task_reorder module=lists status=error list_id={} duration_ms={} error={}",
                    list_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}
