//! Domain model for lists, tasks, recipes and meal plan entries.
//!
//! # Responsibility
//! - Define canonical records shared by repositories and services.
//! - Own field-level validation so every write path rejects blank input
//!   before touching storage.
//!
//! # Invariants
//! - Every record is identified by a stable UUID v4 that is never reused.
//! - Task order within a list is carried by `Task::position` only.

pub mod list;
pub mod meal;
pub mod recipe;
pub mod validation;
