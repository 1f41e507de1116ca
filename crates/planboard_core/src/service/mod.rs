//! Planner use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Map repository failures onto the `NotFound`/`ValidationFailure`/
//!   `StorageFailure` taxonomy callers act on.

pub mod error;
pub mod list_service;
pub mod meal_plan_service;
pub mod merge_service;
pub mod recipe_service;
