//! Persistence and ordering engine for the planboard planner.
//!
//! Task lists with drag reordering, a recipe catalogue, a seven-day meal
//! plan and the merge of recipe ingredients into tasks, all stored in one
//! SQLite database.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod repo;
pub mod service;

pub use calendar::{resolve_week, week_of, CalendarError, DaySlot, Week};
pub use config::{ConfigError, PlannerConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_from_config, init_logging, LoggingError};
pub use model::list::{ListId, Task, TaskId, TaskList};
pub use model::meal::{MealEntryId, MealPlanEntry};
pub use model::recipe::{NewRecipePhoto, PhotoId, Recipe, RecipeDraft, RecipeId, RecipePhoto};
pub use model::validation::ValidationError;
pub use repo::error::{Entity, RepoError, RepoResult};
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::meal_repo::{MealPlanRepository, SqliteMealPlanRepository};
pub use repo::recipe_repo::{RecipeRepository, SqliteRecipeRepository};
pub use service::error::{DeleteOutcome, ErrorKind, ServiceError, ServiceResult};
pub use service::list_service::TaskListService;
pub use service::meal_plan_service::{DayPlan, MealPlanService, WeekPlan};
pub use service::merge_service::IngredientMergeService;
pub use service::recipe_service::RecipeService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
