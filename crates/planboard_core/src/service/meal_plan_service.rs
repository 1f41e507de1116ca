//! Meal plan use-case service and week view assembly.
//!
//! # Responsibility
//! - Create, rename and remove meal plan entries.
//! - Build the fixed seven-slot view of one week.
//!
//! # Invariants
//! - An entry created from a recipe carries a snapshot of the display text;
//!   later recipe edits never rewrite it.
//! - A week view always has seven slots, Monday first, even when the
//!   storage holds nothing for that range.

use crate::calendar::{DaySlot, Week, DAYS_PER_WEEK};
use crate::model::meal::{MealEntryId, MealPlanEntry};
use crate::model::recipe::RecipeId;
use crate::model::validation::{require_text, ValidationError};
use crate::repo::error::Entity;
use crate::repo::meal_repo::MealPlanRepository;
use crate::repo::recipe_repo::RecipeRepository;
use crate::service::error::{DeleteOutcome, ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::collections::HashSet;

/// Entries planned for one day slot, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    pub slot: DaySlot,
    pub meals: Vec<MealPlanEntry>,
}

impl DayPlan {
    pub fn date(&self) -> NaiveDate {
        self.slot.date
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

/// Seven day plans of one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekPlan {
    pub week: Week,
    pub days: Vec<DayPlan>,
}

impl WeekPlan {
    pub fn meal_count(&self) -> usize {
        self.days.iter().map(|day| day.meals.len()).sum()
    }
}

/// Meal plan service facade.
pub struct MealPlanService<M: MealPlanRepository, R: RecipeRepository> {
    meals: M,
    recipes: R,
}

impl<M: MealPlanRepository, R: RecipeRepository> MealPlanService<M, R> {
    pub fn new(meals: M, recipes: R) -> Self {
        Self { meals, recipes }
    }

    /// Adds an entry on `date`.
    ///
    /// With a recipe id the display text is the recipe title at this moment
    /// and `text` is ignored. Without one, `text` is required.
    pub fn add_meal_entry(
        &self,
        date: NaiveDate,
        text: &str,
        recipe_id: Option<RecipeId>,
    ) -> ServiceResult<MealPlanEntry> {
        match recipe_id {
            Some(recipe_id) => self.plan_recipe(recipe_id, date, None),
            None => {
                let text = require_text(text, ValidationError::EmptyMealText)?;
                let entry = self.meals.add_entry(date, &text, None)?;
                info!(
                    "event=meal_add module=meal_plan status=ok entry_id={} kind=free_form",
                    entry.id
                );
                Ok(entry)
            }
        }
    }

    /// Adds a recipe-linked entry, labelled `label` when it is not blank and
    /// with the recipe title otherwise.
    pub fn plan_recipe(
        &self,
        recipe_id: RecipeId,
        date: NaiveDate,
        label: Option<&str>,
    ) -> ServiceResult<MealPlanEntry> {
        let recipe = self
            .recipes
            .get_recipe(recipe_id)?
            .ok_or_else(|| ServiceError::not_found(Entity::Recipe, recipe_id))?;
        let display_text = label
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(&recipe.title);
        let entry = self.meals.add_entry(date, display_text, Some(recipe_id))?;
        info!(
            "event=meal_add module=meal_plan status=ok entry_id={} kind=recipe recipe_id={}",
            entry.id, recipe_id
        );
        Ok(entry)
    }

    pub fn get_meal_entry(&self, entry_id: MealEntryId) -> ServiceResult<MealPlanEntry> {
        self.meals
            .get_entry(entry_id)?
            .ok_or_else(|| ServiceError::not_found(Entity::MealEntry, entry_id))
    }

    /// Replaces the display text and keeps any recipe reference.
    pub fn rename_meal_entry(&self, entry_id: MealEntryId, text: &str) -> ServiceResult<MealPlanEntry> {
        let text = require_text(text, ValidationError::EmptyMealText)?;
        self.meals.update_entry_text(entry_id, &text)?;
        self.get_meal_entry(entry_id)
    }

    pub fn delete_meal_entry(&self, entry_id: MealEntryId) -> ServiceResult<DeleteOutcome> {
        let outcome = DeleteOutcome::from_removed(self.meals.delete_entry(entry_id)?);
        match outcome {
            DeleteOutcome::Removed => {
                info!("event=meal_delete module=meal_plan status=ok entry_id={entry_id}")
            }
            DeleteOutcome::AlreadyAbsent => {
                warn!("event=meal_delete module=meal_plan status=absent entry_id={entry_id}")
            }
        }
        Ok(outcome)
    }

    pub fn week_plan(&self, week: Week) -> ServiceResult<WeekPlan> {
        let mut entries = self
            .meals
            .list_entries_between(week.start(), week.end())?
            .into_iter()
            .peekable();

        let mut days = Vec::with_capacity(DAYS_PER_WEEK);
        for slot in week.days() {
            let mut meals = Vec::new();
            while let Some(entry) = entries.next_if(|entry| entry.date == slot.date) {
                meals.push(entry);
            }
            days.push(DayPlan { slot, meals });
        }
        Ok(WeekPlan { week, days })
    }

    /// Ingredient lines of every recipe still linked from the week.
    ///
    /// Lines are trimmed and kept on first appearance, walking days, then
    /// entries, then each recipe's own line order.
    pub fn week_ingredients(&self, week: Week) -> ServiceResult<Vec<String>> {
        let plan = self.week_plan(week)?;
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for entry in plan.days.iter().flat_map(|day| day.meals.iter()) {
            let Some(recipe_id) = entry.linked_recipe() else {
                continue;
            };
            let Some(recipe) = self.recipes.get_recipe(recipe_id)? else {
                continue;
            };
            for line in &recipe.ingredients {
                let line = line.trim();
                if !line.is_empty() && seen.insert(line.to_string()) {
                    lines.push(line.to_string());
                }
            }
        }
        Ok(lines)
    }
}
