//! Ingredient-to-task merge use-case.
//!
//! # Responsibility
//! - Turn selected ingredient lines into tasks of a target list.
//!
//! # Invariants
//! - Selected lines are appended in ascending index order, regardless of
//!   the order the indices were supplied in.
//! - The whole selection is validated before anything is written, and the
//!   append happens in one transaction: either every selected line becomes
//!   a task or none does.
//! - Task text equals the ingredient line exactly.

use crate::model::list::{ListId, Task};
use crate::model::recipe::RecipeId;
use crate::model::validation::ValidationError;
use crate::repo::error::Entity;
use crate::repo::list_repo::ListRepository;
use crate::repo::recipe_repo::RecipeRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::BTreeSet;
use std::time::Instant;

/// Merge service over a recipe source and a list target.
pub struct IngredientMergeService<R: RecipeRepository, L: ListRepository> {
    recipes: R,
    lists: L,
}

impl<R: RecipeRepository, L: ListRepository> IngredientMergeService<R, L> {
    pub fn new(recipes: R, lists: L) -> Self {
        Self { recipes, lists }
    }

    /// Appends the selected ingredient lines of a recipe to a list.
    ///
    /// Duplicate indices select a line once. An empty selection creates
    /// nothing but still requires both records to exist.
    pub fn merge_ingredients_to_list(
        &self,
        recipe_id: RecipeId,
        list_id: ListId,
        selected_line_indices: &[usize],
    ) -> ServiceResult<Vec<Task>> {
        let recipe = self
            .recipes
            .get_recipe(recipe_id)?
            .ok_or_else(|| ServiceError::not_found(Entity::Recipe, recipe_id))?;
        let lines = select_lines(&recipe.ingredients, selected_line_indices)?;
        self.append_selection(list_id, lines, "recipe")
    }

    /// Same as [`Self::merge_ingredients_to_list`] for an ingredient
    /// sequence that is not a stored recipe, such as a week's aggregated
    /// meal plan ingredients.
    pub fn merge_lines_to_list(
        &self,
        list_id: ListId,
        lines: &[String],
        selected_line_indices: &[usize],
    ) -> ServiceResult<Vec<Task>> {
        let lines = select_lines(lines, selected_line_indices)?;
        if let Some(index) = lines.iter().position(|line| line.trim().is_empty()) {
            return Err(ValidationError::EmptyIngredientLine { index }.into());
        }
        self.append_selection(list_id, lines, "lines")
    }

    fn append_selection(
        &self,
        list_id: ListId,
        lines: Vec<String>,
        source: &str,
    ) -> ServiceResult<Vec<Task>> {
        let started_at = Instant::now();
        if self.lists.get_list(list_id)?.is_none() {
            return Err(ServiceError::not_found(Entity::List, list_id));
        }
        if lines.is_empty() {
            info!("event=ingredient_merge module=merge status=noop source={source} list_id={list_id}");
            return Ok(Vec::new());
        }

        match self.lists.append_tasks(list_id, &lines) {
            Ok(created) => {
                info!(
                    "event=ingredient_merge module=merge status=ok source={} list_id={} created={} duration_ms={}",
                    source,
                    list_id,
                    created.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(created)
            }
            Err(err) => {
                warn!(
                    "event=ingredient_merge module=merge status=error source={} list_id={} error={}",
                    source, list_id, err
                );
                Err(err.into())
            }
        }
    }
}

/// Picks `lines[i]` for every distinct selected index, ascending.
pub fn select_lines(lines: &[String], selected: &[usize]) -> Result<Vec<String>, ValidationError> {
    let indices: BTreeSet<usize> = selected.iter().copied().collect();
    if let Some(&index) = indices.iter().find(|&&index| index >= lines.len()) {
        return Err(ValidationError::SelectionOutOfRange {
            index,
            len: lines.len(),
        });
    }
    Ok(indices.into_iter().map(|index| lines[index].clone()).collect())
}
