//! Recipe catalogue use-case service.
//!
//! # Invariants
//! - Recipe title must not be blank; ingredient lines are stored verbatim.
//! - Deleting a recipe leaves meal plan entries that reference it in place.

use crate::model::recipe::{NewRecipePhoto, PhotoId, Recipe, RecipeDraft, RecipeId, RecipePhoto};
use crate::repo::error::Entity;
use crate::repo::recipe_repo::RecipeRepository;
use crate::service::error::{DeleteOutcome, ServiceError, ServiceResult};
use log::info;

/// Recipe service facade.
pub struct RecipeService<R: RecipeRepository> {
    repo: R,
}

impl<R: RecipeRepository> RecipeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_recipe(
        &self,
        title: impl Into<String>,
        ingredient_lines: Vec<String>,
        instructions: impl Into<String>,
    ) -> ServiceResult<Recipe> {
        let draft = RecipeDraft::new(title, ingredient_lines, instructions).normalized()?;
        let recipe = self.repo.create_recipe(&draft)?;
        info!(
            "event=recipe_create module=recipes status=ok recipe_id={} ingredient_count={}",
            recipe.id,
            recipe.ingredients.len()
        );
        Ok(recipe)
    }

    /// Replaces title, ingredients and instructions of an existing recipe.
    pub fn update_recipe(&self, recipe_id: RecipeId, draft: RecipeDraft) -> ServiceResult<Recipe> {
        let draft = draft.normalized()?;
        Ok(self.repo.update_recipe(recipe_id, &draft)?)
    }

    pub fn delete_recipe(&self, recipe_id: RecipeId) -> ServiceResult<()> {
        self.repo.delete_recipe(recipe_id)?;
        info!("event=recipe_delete module=recipes status=ok recipe_id={recipe_id}");
        Ok(())
    }

    pub fn get_recipe(&self, recipe_id: RecipeId) -> ServiceResult<Recipe> {
        self.repo
            .get_recipe(recipe_id)?
            .ok_or_else(|| ServiceError::not_found(Entity::Recipe, recipe_id))
    }

    /// All recipes sorted by title.
    pub fn recipes(&self) -> ServiceResult<Vec<Recipe>> {
        Ok(self.repo.list_recipes()?)
    }

    /// Records a photo reference at the end of the recipe's photo order.
    pub fn add_photo(&self, recipe_id: RecipeId, photo: NewRecipePhoto) -> ServiceResult<RecipePhoto> {
        photo.validate()?;
        let stored = self.repo.add_photo(recipe_id, &photo)?;
        info!(
            "event=recipe_photo_add module=recipes status=ok recipe_id={} upload_order={}",
            recipe_id, stored.upload_order
        );
        Ok(stored)
    }

    pub fn photos(&self, recipe_id: RecipeId) -> ServiceResult<Vec<RecipePhoto>> {
        if self.repo.get_recipe(recipe_id)?.is_none() {
            return Err(ServiceError::not_found(Entity::Recipe, recipe_id));
        }
        Ok(self.repo.list_photos(recipe_id)?)
    }

    pub fn remove_photo(&self, photo_id: PhotoId) -> ServiceResult<DeleteOutcome> {
        Ok(DeleteOutcome::from_removed(self.repo.delete_photo(photo_id)?))
    }
}
