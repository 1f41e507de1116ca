//! Recipe repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist recipes with their ordered ingredient lines and photo
//!   references.
//!
//! # Invariants
//! - Ingredient lines are stored one row per line keyed by `line_index`
//!   and always read back in that order.
//! - Create/update replace the full ingredient sequence in one transaction.
//! - Deleting a recipe removes its ingredients and photo references but
//!   never meal plan entries that point at it.

use crate::model::recipe::{
    NewRecipePhoto, PhotoId, Recipe, RecipeDraft, RecipeId, RecipePhoto, MAX_PHOTOS_PER_RECIPE,
};
use crate::model::validation::ValidationError;
use crate::repo::error::{Entity, RepoError, RepoResult};
use crate::repo::{begin_write, ensure_schema_ready, parse_uuid};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const PHOTO_SELECT_SQL: &str = "SELECT
    photo_uuid,
    recipe_uuid,
    file_name,
    original_name,
    mime_type,
    file_size,
    upload_order
FROM recipe_photos";

/// Repository interface for the recipe catalogue.
pub trait RecipeRepository {
    fn create_recipe(&self, draft: &RecipeDraft) -> RepoResult<Recipe>;
    /// Replaces title, instructions and the whole ingredient sequence.
    fn update_recipe(&self, recipe_id: RecipeId, draft: &RecipeDraft) -> RepoResult<Recipe>;
    fn get_recipe(&self, recipe_id: RecipeId) -> RepoResult<Option<Recipe>>;
    /// All recipes sorted by title.
    fn list_recipes(&self) -> RepoResult<Vec<Recipe>>;
    fn delete_recipe(&self, recipe_id: RecipeId) -> RepoResult<()>;
    fn add_photo(&self, recipe_id: RecipeId, photo: &NewRecipePhoto) -> RepoResult<RecipePhoto>;
    fn list_photos(&self, recipe_id: RecipeId) -> RepoResult<Vec<RecipePhoto>>;
    /// Removes one photo reference. Returns `false` when it did not exist.
    fn delete_photo(&self, photo_id: PhotoId) -> RepoResult<bool>;
}

/// SQLite-backed recipe repository.
pub struct SqliteRecipeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecipeRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["recipes", "recipe_ingredients", "recipe_photos"])?;
        Ok(Self { conn })
    }
}

impl RecipeRepository for SqliteRecipeRepository<'_> {
    fn create_recipe(&self, draft: &RecipeDraft) -> RepoResult<Recipe> {
        let draft = draft.normalized()?;
        let recipe_id = Uuid::new_v4();

        let tx = begin_write(self.conn)?;
        tx.execute(
            "INSERT INTO recipes (recipe_uuid, title, instructions) VALUES (?1, ?2, ?3);",
            params![recipe_id.to_string(), draft.title, draft.instructions],
        )?;
        write_ingredients(&tx, recipe_id, &draft.ingredients)?;
        let recipe = load_recipe(&tx, recipe_id)?
            .ok_or_else(|| RepoError::not_found(Entity::Recipe, recipe_id))?;
        tx.commit()?;
        Ok(recipe)
    }

    fn update_recipe(&self, recipe_id: RecipeId, draft: &RecipeDraft) -> RepoResult<Recipe> {
        let draft = draft.normalized()?;

        let tx = begin_write(self.conn)?;
        let changed = tx.execute(
            "UPDATE recipes
             SET title = ?2,
                 instructions = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE recipe_uuid = ?1;",
            params![recipe_id.to_string(), draft.title, draft.instructions],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(Entity::Recipe, recipe_id));
        }
        tx.execute(
            "DELETE FROM recipe_ingredients WHERE recipe_uuid = ?1;",
            [recipe_id.to_string()],
        )?;
        write_ingredients(&tx, recipe_id, &draft.ingredients)?;
        let recipe = load_recipe(&tx, recipe_id)?
            .ok_or_else(|| RepoError::not_found(Entity::Recipe, recipe_id))?;
        tx.commit()?;
        Ok(recipe)
    }

    fn get_recipe(&self, recipe_id: RecipeId) -> RepoResult<Option<Recipe>> {
        load_recipe(self.conn, recipe_id)
    }

    fn list_recipes(&self) -> RepoResult<Vec<Recipe>> {
        let mut stmt = self.conn.prepare(
            "SELECT recipe_uuid
             FROM recipes
             ORDER BY title COLLATE NOCASE ASC, created_at ASC, recipe_uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "recipes.recipe_uuid")?);
        }

        let mut recipes = Vec::with_capacity(ids.len());
        for recipe_id in ids {
            if let Some(recipe) = load_recipe(self.conn, recipe_id)? {
                recipes.push(recipe);
            }
        }
        Ok(recipes)
    }

    fn delete_recipe(&self, recipe_id: RecipeId) -> RepoResult<()> {
        let tx = begin_write(self.conn)?;
        for table in ["recipe_ingredients", "recipe_photos"] {
            tx.execute(
                &format!("DELETE FROM {table} WHERE recipe_uuid = ?1;"),
                [recipe_id.to_string()],
            )?;
        }
        let changed = tx.execute(
            "DELETE FROM recipes WHERE recipe_uuid = ?1;",
            [recipe_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(Entity::Recipe, recipe_id));
        }
        tx.commit()?;
        Ok(())
    }

    fn add_photo(&self, recipe_id: RecipeId, photo: &NewRecipePhoto) -> RepoResult<RecipePhoto> {
        photo.validate()?;

        let tx = begin_write(self.conn)?;
        if !recipe_exists(&tx, recipe_id)? {
            return Err(RepoError::not_found(Entity::Recipe, recipe_id));
        }

        let (count, next_order): (i64, i64) = tx.query_row(
            "SELECT COUNT(*), COALESCE(MAX(upload_order), -1) + 1
             FROM recipe_photos
             WHERE recipe_uuid = ?1;",
            [recipe_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        if count as usize >= MAX_PHOTOS_PER_RECIPE {
            return Err(ValidationError::PhotoLimitReached {
                limit: MAX_PHOTOS_PER_RECIPE,
            }
            .into());
        }

        let photo_id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO recipe_photos (
                photo_uuid,
                recipe_uuid,
                file_name,
                original_name,
                mime_type,
                file_size,
                upload_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                photo_id.to_string(),
                recipe_id.to_string(),
                photo.file_name.trim(),
                photo.original_name,
                photo.mime_type.trim().to_ascii_lowercase(),
                photo.file_size,
                next_order,
            ],
        )?;
        tx.commit()?;

        Ok(RecipePhoto {
            id: photo_id,
            recipe_id,
            file_name: photo.file_name.trim().to_string(),
            original_name: photo.original_name.clone(),
            mime_type: photo.mime_type.trim().to_ascii_lowercase(),
            file_size: photo.file_size,
            upload_order: next_order,
        })
    }

    fn list_photos(&self, recipe_id: RecipeId) -> RepoResult<Vec<RecipePhoto>> {
        load_photos(self.conn, recipe_id)
    }

    fn delete_photo(&self, photo_id: PhotoId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM recipe_photos WHERE photo_uuid = ?1;",
            [photo_id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

fn write_ingredients(conn: &Connection, recipe_id: RecipeId, lines: &[String]) -> RepoResult<()> {
    let mut insert = conn.prepare_cached(
        "INSERT INTO recipe_ingredients (recipe_uuid, line_index, line) VALUES (?1, ?2, ?3);",
    )?;
    for (index, line) in lines.iter().enumerate() {
        insert.execute(params![recipe_id.to_string(), index as i64, line])?;
    }
    Ok(())
}

fn recipe_exists(conn: &Connection, recipe_id: RecipeId) -> RepoResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM recipes WHERE recipe_uuid = ?1;",
            [recipe_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn load_recipe(conn: &Connection, recipe_id: RecipeId) -> RepoResult<Option<Recipe>> {
    let header: Option<(String, String, i64)> = conn
        .query_row(
            "SELECT title, instructions, created_at
             FROM recipes
             WHERE recipe_uuid = ?1;",
            [recipe_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((title, instructions, created_at)) = header else {
        return Ok(None);
    };

    Ok(Some(Recipe {
        id: recipe_id,
        title,
        ingredients: load_ingredients(conn, recipe_id)?,
        instructions,
        photos: load_photos(conn, recipe_id)?,
        created_at,
    }))
}

fn load_ingredients(conn: &Connection, recipe_id: RecipeId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT line
         FROM recipe_ingredients
         WHERE recipe_uuid = ?1
         ORDER BY line_index ASC;",
    )?;
    let mut rows = stmt.query([recipe_id.to_string()])?;
    let mut lines = Vec::new();
    while let Some(row) = rows.next()? {
        lines.push(row.get(0)?);
    }
    Ok(lines)
}

fn load_photos(conn: &Connection, recipe_id: RecipeId) -> RepoResult<Vec<RecipePhoto>> {
    let mut stmt = conn.prepare_cached(&format!(
        "{PHOTO_SELECT_SQL}
         WHERE recipe_uuid = ?1
         ORDER BY upload_order ASC, photo_uuid ASC;"
    ))?;
    let mut rows = stmt.query([recipe_id.to_string()])?;
    let mut photos = Vec::new();
    while let Some(row) = rows.next()? {
        photos.push(parse_photo_row(row)?);
    }
    Ok(photos)
}

fn parse_photo_row(row: &Row<'_>) -> RepoResult<RecipePhoto> {
    let photo_text: String = row.get("photo_uuid")?;
    let recipe_text: String = row.get("recipe_uuid")?;
    Ok(RecipePhoto {
        id: parse_uuid(&photo_text, "recipe_photos.photo_uuid")?,
        recipe_id: parse_uuid(&recipe_text, "recipe_photos.recipe_uuid")?,
        file_name: row.get("file_name")?,
        original_name: row.get("original_name")?,
        mime_type: row.get("mime_type")?,
        file_size: row.get("file_size")?,
        upload_order: row.get("upload_order")?,
    })
}
