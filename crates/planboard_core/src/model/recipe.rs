//! Recipe records and ingredient helpers.
//!
//! # Invariants
//! - Ingredient lines keep the order and text they were saved with.
//! - Photos are ordered by `upload_order` and owned by their recipe.

use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a recipe.
pub type RecipeId = Uuid;
/// Stable identifier of a recipe photo reference.
pub type PhotoId = Uuid;

/// Maximum number of photos attached to one recipe.
pub const MAX_PHOTOS_PER_RECIPE: usize = 10;

const SUPPORTED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Titled set of ordered ingredient lines and instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    /// Opaque lines in display order. This is the order offered for merge.
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub photos: Vec<RecipePhoto>,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Recipe {
    /// Every ingredient index, in order.
    ///
    /// This is the "all selected" default offered to callers of the merge.
    pub fn all_ingredient_indices(&self) -> Vec<usize> {
        (0..self.ingredients.len()).collect()
    }
}

/// Reference to a photo file stored outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePhoto {
    pub id: PhotoId,
    pub recipe_id: RecipeId,
    /// Name of the stored file, owned by the photo store.
    pub file_name: String,
    /// Name the file was uploaded with.
    pub original_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub upload_order: i64,
}

/// Input for recipe create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

impl RecipeDraft {
    pub fn new(
        title: impl Into<String>,
        ingredients: Vec<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            ingredients,
            instructions: instructions.into(),
        }
    }

    /// Returns a copy with the title trimmed.
    ///
    /// Ingredient lines are kept verbatim but must not be blank, so every
    /// line can become a task.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if let Some(index) = self.ingredients.iter().position(|line| line.trim().is_empty()) {
            return Err(ValidationError::EmptyIngredientLine { index });
        }
        Ok(Self {
            title: require_text(&self.title, ValidationError::EmptyRecipeTitle)?,
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
        })
    }
}

/// Input for attaching a photo reference to a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipePhoto {
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub file_size: i64,
}

impl NewRecipePhoto {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.file_name.trim().is_empty() {
            return Err(ValidationError::EmptyPhotoFileName);
        }
        if !is_supported_photo_type(&self.mime_type) {
            return Err(ValidationError::UnsupportedPhotoType(self.mime_type.clone()));
        }
        if self.file_size < 0 {
            return Err(ValidationError::NegativePhotoSize(self.file_size));
        }
        Ok(())
    }
}

/// Returns whether `mime_type` is an accepted photo type.
pub fn is_supported_photo_type(mime_type: &str) -> bool {
    SUPPORTED_PHOTO_TYPES.contains(&mime_type.trim().to_ascii_lowercase().as_str())
}

/// Splits a free-text ingredient block into lines.
///
/// Lines are trimmed and blank lines dropped; this is the textarea shape the
/// recipe form submits.
pub fn parse_ingredient_block(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{is_supported_photo_type, parse_ingredient_block, NewRecipePhoto, RecipeDraft};
    use crate::model::validation::ValidationError;

    #[test]
    fn ingredient_block_drops_blank_lines_and_keeps_order() {
        let lines = parse_ingredient_block("2 eggs\r\n\n  200g flour  \n\t\nmilk");
        assert_eq!(lines, vec!["2 eggs", "200g flour", "milk"]);
    }

    #[test]
    fn draft_normalization_trims_title_only() {
        let draft = RecipeDraft::new("  Pancakes ", vec![" 2 eggs ".to_string()], "mix");
        let normalized = draft.normalized().unwrap();
        assert_eq!(normalized.title, "Pancakes");
        assert_eq!(normalized.ingredients, vec![" 2 eggs ".to_string()]);
    }

    #[test]
    fn draft_with_blank_title_is_rejected() {
        let draft = RecipeDraft::new("   ", Vec::new(), "");
        assert_eq!(
            draft.normalized().unwrap_err(),
            ValidationError::EmptyRecipeTitle
        );
    }

    #[test]
    fn draft_with_blank_ingredient_line_is_rejected() {
        let draft = RecipeDraft::new("Soup", vec!["water".to_string(), " ".to_string()], "");
        assert_eq!(
            draft.normalized().unwrap_err(),
            ValidationError::EmptyIngredientLine { index: 1 }
        );
    }

    #[test]
    fn photo_types_match_case_insensitively() {
        assert!(is_supported_photo_type("image/PNG"));
        assert!(is_supported_photo_type("image/webp"));
        assert!(!is_supported_photo_type("image/gif"));
    }

    #[test]
    fn photo_validation_rejects_unsupported_type() {
        let photo = NewRecipePhoto {
            file_name: "a.gif".to_string(),
            original_name: "a.gif".to_string(),
            mime_type: "image/gif".to_string(),
            file_size: 10,
        };
        assert!(matches!(
            photo.validate(),
            Err(ValidationError::UnsupportedPhotoType(mime)) if mime == "image/gif"
        ));
    }
}
