//! Meal plan entry record.
//!
//! # Invariants
//! - `recipe_id` is a weak reference: it is kept when the display text is
//!   edited and may outlive the recipe it names.
//! - `display_text` is a snapshot and never follows later recipe renames.

use crate::model::recipe::RecipeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a meal plan entry.
pub type MealEntryId = Uuid;

/// Calendar-dated note, free text or referencing a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanEntry {
    pub id: MealEntryId,
    pub date: NaiveDate,
    pub display_text: String,
    /// Stored reference, present even when the recipe no longer exists.
    pub recipe_id: Option<RecipeId>,
    /// Whether `recipe_id` resolved to an existing recipe at read time.
    pub recipe_resolved: bool,
    /// Creation sequence; orders entries sharing a date.
    pub created_order: i64,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl MealPlanEntry {
    /// Recipe this entry links to, or `None` for free-form and dangling
    /// entries.
    pub fn linked_recipe(&self) -> Option<RecipeId> {
        self.recipe_id.filter(|_| self.recipe_resolved)
    }

    pub fn is_free_form(&self) -> bool {
        self.linked_recipe().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::MealPlanEntry;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn entry(recipe_id: Option<Uuid>, resolved: bool) -> MealPlanEntry {
        MealPlanEntry {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            display_text: "Soup".to_string(),
            recipe_id,
            recipe_resolved: resolved,
            created_order: 0,
            created_at: 0,
        }
    }

    #[test]
    fn dangling_reference_reads_as_free_form() {
        let recipe_id = Uuid::new_v4();
        let dangling = entry(Some(recipe_id), false);
        assert_eq!(dangling.recipe_id, Some(recipe_id));
        assert!(dangling.linked_recipe().is_none());
        assert!(dangling.is_free_form());
    }

    #[test]
    fn resolved_reference_is_linked() {
        let recipe_id = Uuid::new_v4();
        assert_eq!(entry(Some(recipe_id), true).linked_recipe(), Some(recipe_id));
        assert!(entry(None, false).is_free_form());
    }
}
