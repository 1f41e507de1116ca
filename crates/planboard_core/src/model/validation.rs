//! Field validation shared by all write paths.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before any storage write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyListName,
    EmptyTaskText,
    EmptyRecipeTitle,
    EmptyMealText,
    EmptyPhotoFileName,
    EmptyIngredientLine { index: usize },
    /// Selected ingredient index does not exist in the line sequence.
    SelectionOutOfRange { index: usize, len: usize },
    UnsupportedPhotoType(String),
    PhotoLimitReached { limit: usize },
    NegativePhotoSize(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyListName => write!(f, "list name must not be blank"),
            Self::EmptyTaskText => write!(f, "task text must not be blank"),
            Self::EmptyRecipeTitle => write!(f, "recipe title must not be blank"),
            Self::EmptyMealText => write!(f, "meal text must not be blank"),
            Self::EmptyPhotoFileName => write!(f, "photo file name must not be blank"),
            Self::EmptyIngredientLine { index } => {
                write!(f, "ingredient line {index} must not be blank")
            }
            Self::SelectionOutOfRange { index, len } => write!(
                f,
                "selected line {index} is out of range for {len} ingredient lines"
            ),
            Self::UnsupportedPhotoType(mime) => write!(f, "unsupported photo type `{mime}`"),
            Self::PhotoLimitReached { limit } => {
                write!(f, "recipe already has the maximum of {limit} photos")
            }
            Self::NegativePhotoSize(size) => write!(f, "photo size must not be negative: {size}"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it with `error` when nothing remains.
pub fn require_text(value: &str, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}
