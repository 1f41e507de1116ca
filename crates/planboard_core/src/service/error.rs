//! Service error shared by list, recipe, merge and meal plan use-cases.

use crate::calendar::CalendarError;
use crate::model::validation::ValidationError;
use crate::repo::error::{Entity, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse error class exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced record does not exist; not worth retrying.
    NotFound,
    /// Input rejected before any storage write.
    ValidationFailure,
    /// Transaction did not commit; nothing was changed, retry is safe.
    StorageFailure,
}

/// Errors from use-case service operations.
#[derive(Debug)]
pub enum ServiceError {
    NotFound { entity: Entity, id: Uuid },
    Validation(ValidationError),
    Calendar(CalendarError),
    /// Repository-level failure other than not-found/validation.
    Storage(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) | Self::Calendar(_) => ErrorKind::ValidationFailure,
            Self::Storage(_) => ErrorKind::StorageFailure,
        }
    }

    pub(crate) fn not_found(entity: Entity, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Validation(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CalendarError> for ServiceError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

/// Outcome of an idempotent delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    /// Nothing matched; a retried delete lands here.
    AlreadyAbsent,
}

impl DeleteOutcome {
    pub(crate) fn from_removed(removed: bool) -> Self {
        if removed {
            Self::Removed
        } else {
            Self::AlreadyAbsent
        }
    }
}
