use thiserror::Error;

use crate::domain::types::{CategoryLevel, TypeConstraintError};

/// Errors surfaced by repository operations.
///
/// Guard violations (`DepthExceeded`, `HasChildren`, `HasProducts`,
/// `ParentCycle`) and `NotFound` are terminal for the operation that raised
/// them and are never coerced into defaults; callers map them to their own
/// failure surface.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A referenced category or product does not exist.
    #[error("not found")]
    NotFound,
    /// The mutation would place a category beyond the maximum tree depth.
    #[error("maximum nesting level is {}", CategoryLevel::MAX)]
    DepthExceeded,
    /// A category cannot be deleted while child categories reference it.
    #[error("cannot delete category with children")]
    HasChildren,
    /// A category cannot be deleted while products reference it.
    #[error("cannot delete category with products")]
    HasProducts,
    /// A category cannot be re-parented under itself or one of its descendants.
    #[error("cannot move category under its own subtree")]
    ParentCycle,
    /// A stored value violated a domain type constraint.
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    DatabaseError(#[from] diesel::result::Error),
    #[error(transparent)]
    PoolError(#[from] diesel::r2d2::PoolError),
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(value: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(value.to_string())
    }
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
