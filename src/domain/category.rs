use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryLevel, CategoryName, ProductCount};

/// Canonical category record.
///
/// Categories form a forest via `parent_id`; `level` is derived from the
/// parent chain and never supplied by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub level: CategoryLevel,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
///
/// `level`, `is_active` and timestamps are assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
}

/// Target parent of a re-parented category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryParent {
    /// Detach from any parent, making the category a root.
    Root,
    /// Attach under the given existing category.
    Node(CategoryId),
}

/// Partial update for a [`Category`].
///
/// `None` leaves a field untouched. `description` uses a nested option so
/// callers can distinguish "leave as is" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<CategoryName>,
    pub description: Option<Option<String>>,
    pub parent: Option<CategoryParent>,
    pub is_active: Option<bool>,
}

/// A category annotated with the number of its active products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithProductCount {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: ProductCount,
}
