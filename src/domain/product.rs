use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryWithProductCount;
use crate::domain::types::{
    CategoryId, CategoryLevel, CategoryName, ProductId, ProductName, ProductPrice,
};

/// Canonical product record, always attached to a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: Option<String>,
    pub price: ProductPrice,
    pub category_id: CategoryId,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Option<String>,
    pub price: ProductPrice,
    pub category_id: CategoryId,
}

/// Partial update for a [`Product`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<ProductName>,
    pub description: Option<Option<String>>,
    pub price: Option<ProductPrice>,
    pub category_id: Option<CategoryId>,
    pub is_active: Option<bool>,
}

/// A product annotated with the name and level of its category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: CategoryName,
    pub category_level: CategoryLevel,
}

/// Composite read-only view of the active catalog.
///
/// Both lists reflect the same store snapshot: categories ordered by
/// `(level, name)`, products by `(category level, category name, name)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedProducts {
    pub categories: Vec<CategoryWithProductCount>,
    pub products: Vec<ProductWithCategory>,
}
