use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};
use crate::domain::types::{CategoryId, CategoryLevel, CategoryName, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub level: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub level: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full-row changeset applied on update.
///
/// The repository resolves the final value of every mutable column before
/// writing, so absent values are written as NULL rather than skipped.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(treat_none_as_null = true)]
pub struct CategoryChangeset {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub level: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl NewCategory {
    /// Builds the insertable row from domain data and the resolved level.
    pub fn from_domain(category: &DomainNewCategory, level: CategoryLevel, now: NaiveDateTime) -> Self {
        Self {
            name: category.name.as_str().to_string(),
            description: category.description.clone(),
            parent_id: category.parent_id.map(CategoryId::get),
            level: level.get(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            description: category.description,
            parent_id: category.parent_id.map(CategoryId::new).transpose()?,
            level: CategoryLevel::new(category.level)?,
            is_active: category.is_active,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}
