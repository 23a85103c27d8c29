use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::category::{
    Category, CategoryParent, CategoryPatch, CategoryWithProductCount, NewCategory,
};
use crate::domain::tree::{build_category_tree, CategoryTree};
use crate::domain::types::{CategoryId, CategoryLevel, ProductCount};
use crate::models::category::{
    Category as DbCategory, CategoryChangeset, NewCategory as DbNewCategory,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

/// Level a category would occupy under the given parent.
///
/// Fails with [`RepositoryError::NotFound`] when the parent does not exist
/// and with [`RepositoryError::DepthExceeded`] when the parent already sits
/// at the deepest level.
fn resolve_level(
    conn: &mut SqliteConnection,
    parent_id: Option<CategoryId>,
) -> RepositoryResult<CategoryLevel> {
    use crate::schema::categories;

    let Some(parent_id) = parent_id else {
        return Ok(CategoryLevel::ROOT);
    };

    let parent_level = categories::table
        .filter(categories::id.eq(parent_id.get()))
        .select(categories::level)
        .first::<i32>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    CategoryLevel::new(parent_level)?
        .child()
        .ok_or(RepositoryError::DepthExceeded)
}

/// All `(id, level)` pairs in the subtree rooted at `root`, excluding `root`
/// itself. The walk is breadth-first and terminates because `parent_id` edges
/// never form cycles.
fn descendants_of(
    conn: &mut SqliteConnection,
    root: CategoryId,
) -> RepositoryResult<Vec<(i32, i32)>> {
    use crate::schema::categories;

    let mut collected = Vec::new();
    let mut frontier = vec![root.get()];

    while !frontier.is_empty() {
        let parents: Vec<Option<i32>> = frontier.iter().map(|id| Some(*id)).collect();
        let rows: Vec<(i32, i32)> = categories::table
            .filter(categories::parent_id.eq_any(parents))
            .select((categories::id, categories::level))
            .load(conn)?;

        frontier = rows.iter().map(|(id, _)| *id).collect();
        collected.extend(rows);
    }

    Ok(collected)
}

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn list_active_categories(&self) -> RepositoryResult<Vec<CategoryWithProductCount>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let rows = categories::table
            .filter(categories::is_active.eq(true))
            .order((categories::level.asc(), categories::name.asc()))
            .load::<DbCategory>(&mut conn)?;

        let counts: HashMap<i32, i64> = products::table
            .filter(products::is_active.eq(true))
            .group_by(products::category_id)
            .select((products::category_id, diesel::dsl::count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| {
                let product_count =
                    ProductCount::new(counts.get(&row.id).copied().unwrap_or(0) as i32)?;
                Ok(CategoryWithProductCount {
                    category: row.try_into()?,
                    product_count,
                })
            })
            .collect()
    }

    fn category_tree(&self) -> RepositoryResult<Vec<CategoryTree>> {
        let flat = self.list_active_categories()?;
        Ok(build_category_tree(flat))
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let created: DbCategory = conn.transaction(|conn| {
            let level = resolve_level(conn, category.parent_id)?;
            let now = Utc::now().naive_utc();

            let row = diesel::insert_into(categories::table)
                .values(DbNewCategory::from_domain(category, level, now))
                .get_result(conn)?;

            Ok::<_, RepositoryError>(row)
        })?;

        Ok(created.try_into()?)
    }

    fn update_category(&self, id: CategoryId, patch: &CategoryPatch) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let updated: DbCategory = conn.transaction(|conn| {
            let existing = categories::table
                .filter(categories::id.eq(id.get()))
                .first::<DbCategory>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let mut parent_id = existing.parent_id;
            let mut level = existing.level;

            if let Some(parent) = patch.parent {
                let new_parent = match parent {
                    CategoryParent::Root => None,
                    CategoryParent::Node(parent_id) => Some(parent_id),
                };

                let descendants = descendants_of(conn, id)?;
                if let Some(new_parent) = new_parent {
                    let in_subtree = new_parent.get() == id.get()
                        || descendants.iter().any(|(desc, _)| *desc == new_parent.get());
                    if in_subtree {
                        return Err(RepositoryError::ParentCycle);
                    }
                }

                let new_level = resolve_level(conn, new_parent)?;

                // Moving a node shifts its whole subtree; every descendant
                // must stay within the depth bound as well.
                let shift = new_level.get() - existing.level;
                if shift != 0 {
                    if descendants
                        .iter()
                        .any(|(_, desc_level)| desc_level + shift > CategoryLevel::MAX)
                    {
                        return Err(RepositoryError::DepthExceeded);
                    }
                    for (desc_id, desc_level) in descendants {
                        diesel::update(categories::table.filter(categories::id.eq(desc_id)))
                            .set(categories::level.eq(desc_level + shift))
                            .execute(conn)?;
                    }
                }

                parent_id = new_parent.map(CategoryId::get);
                level = new_level.get();
            }

            let changeset = CategoryChangeset {
                name: patch
                    .name
                    .clone()
                    .map(Into::into)
                    .unwrap_or(existing.name),
                description: match &patch.description {
                    Some(description) => description.clone(),
                    None => existing.description,
                },
                parent_id,
                level,
                is_active: patch.is_active.unwrap_or(existing.is_active),
                updated_at: Utc::now().naive_utc(),
            };

            let row = diesel::update(categories::table.filter(categories::id.eq(id.get())))
                .set(changeset)
                .get_result(conn)?;

            Ok::<_, RepositoryError>(row)
        })?;

        Ok(updated.try_into()?)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let child = categories::table
                .filter(categories::parent_id.eq(Some(id.get())))
                .select(categories::id)
                .first::<i32>(conn)
                .optional()?;
            if child.is_some() {
                log::debug!("delete of category {id} blocked by child categories");
                return Err(RepositoryError::HasChildren);
            }

            let product = products::table
                .filter(products::category_id.eq(id.get()))
                .select(products::id)
                .first::<i32>(conn)
                .optional()?;
            if product.is_some() {
                log::debug!("delete of category {id} blocked by attached products");
                return Err(RepositoryError::HasProducts);
            }

            let affected = diesel::delete(categories::table.filter(categories::id.eq(id.get())))
                .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}
