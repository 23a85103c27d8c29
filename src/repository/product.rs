use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::{
    GroupedProducts, NewProduct, Product, ProductPatch, ProductWithCategory,
};
use crate::domain::types::{CategoryId, CategoryLevel, CategoryName, ProductCount, ProductId};
use crate::models::product::{Product as DbProduct, NewProduct as DbNewProduct, ProductChangeset};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CategoryReader, DieselRepository, ProductReader, ProductWriter};

/// Fails with [`RepositoryError::NotFound`] unless the category exists.
///
/// Activity status is deliberately not checked: an inactive category still
/// accepts product bindings, it is only hidden from listings.
fn require_category(conn: &mut SqliteConnection, id: CategoryId) -> RepositoryResult<()> {
    use crate::schema::categories;

    categories::table
        .filter(categories::id.eq(id.get()))
        .select(categories::id)
        .first::<i32>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    Ok(())
}

fn to_product_with_category(
    (product, category_name, category_level): (DbProduct, String, i32),
) -> RepositoryResult<ProductWithCategory> {
    Ok(ProductWithCategory {
        product: product.try_into()?,
        category_name: CategoryName::new(category_name)?,
        category_level: CategoryLevel::new(category_level)?,
    })
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }

    fn list_active_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> RepositoryResult<Vec<ProductWithCategory>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        products::table
            .inner_join(categories::table)
            .filter(products::category_id.eq(category_id.get()))
            .filter(products::is_active.eq(true))
            .filter(categories::is_active.eq(true))
            .order(products::name.asc())
            .select((products::all_columns, categories::name, categories::level))
            .load::<(DbProduct, String, i32)>(&mut conn)?
            .into_iter()
            .map(to_product_with_category)
            .collect()
    }

    fn list_products_grouped_by_categories(&self) -> RepositoryResult<GroupedProducts> {
        use crate::schema::{categories, products};

        let categories_with_counts = self.list_active_categories()?;

        let mut conn = self.conn()?;

        let products = products::table
            .inner_join(categories::table)
            .filter(products::is_active.eq(true))
            .filter(categories::is_active.eq(true))
            .order((
                categories::level.asc(),
                categories::name.asc(),
                products::name.asc(),
            ))
            .select((products::all_columns, categories::name, categories::level))
            .load::<(DbProduct, String, i32)>(&mut conn)?
            .into_iter()
            .map(to_product_with_category)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(GroupedProducts {
            categories: categories_with_counts,
            products,
        })
    }

    fn product_count_by_category(&self, category_id: CategoryId) -> RepositoryResult<ProductCount> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let count: i64 = products::table
            .filter(products::category_id.eq(category_id.get()))
            .filter(products::is_active.eq(true))
            .count()
            .get_result(&mut conn)?;

        Ok(ProductCount::new(count as i32)?)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let created: DbProduct = conn.transaction(|conn| {
            require_category(conn, product.category_id)?;
            let now = Utc::now().naive_utc();

            let row = diesel::insert_into(products::table)
                .values(DbNewProduct::from_domain(product, now))
                .get_result(conn)?;

            Ok::<_, RepositoryError>(row)
        })?;

        Ok(created.try_into()?)
    }

    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let updated: DbProduct = conn.transaction(|conn| {
            let existing = products::table
                .filter(products::id.eq(id.get()))
                .first::<DbProduct>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            if let Some(category_id) = patch.category_id {
                require_category(conn, category_id)?;
            }

            let changeset = ProductChangeset {
                name: patch
                    .name
                    .clone()
                    .map(Into::into)
                    .unwrap_or(existing.name),
                description: match &patch.description {
                    Some(description) => description.clone(),
                    None => existing.description,
                },
                price: patch.price.map(f64::from).unwrap_or(existing.price),
                category_id: patch
                    .category_id
                    .map(CategoryId::get)
                    .unwrap_or(existing.category_id),
                is_active: patch.is_active.unwrap_or(existing.is_active),
                updated_at: Utc::now().naive_utc(),
            };

            let row = diesel::update(products::table.filter(products::id.eq(id.get())))
                .set(changeset)
                .get_result(conn)?;

            Ok::<_, RepositoryError>(row)
        })?;

        Ok(updated.try_into()?)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(products::table.filter(products::id.eq(id.get()))).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
