use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;

use crate::domain::category::{Category, CategoryPatch, CategoryWithProductCount, NewCategory};
use crate::domain::product::{GroupedProducts, NewProduct, Product, ProductPatch, ProductWithCategory};
use crate::domain::tree::CategoryTree;
use crate::domain::types::{CategoryId, ProductCount, ProductId};

pub mod category;
pub mod errors;
pub mod product;

pub use errors::{RepositoryError, RepositoryResult};

/// Pooled SQLite connection handle.
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;
/// Shared SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Builds an r2d2 pool for the given SQLite database path or URL.
pub fn establish_connection_pool(database_url: &str) -> RepositoryResult<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().build(manager)?;
    log::info!("established connection pool for {database_url}");
    Ok(pool)
}

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between callers. Each multi-step guarded operation
/// runs in a single transaction so its existence checks and the acted-upon
/// write are atomic.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// Retrieve a category by its identifier, regardless of activity status.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// List active categories ordered by `(level, name)`, each annotated with
    /// the count of its active products.
    fn list_active_categories(&self) -> RepositoryResult<Vec<CategoryWithProductCount>>;
    /// Assemble the active categories into a nested forest.
    fn category_tree(&self) -> RepositoryResult<Vec<CategoryTree>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category, deriving its level from the parent.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Apply a partial update, recomputing levels on re-parenting.
    fn update_category(&self, id: CategoryId, patch: &CategoryPatch) -> RepositoryResult<Category>;
    /// Delete a category that has neither child categories nor products.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// Retrieve a product by its identifier, regardless of activity status.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// List active products of an active category, ordered by product name.
    fn list_active_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> RepositoryResult<Vec<ProductWithCategory>>;
    /// Composite view of active categories and their active products.
    fn list_products_grouped_by_categories(&self) -> RepositoryResult<GroupedProducts>;
    /// Count of active products attached to the given category.
    fn product_count_by_category(&self, category_id: CategoryId) -> RepositoryResult<ProductCount>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product after validating its category reference.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Apply a partial update, re-validating the category on re-binding.
    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> RepositoryResult<Product>;
    /// Delete a product unconditionally.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<()>;
}
