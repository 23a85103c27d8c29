use catalog::domain::category::{CategoryParent, CategoryPatch, NewCategory};
use catalog::domain::product::{NewProduct, ProductPatch};
use catalog::domain::types::{CategoryId, CategoryName, ProductId, ProductName, ProductPrice};
use catalog::repository::{
    CategoryReader, CategoryWriter, DieselRepository, ProductReader, ProductWriter,
    RepositoryError,
};

mod common;

fn new_category(name: &str, parent_id: Option<CategoryId>) -> NewCategory {
    NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
        description: None,
        parent_id,
    }
}

fn new_product(name: &str, price: f64, category_id: CategoryId) -> NewProduct {
    NewProduct {
        name: ProductName::new(name).expect("valid product name"),
        description: None,
        price: ProductPrice::new(price).expect("valid price"),
        category_id,
    }
}

#[test]
fn root_category_starts_at_level_zero() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo
        .create_category(&new_category("Electronics", None))
        .expect("should create root category");

    assert_eq!(category.level.get(), 0);
    assert!(category.parent_id.is_none());
    assert!(category.is_active);
    assert_eq!(category.created_at, category.updated_at);
}

#[test]
fn child_level_is_parent_level_plus_one() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let parent = repo
        .create_category(&new_category("Electronics", None))
        .unwrap();
    let child = repo
        .create_category(&new_category("Phones", Some(parent.id)))
        .unwrap();

    assert_eq!(child.level.get(), parent.level.get() + 1);
    assert_eq!(child.parent_id, Some(parent.id));
}

#[test]
fn depth_is_bounded_to_four_levels() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let mut parent_id = None;
    for expected_level in 0..=3 {
        let category = repo
            .create_category(&new_category(&format!("level {expected_level}"), parent_id))
            .expect("levels 0 through 3 are allowed");
        assert_eq!(category.level.get(), expected_level);
        parent_id = Some(category.id);
    }

    let err = repo
        .create_category(&new_category("level 4", parent_id))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::DepthExceeded));
}

#[test]
fn create_category_rejects_missing_parent() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let missing = CategoryId::new(999).unwrap();
    let err = repo
        .create_category(&new_category("Orphan", Some(missing)))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn update_category_applies_fields_and_refreshes_updated_at() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_category(&new_category("Electronics", None))
        .unwrap();

    let patch = CategoryPatch {
        name: Some(CategoryName::new("Gadgets").unwrap()),
        description: Some(Some("Portable devices".to_string())),
        ..Default::default()
    };
    let updated = repo.update_category(created.id, &patch).unwrap();

    assert_eq!(updated.name, "Gadgets");
    assert_eq!(updated.description.as_deref(), Some("Portable devices"));
    assert_eq!(updated.level, created.level);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn update_category_fails_for_missing_id() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let err = repo
        .update_category(CategoryId::new(42).unwrap(), &CategoryPatch::default())
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn reparenting_recomputes_levels_for_the_whole_subtree() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let a = repo.create_category(&new_category("a", None)).unwrap();
    let b = repo
        .create_category(&new_category("b", Some(a.id)))
        .unwrap();
    let c = repo
        .create_category(&new_category("c", Some(b.id)))
        .unwrap();

    let patch = CategoryPatch {
        parent: Some(CategoryParent::Root),
        ..Default::default()
    };
    let moved = repo.update_category(b.id, &patch).unwrap();
    assert_eq!(moved.level.get(), 0);
    assert!(moved.parent_id.is_none());

    let descendant = repo.get_category_by_id(c.id).unwrap().unwrap();
    assert_eq!(descendant.level.get(), 1);
    assert_eq!(descendant.parent_id, Some(b.id));
}

#[test]
fn reparenting_rejects_moves_that_push_descendants_too_deep() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    // Subtree b -> c under root a, plus a separate chain d -> e -> f.
    let a = repo.create_category(&new_category("a", None)).unwrap();
    let b = repo
        .create_category(&new_category("b", Some(a.id)))
        .unwrap();
    let c = repo
        .create_category(&new_category("c", Some(b.id)))
        .unwrap();
    let d = repo.create_category(&new_category("d", None)).unwrap();
    let e = repo
        .create_category(&new_category("e", Some(d.id)))
        .unwrap();
    let f = repo
        .create_category(&new_category("f", Some(e.id)))
        .unwrap();

    // b itself would land on level 3, but c would land on level 4.
    let patch = CategoryPatch {
        parent: Some(CategoryParent::Node(f.id)),
        ..Default::default()
    };
    let err = repo.update_category(b.id, &patch).unwrap_err();
    assert!(matches!(err, RepositoryError::DepthExceeded));

    // The rejected move must not leave partial level updates behind.
    let unchanged = repo.get_category_by_id(c.id).unwrap().unwrap();
    assert_eq!(unchanged.level.get(), 2);
}

#[test]
fn reparenting_rejects_own_subtree() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let a = repo.create_category(&new_category("a", None)).unwrap();
    let b = repo
        .create_category(&new_category("b", Some(a.id)))
        .unwrap();

    let under_self = CategoryPatch {
        parent: Some(CategoryParent::Node(a.id)),
        ..Default::default()
    };
    let err = repo.update_category(a.id, &under_self).unwrap_err();
    assert!(matches!(err, RepositoryError::ParentCycle));

    let under_descendant = CategoryPatch {
        parent: Some(CategoryParent::Node(b.id)),
        ..Default::default()
    };
    let err = repo.update_category(a.id, &under_descendant).unwrap_err();
    assert!(matches!(err, RepositoryError::ParentCycle));
}

#[test]
fn delete_category_is_guarded_by_children_then_products() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let parent = repo.create_category(&new_category("parent", None)).unwrap();
    let child = repo
        .create_category(&new_category("child", Some(parent.id)))
        .unwrap();

    let err = repo.delete_category(parent.id).unwrap_err();
    assert!(matches!(err, RepositoryError::HasChildren));

    repo.delete_category(child.id).unwrap();

    let product = repo
        .create_product(&new_product("widget", 9.99, parent.id))
        .unwrap();
    let err = repo.delete_category(parent.id).unwrap_err();
    assert!(matches!(err, RepositoryError::HasProducts));

    repo.delete_product(product.id).unwrap();
    repo.delete_category(parent.id).unwrap();
    assert!(repo.get_category_by_id(parent.id).unwrap().is_none());
}

#[test]
fn delete_category_fails_for_missing_id() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let err = repo.delete_category(CategoryId::new(7).unwrap()).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn get_category_by_id_is_idempotent_and_ignores_activity() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_category(&new_category("Electronics", None))
        .unwrap();
    let deactivated = repo
        .update_category(
            created.id,
            &CategoryPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!deactivated.is_active);

    let first = repo.get_category_by_id(created.id).unwrap().unwrap();
    let second = repo.get_category_by_id(created.id).unwrap().unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.name, second.name);
    assert_eq!(first.level, second.level);
    assert_eq!(first.is_active, second.is_active);
    assert_eq!(first.updated_at, second.updated_at);
}

#[test]
fn active_categories_are_ordered_and_carry_live_counts() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let beta = repo.create_category(&new_category("beta", None)).unwrap();
    let alpha = repo.create_category(&new_category("alpha", None)).unwrap();
    let nested = repo
        .create_category(&new_category("aardvark", Some(beta.id)))
        .unwrap();
    let hidden = repo.create_category(&new_category("hidden", None)).unwrap();
    repo.update_category(
        hidden.id,
        &CategoryPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    repo.create_product(&new_product("p1", 1.0, beta.id)).unwrap();
    repo.create_product(&new_product("p2", 2.0, beta.id)).unwrap();
    let inactive = repo.create_product(&new_product("p3", 3.0, beta.id)).unwrap();
    repo.update_product(
        inactive.id,
        &ProductPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    let listed = repo.list_active_categories().unwrap();

    // Shallow before deep, lexicographic within a level; inactive excluded.
    let names: Vec<&str> = listed
        .iter()
        .map(|entry| entry.category.name.as_str())
        .collect();
    assert_eq!(names, vec!["alpha", "beta", "aardvark"]);

    let by_id = |id: CategoryId| {
        listed
            .iter()
            .find(|entry| entry.category.id == id)
            .map(|entry| entry.product_count.get())
            .unwrap()
    };
    assert_eq!(by_id(beta.id), 2);
    assert_eq!(by_id(alpha.id), 0);
    assert_eq!(by_id(nested.id), 0);
}

#[test]
fn category_tree_nests_active_categories() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let root = repo.create_category(&new_category("root", None)).unwrap();
    let child = repo
        .create_category(&new_category("child", Some(root.id)))
        .unwrap();
    repo.create_product(&new_product("p1", 5.0, root.id)).unwrap();

    let tree = repo.category_tree().unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].category.id, root.id);
    assert_eq!(tree[0].product_count.get(), 1);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].category.id, child.id);
    assert!(tree[0].children[0].children.is_empty());
}

#[test]
fn children_of_deactivated_parents_disappear_from_the_tree() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let root = repo.create_category(&new_category("root", None)).unwrap();
    let child = repo
        .create_category(&new_category("child", Some(root.id)))
        .unwrap();
    repo.update_category(
        root.id,
        &CategoryPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    // The child is still active but has no visible attachment point.
    let active = repo.get_category_by_id(child.id).unwrap().unwrap();
    assert!(active.is_active);
    assert!(repo.category_tree().unwrap().is_empty());
}

#[test]
fn create_product_requires_an_existing_category() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let missing = CategoryId::new(999).unwrap();
    let err = repo
        .create_product(&new_product("widget", 1.0, missing))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));

    let category = repo.create_category(&new_category("tools", None)).unwrap();
    let product = repo
        .create_product(&new_product("widget", 1.0, category.id))
        .unwrap();
    assert!(product.is_active);
    assert_eq!(product.category_id, category.id);
}

#[test]
fn create_product_accepts_inactive_categories() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("tools", None)).unwrap();
    repo.update_category(
        category.id,
        &CategoryPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    let product = repo
        .create_product(&new_product("widget", 1.0, category.id))
        .unwrap();
    assert_eq!(product.category_id, category.id);
}

#[test]
fn update_product_revalidates_category_binding() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let first = repo.create_category(&new_category("first", None)).unwrap();
    let second = repo.create_category(&new_category("second", None)).unwrap();
    let product = repo
        .create_product(&new_product("widget", 1.0, first.id))
        .unwrap();

    let err = repo
        .update_product(
            product.id,
            &ProductPatch {
                category_id: Some(CategoryId::new(999).unwrap()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));

    let moved = repo
        .update_product(
            product.id,
            &ProductPatch {
                category_id: Some(second.id),
                price: Some(ProductPrice::new(2.5).unwrap()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(moved.category_id, second.id);
    assert_eq!(moved.price.get(), 2.5);
    assert!(moved.updated_at >= product.updated_at);
}

#[test]
fn update_and_delete_product_fail_for_missing_id() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let missing = ProductId::new(123).unwrap();
    let err = repo
        .update_product(missing, &ProductPatch::default())
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));

    let err = repo.delete_product(missing).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn active_products_by_category_join_and_order_by_name() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("tools", None)).unwrap();
    let other = repo.create_category(&new_category("other", None)).unwrap();
    repo.create_product(&new_product("zeta", 1.0, category.id)).unwrap();
    repo.create_product(&new_product("alpha", 2.0, category.id)).unwrap();
    repo.create_product(&new_product("elsewhere", 3.0, other.id)).unwrap();
    let inactive = repo
        .create_product(&new_product("ghost", 4.0, category.id))
        .unwrap();
    repo.update_product(
        inactive.id,
        &ProductPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    let listed = repo.list_active_products_by_category(category.id).unwrap();
    let names: Vec<&str> = listed.iter().map(|p| p.product.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
    assert!(listed.iter().all(|p| p.category_name == "tools"));
}

#[test]
fn products_of_inactive_categories_are_hidden_from_listings() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("tools", None)).unwrap();
    repo.create_product(&new_product("widget", 1.0, category.id)).unwrap();
    repo.update_category(
        category.id,
        &CategoryPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(repo
        .list_active_products_by_category(category.id)
        .unwrap()
        .is_empty());
    let grouped = repo.list_products_grouped_by_categories().unwrap();
    assert!(grouped.categories.is_empty());
    assert!(grouped.products.is_empty());
}

#[test]
fn grouped_listing_orders_products_by_category_then_name() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let beta = repo.create_category(&new_category("beta", None)).unwrap();
    let alpha = repo.create_category(&new_category("alpha", None)).unwrap();
    let nested = repo
        .create_category(&new_category("nested", Some(alpha.id)))
        .unwrap();

    repo.create_product(&new_product("b2", 1.0, beta.id)).unwrap();
    repo.create_product(&new_product("b1", 1.0, beta.id)).unwrap();
    repo.create_product(&new_product("a1", 1.0, alpha.id)).unwrap();
    repo.create_product(&new_product("n1", 1.0, nested.id)).unwrap();

    let grouped = repo.list_products_grouped_by_categories().unwrap();

    let category_names: Vec<&str> = grouped
        .categories
        .iter()
        .map(|entry| entry.category.name.as_str())
        .collect();
    assert_eq!(category_names, vec!["alpha", "beta", "nested"]);

    let product_names: Vec<&str> = grouped
        .products
        .iter()
        .map(|entry| entry.product.name.as_str())
        .collect();
    // Level 0 categories alphabetically first, then the level 1 category.
    assert_eq!(product_names, vec!["a1", "b1", "b2", "n1"]);
    assert_eq!(grouped.products[3].category_level.get(), 1);
    assert_eq!(grouped.products[3].category_name, "nested");
}

#[test]
fn product_count_matches_active_membership() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("tools", None)).unwrap();
    assert_eq!(repo.product_count_by_category(category.id).unwrap().get(), 0);

    repo.create_product(&new_product("one", 1.0, category.id)).unwrap();
    let second = repo
        .create_product(&new_product("two", 2.0, category.id))
        .unwrap();
    assert_eq!(repo.product_count_by_category(category.id).unwrap().get(), 2);

    repo.update_product(
        second.id,
        &ProductPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(repo.product_count_by_category(category.id).unwrap().get(), 1);

    let listed = repo.list_active_categories().unwrap();
    let entry = listed
        .iter()
        .find(|entry| entry.category.id == category.id)
        .unwrap();
    assert_eq!(entry.product_count.get(), 1);
}

#[test]
fn get_product_by_id_returns_stored_fields() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    assert!(repo
        .get_product_by_id(ProductId::new(5).unwrap())
        .unwrap()
        .is_none());

    let category = repo.create_category(&new_category("tools", None)).unwrap();
    let created = repo
        .create_product(&new_product("widget", 12.5, category.id))
        .unwrap();

    let fetched = repo.get_product_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched.name, "widget");
    assert_eq!(fetched.price.get(), 12.5);
    assert_eq!(fetched.category_id, category.id);
}
