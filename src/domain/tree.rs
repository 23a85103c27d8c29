//! Pure reconstruction of the category tree from flat rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, CategoryWithProductCount};
use crate::domain::types::{CategoryId, ProductCount};

/// A category with its product count and recursively nested children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: ProductCount,
    pub children: Vec<CategoryTree>,
}

/// Assembles a nested forest from a flat list of categories.
///
/// Children are grouped by `parent_id`, so the relative order of siblings is
/// the order of the input list. Entries whose parent id is not present in the
/// input (the parent was deactivated) are dropped rather than promoted to
/// roots; callers that want them visible must include the parent in the
/// input.
pub fn build_category_tree(flat: Vec<CategoryWithProductCount>) -> Vec<CategoryTree> {
    let mut children_of: HashMap<Option<CategoryId>, Vec<CategoryWithProductCount>> =
        HashMap::new();
    for entry in flat {
        children_of
            .entry(entry.category.parent_id)
            .or_default()
            .push(entry);
    }
    attach(None, &mut children_of)
}

fn attach(
    parent: Option<CategoryId>,
    children_of: &mut HashMap<Option<CategoryId>, Vec<CategoryWithProductCount>>,
) -> Vec<CategoryTree> {
    children_of
        .remove(&parent)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let children = attach(Some(entry.category.id), children_of);
            CategoryTree {
                category: entry.category,
                product_count: entry.product_count,
                children,
            }
        })
        .collect()
}
