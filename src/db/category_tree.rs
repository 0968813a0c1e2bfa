//! In-memory materialization of the category hierarchy.
//!
//! Categories live in one flat table (`id`, `name`, `parent_id`). This module
//! derives the two hierarchical views the rest of the crate needs from a
//! single full read of that table: the nested forest served to clients, and
//! the descendant id set used to widen category-scoped product queries. Both
//! walk an adjacency map built in one pass, so storage is read exactly once
//! per request no matter how deep the hierarchy goes.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::entities::category;

/// A category with its transitively nested children.
///
/// Derived on demand, never persisted. Children keep the order in which the
/// rows came back from storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTreeNode {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub children: Vec<CategoryTreeNode>,
}

/// Builds the nested category forest from the full set of category rows.
///
/// A row is a root when it has no parent, or when its `parent_id` does not
/// resolve to any row in the set (a dangling parent orphans the row upward
/// rather than dropping it). Every row appears in the forest exactly once.
pub fn build_category_tree(categories: &[category::Model]) -> Vec<CategoryTreeNode> {
    let by_id: HashMap<i32, &category::Model> =
        categories.iter().map(|c| (c.id, c)).collect();

    let mut children_of: HashMap<i32, Vec<&category::Model>> = HashMap::new();
    let mut roots: Vec<&category::Model> = Vec::new();
    for c in categories {
        match c.parent_id {
            Some(parent_id) if by_id.contains_key(&parent_id) => {
                children_of.entry(parent_id).or_default().push(c);
            }
            _ => roots.push(c),
        }
    }

    roots
        .into_iter()
        .map(|root| materialize(root, &children_of))
        .collect()
}

fn materialize(
    row: &category::Model,
    children_of: &HashMap<i32, Vec<&category::Model>>,
) -> CategoryTreeNode {
    let children = children_of
        .get(&row.id)
        .into_iter()
        .flatten()
        .map(|child| materialize(child, children_of))
        .collect();

    CategoryTreeNode {
        id: row.id,
        name: row.name.clone(),
        parent_id: row.parent_id,
        children,
    }
}

/// Expands a category id into itself plus every transitive descendant.
///
/// The requested id always comes first and is always included, even when it
/// matches no row; a stale or unknown id then scopes a product query down to
/// nothing instead of failing it. Parent links are assumed acyclic.
pub fn collect_descendant_ids(categories: &[category::Model], category_id: i32) -> Vec<i32> {
    let mut children_of: HashMap<i32, Vec<i32>> = HashMap::new();
    for c in categories {
        if let Some(parent_id) = c.parent_id {
            children_of.entry(parent_id).or_default().push(c.id);
        }
    }

    // Worklist walk: ids[cursor..] still need their children appended.
    let mut ids = vec![category_id];
    let mut cursor = 0;
    while cursor < ids.len() {
        if let Some(children) = children_of.get(&ids[cursor]) {
            ids.extend_from_slice(children);
        }
        cursor += 1;
    }
    ids
}
