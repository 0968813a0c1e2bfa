//! Store service for the category hierarchy.
//!
//! Categories are rows in a flat table; the nested view handed to clients is
//! rebuilt on every read by `db::category_tree`. Deletion uses restrict
//! semantics: a category keeping children or products stays put.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};

use crate::db::category_tree::{build_category_tree, CategoryTreeNode};
use crate::db::entities::{category, prelude::*, product};
use crate::db::StoreError;
use crate::web::models::{CreateCategoryRequest, UpdateCategoryRequest};

/// Creates a category, optionally attached to an existing parent.
pub async fn create_category(
    db: &DatabaseConnection,
    data: CreateCategoryRequest,
) -> Result<category::Model, StoreError> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("category name is required".to_string()));
    }

    let new_category = category::ActiveModel {
        name: Set(name.to_string()),
        parent_id: Set(data.parent_id),
        ..Default::default()
    };

    Ok(new_category.insert(db).await?)
}

/// All category rows, in storage order.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, StoreError> {
    Ok(Category::find().all(db).await?)
}

/// The full category forest, rebuilt from one table read.
pub async fn get_category_tree(
    db: &DatabaseConnection,
) -> Result<Vec<CategoryTreeNode>, StoreError> {
    let categories = Category::find().all(db).await?;
    Ok(build_category_tree(&categories))
}

/// Applies the provided fields to a category; absent fields stay unchanged.
/// An explicit null parent detaches the category to a root. An update
/// carrying no fields is a no-op that returns the current row.
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i32,
    data: UpdateCategoryRequest,
) -> Result<category::Model, StoreError> {
    let existing = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound("category"))?;

    let mut active_category = existing.clone().into_active_model();

    if let Some(name) = data.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::Validation(
                "category name must not be blank".to_string(),
            ));
        }
        active_category.name = Set(name);
    }
    if let Some(parent_id) = data.parent_id {
        active_category.parent_id = Set(parent_id);
    }

    if !active_category.is_changed() {
        return Ok(existing);
    }

    Ok(active_category.update(db).await?)
}

/// Deletes a category. Fails with `Conflict` while child categories or
/// products still reference it; the restrict foreign keys back this up at
/// the schema level.
pub async fn delete_category(db: &DatabaseConnection, category_id: i32) -> Result<(), StoreError> {
    if Category::find_by_id(category_id).one(db).await?.is_none() {
        return Err(StoreError::NotFound("category"));
    }

    let child_count = Category::find()
        .filter(category::Column::ParentId.eq(category_id))
        .count(db)
        .await?;
    if child_count > 0 {
        return Err(StoreError::Conflict(
            "category still has child categories".to_string(),
        ));
    }

    let product_count = Product::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .count(db)
        .await?;
    if product_count > 0 {
        return Err(StoreError::Conflict(
            "category is still referenced by products".to_string(),
        ));
    }

    Category::delete_by_id(category_id).exec(db).await?;
    Ok(())
}
