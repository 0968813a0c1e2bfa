//! Store service for tags.
//!
//! Tags are flat labels. Their attachment to products lives in the
//! `product_tags` junction, so deleting a tag cascades through the join rows
//! and silently detaches it from every product.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set,
};

use crate::db::entities::{prelude::*, tag};
use crate::db::StoreError;
use crate::web::models::{CreateTagRequest, UpdateTagRequest};

/// Creates a tag.
pub async fn create_tag(
    db: &DatabaseConnection,
    data: CreateTagRequest,
) -> Result<tag::Model, StoreError> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("tag name is required".to_string()));
    }

    let new_tag = tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };

    Ok(new_tag.insert(db).await?)
}

/// All tags, in storage order.
pub async fn list_tags(db: &DatabaseConnection) -> Result<Vec<tag::Model>, StoreError> {
    Ok(Tag::find().all(db).await?)
}

/// Renames a tag. An update carrying no fields returns the current row.
pub async fn update_tag(
    db: &DatabaseConnection,
    tag_id: i32,
    data: UpdateTagRequest,
) -> Result<tag::Model, StoreError> {
    let existing = Tag::find_by_id(tag_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound("tag"))?;

    let mut active_tag = existing.clone().into_active_model();

    if let Some(name) = data.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::Validation("tag name must not be blank".to_string()));
        }
        active_tag.name = Set(name);
    }

    if !active_tag.is_changed() {
        return Ok(existing);
    }

    Ok(active_tag.update(db).await?)
}

/// Deletes a tag; its join rows go with it.
pub async fn delete_tag(db: &DatabaseConnection, tag_id: i32) -> Result<(), StoreError> {
    let delete_result = Tag::delete_by_id(tag_id).exec(db).await?;
    if delete_result.rows_affected == 0 {
        return Err(StoreError::NotFound("tag"));
    }
    Ok(())
}
