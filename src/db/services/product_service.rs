//! Store service for products and the filtered listing query.
//!
//! This service provides CRUD over products (tag links ride along in the
//! same transaction) and `list_products`, which translates a `ProductFilter`
//! into one SQL statement. Every filter dimension is optional; present
//! dimensions combine with AND.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::try_join;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    Order, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::db::category_tree::collect_descendant_ids;
use crate::db::entities::{category, prelude::*, product, product_tag, tag};
use crate::db::StoreError;
use crate::web::models::{CreateProductRequest, UpdateProductRequest};

/// Sort keys accepted by the product listing.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Name,
    Price,
    CreatedAt,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One product listing request, decoded straight from the query string.
///
/// `category_id` scopes to the category and all of its descendants;
/// `tag_ids` matches products carrying any of the listed tags. Without
/// `sort_by` the listing keeps storage order.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

/// A product joined with its category and tags, as served to clients.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: category::Model,
    pub tags: Vec<tag::Model>,
}

impl From<(product::Model, category::Model, Vec<tag::Model>)> for ProductDetails {
    fn from(
        (product, category, tags): (product::Model, category::Model, Vec<tag::Model>),
    ) -> Self {
        ProductDetails {
            id: product.id,
            name: product.name,
            price: product.price,
            description: product.description,
            category_id: product.category_id,
            created_at: product.created_at,
            updated_at: product.updated_at,
            category,
            tags,
        }
    }
}

/// Runs one filtered, sorted product listing.
///
/// The category dimension is widened in memory to the selected category plus
/// all of its descendants before it reaches SQL, so hierarchy scoping never
/// recurses into storage. The tag dimension matches through a subquery on
/// the junction table. Filters that match nothing produce an empty list, not
/// an error.
pub async fn list_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
) -> Result<Vec<ProductDetails>, StoreError> {
    let mut query = Product::find();

    if let Some(category_id) = filter.category_id {
        let categories = Category::find().all(db).await?;
        let scope = collect_descendant_ids(&categories, category_id);
        query = query.filter(product::Column::CategoryId.is_in(scope));
    }

    if !filter.tag_ids.is_empty() {
        let tagged_product_ids = Query::select()
            .column(product_tag::Column::ProductId)
            .from(product_tag::Entity)
            .and_where(product_tag::Column::TagId.is_in(filter.tag_ids.clone()))
            .to_owned();
        query = query.filter(product::Column::Id.in_subquery(tagged_product_ids));
    }

    if let Some(min_price) = filter.min_price {
        query = query.filter(product::Column::Price.gte(min_price));
    }
    if let Some(max_price) = filter.max_price {
        query = query.filter(product::Column::Price.lte(max_price));
    }

    if let Some(term) = filter.search.as_deref() {
        if !term.is_empty() {
            // lower() on both sides keeps the match case-insensitive on every
            // backend; the escape makes literal % and _ in the term inert.
            let escaped = term
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            let pattern = format!("%{}%", escaped.to_lowercase());
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    product::Entity,
                    product::Column::Name,
                ))))
                .like(LikeExpr::new(pattern).escape('\\')),
            );
        }
    }

    if let Some(sort_by) = filter.sort_by {
        let column = match sort_by {
            SortBy::Name => product::Column::Name,
            SortBy::Price => product::Column::Price,
            SortBy::CreatedAt => product::Column::CreatedAt,
        };
        let order = match filter.sort_order.unwrap_or(SortOrder::Asc) {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        query = query.order_by(column, order);
    }

    let products = query.all(db).await?;
    attach_relations(db, products).await
}

/// Looks up one product with its category and tags.
pub async fn get_product(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<Option<ProductDetails>, StoreError> {
    let product = match Product::find_by_id(product_id).one(db).await? {
        Some(p) => p,
        None => return Ok(None),
    };

    let mut details = attach_relations(db, vec![product]).await?;
    Ok(details.pop())
}

/// Creates a product and its tag links in one transaction.
pub async fn create_product(
    db: &DatabaseConnection,
    data: CreateProductRequest,
) -> Result<ProductDetails, StoreError> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("product name is required".to_string()));
    }
    if data.description.trim().is_empty() {
        return Err(StoreError::Validation(
            "product description is required".to_string(),
        ));
    }
    if data.price < Decimal::ZERO {
        return Err(StoreError::Validation(
            "product price must not be negative".to_string(),
        ));
    }

    let now = Utc::now();
    let new_product = product::ActiveModel {
        name: Set(name.to_string()),
        price: Set(data.price),
        description: Set(data.description),
        category_id: Set(data.category_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let txn = db.begin().await?;

    let saved_product = new_product.insert(&txn).await?;

    if let Some(tag_ids) = data.tag_ids {
        let mut tag_ids = tag_ids;
        tag_ids.sort_unstable();
        tag_ids.dedup();
        if !tag_ids.is_empty() {
            let links = tag_ids.into_iter().map(|tag_id| product_tag::ActiveModel {
                product_id: Set(saved_product.id),
                tag_id: Set(tag_id),
            });
            ProductTag::insert_many(links).exec(&txn).await?;
        }
    }

    txn.commit().await?;

    get_product(db, saved_product.id)
        .await?
        .ok_or(StoreError::NotFound("product"))
}

/// Applies the provided fields to a product. A provided tag set fully
/// replaces the existing links (an empty set clears them); an absent one
/// leaves them untouched. An update carrying nothing at all is a no-op that
/// returns the current row.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i32,
    data: UpdateProductRequest,
) -> Result<ProductDetails, StoreError> {
    if let Some(name) = data.name.as_deref() {
        if name.trim().is_empty() {
            return Err(StoreError::Validation(
                "product name must not be blank".to_string(),
            ));
        }
    }
    if let Some(description) = data.description.as_deref() {
        if description.trim().is_empty() {
            return Err(StoreError::Validation(
                "product description must not be blank".to_string(),
            ));
        }
    }
    if let Some(price) = data.price {
        if price < Decimal::ZERO {
            return Err(StoreError::Validation(
                "product price must not be negative".to_string(),
            ));
        }
    }

    let txn = db.begin().await?;

    let existing = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(StoreError::NotFound("product"))?;

    let mut active_product = existing.into_active_model();

    if let Some(name) = data.name {
        active_product.name = Set(name.trim().to_string());
    }
    if let Some(price) = data.price {
        active_product.price = Set(price);
    }
    if let Some(description) = data.description {
        active_product.description = Set(description);
    }
    if let Some(category_id) = data.category_id {
        active_product.category_id = Set(category_id);
    }

    let tags_provided = data.tag_ids.is_some();

    if active_product.is_changed() || tags_provided {
        active_product.updated_at = Set(Utc::now());
        active_product.update(&txn).await?;
    }

    if let Some(tag_ids) = data.tag_ids {
        // Full replacement: clear the existing links, then insert the new set.
        ProductTag::delete_many()
            .filter(product_tag::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await?;

        let mut tag_ids = tag_ids;
        tag_ids.sort_unstable();
        tag_ids.dedup();
        if !tag_ids.is_empty() {
            let links = tag_ids.into_iter().map(|tag_id| product_tag::ActiveModel {
                product_id: Set(product_id),
                tag_id: Set(tag_id),
            });
            ProductTag::insert_many(links).exec(&txn).await?;
        }
    }

    txn.commit().await?;

    get_product(db, product_id)
        .await?
        .ok_or(StoreError::NotFound("product"))
}

/// Deletes a product; its tag links cascade with it.
pub async fn delete_product(db: &DatabaseConnection, product_id: i32) -> Result<(), StoreError> {
    let delete_result = Product::delete_by_id(product_id).exec(db).await?;
    if delete_result.rows_affected == 0 {
        return Err(StoreError::NotFound("product"));
    }
    Ok(())
}

/// Resolves the category and tag set for a page of products.
///
/// Two batched lookups (categories and junction rows in parallel, then the
/// distinct tags) and an in-memory zip, instead of a per-product join.
async fn attach_relations(
    db: &DatabaseConnection,
    products: Vec<product::Model>,
) -> Result<Vec<ProductDetails>, StoreError> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let mut category_ids: Vec<i32> = products.iter().map(|p| p.category_id).collect();
    category_ids.sort_unstable();
    category_ids.dedup();

    let categories_future = Category::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(db);
    let links_future = ProductTag::find()
        .filter(product_tag::Column::ProductId.is_in(product_ids))
        .all(db);

    let (categories, links) = try_join!(categories_future, links_future)?;

    let category_map: HashMap<i32, category::Model> =
        categories.into_iter().map(|c| (c.id, c)).collect();

    let mut tag_ids_by_product: HashMap<i32, Vec<i32>> = HashMap::new();
    let mut all_tag_ids: Vec<i32> = Vec::new();
    for link in links {
        tag_ids_by_product
            .entry(link.product_id)
            .or_default()
            .push(link.tag_id);
        all_tag_ids.push(link.tag_id);
    }
    all_tag_ids.sort_unstable();
    all_tag_ids.dedup();

    let tags = if all_tag_ids.is_empty() {
        Vec::new()
    } else {
        Tag::find()
            .filter(tag::Column::Id.is_in(all_tag_ids))
            .all(db)
            .await?
    };
    let tag_map: HashMap<i32, tag::Model> = tags.into_iter().map(|t| (t.id, t)).collect();

    let mut details_list = Vec::with_capacity(products.len());
    for product in products {
        let category = category_map
            .get(&product.category_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::Db(DbErr::RecordNotFound(format!(
                    "category {} referenced by product {}",
                    product.category_id, product.id
                )))
            })?;

        let tags = tag_ids_by_product
            .get(&product.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| tag_map.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();

        details_list.push(ProductDetails::from((product, category, tags)));
    }

    Ok(details_list)
}
