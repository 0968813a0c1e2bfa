//! CRUD behavior for categories, tags and products against a real store.

mod common;

use std::time::Duration;

use rust_decimal::Decimal;
use sea_orm::EntityTrait;

use storefront_server::db::entities::prelude::ProductTag;
use storefront_server::db::services::{category_service, product_service, tag_service};
use storefront_server::db::StoreError;
use storefront_server::web::models::{
    CreateCategoryRequest, CreateProductRequest, CreateTagRequest, UpdateCategoryRequest,
    UpdateProductRequest, UpdateTagRequest,
};

use common::{seed_category, seed_product, seed_tag, setup_db};

// --- Categories ---

#[tokio::test]
async fn creating_a_category_stores_a_trimmed_root() {
    let db = setup_db().await;

    let created = category_service::create_category(
        &db,
        CreateCategoryRequest {
            name: "  Electronics  ".to_string(),
            parent_id: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(created.name, "Electronics");
    assert_eq!(created.parent_id, None);

    let all = category_service::list_categories(&db).await.unwrap();
    assert_eq!(all, vec![created]);
}

#[tokio::test]
async fn blank_category_names_are_rejected() {
    let db = setup_db().await;

    let result = category_service::create_category(
        &db,
        CreateCategoryRequest {
            name: "   ".to_string(),
            parent_id: None,
        },
    )
    .await;

    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert!(category_service::list_categories(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn child_categories_nest_under_their_parent() {
    let db = setup_db().await;
    let root = seed_category(&db, "Electronics", None).await;

    let child = category_service::create_category(
        &db,
        CreateCategoryRequest {
            name: "Phones".to_string(),
            parent_id: Some(root.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(child.parent_id, Some(root.id));

    let tree = category_service::get_category_tree(&db).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].id, root.id);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].name, "Phones");
}

#[tokio::test]
async fn updating_only_the_name_keeps_the_parent() {
    let db = setup_db().await;
    let root = seed_category(&db, "Electronics", None).await;
    let child = seed_category(&db, "Phones", Some(root.id)).await;

    let updated = category_service::update_category(
        &db,
        child.id,
        UpdateCategoryRequest {
            name: Some("Phones & Tablets".to_string()),
            parent_id: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Phones & Tablets");
    assert_eq!(updated.parent_id, Some(root.id));
}

#[tokio::test]
async fn updating_only_the_parent_keeps_the_name() {
    let db = setup_db().await;
    let old_home = seed_category(&db, "Electronics", None).await;
    let new_home = seed_category(&db, "Outlet", None).await;
    let child = seed_category(&db, "Phones", Some(old_home.id)).await;

    let updated = category_service::update_category(
        &db,
        child.id,
        UpdateCategoryRequest {
            name: None,
            parent_id: Some(Some(new_home.id)),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Phones");
    assert_eq!(updated.parent_id, Some(new_home.id));
}

#[tokio::test]
async fn an_explicit_null_parent_detaches_to_root() {
    let db = setup_db().await;
    let root = seed_category(&db, "Electronics", None).await;
    let child = seed_category(&db, "Phones", Some(root.id)).await;

    let detached = category_service::update_category(
        &db,
        child.id,
        UpdateCategoryRequest {
            name: None,
            parent_id: Some(None),
        },
    )
    .await
    .unwrap();

    assert_eq!(detached.parent_id, None);
    let tree = category_service::get_category_tree(&db).await.unwrap();
    assert_eq!(tree.len(), 2);
}

#[tokio::test]
async fn empty_category_update_returns_the_row_unchanged() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;

    let updated = category_service::update_category(
        &db,
        category.id,
        UpdateCategoryRequest::default(),
    )
    .await
    .unwrap();

    assert_eq!(updated, category);
}

#[tokio::test]
async fn updating_to_a_blank_name_is_rejected() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;

    let result = category_service::update_category(
        &db,
        category.id,
        UpdateCategoryRequest {
            name: Some("  ".to_string()),
            parent_id: None,
        },
    )
    .await;

    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[tokio::test]
async fn updating_a_missing_category_reports_not_found() {
    let db = setup_db().await;

    let result =
        category_service::update_category(&db, 999, UpdateCategoryRequest::default()).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn category_with_children_refuses_deletion() {
    let db = setup_db().await;
    let root = seed_category(&db, "Electronics", None).await;
    let child = seed_category(&db, "Phones", Some(root.id)).await;

    let result = category_service::delete_category(&db, root.id).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));

    // Once the child is gone the parent can go too.
    category_service::delete_category(&db, child.id).await.unwrap();
    category_service::delete_category(&db, root.id).await.unwrap();
    assert!(category_service::list_categories(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn category_with_products_refuses_deletion() {
    let db = setup_db().await;
    let category = seed_category(&db, "Books", None).await;
    let product = seed_product(&db, "Rust in Motion", 40, category.id, &[]).await;

    let result = category_service::delete_category(&db, category.id).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));

    product_service::delete_product(&db, product.id).await.unwrap();
    category_service::delete_category(&db, category.id).await.unwrap();
}

#[tokio::test]
async fn deleting_a_missing_category_reports_not_found() {
    let db = setup_db().await;

    let result = category_service::delete_category(&db, 42).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

// --- Tags ---

#[tokio::test]
async fn creating_a_tag_stores_a_trimmed_name() {
    let db = setup_db().await;

    let created = tag_service::create_tag(
        &db,
        CreateTagRequest {
            name: "  Sale  ".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(created.name, "Sale");
    assert_eq!(tag_service::list_tags(&db).await.unwrap(), vec![created]);
}

#[tokio::test]
async fn blank_tag_names_are_rejected() {
    let db = setup_db().await;

    let result = tag_service::create_tag(
        &db,
        CreateTagRequest {
            name: " ".to_string(),
        },
    )
    .await;

    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[tokio::test]
async fn renaming_a_tag_persists() {
    let db = setup_db().await;
    let tag = seed_tag(&db, "Sale").await;

    let renamed = tag_service::update_tag(
        &db,
        tag.id,
        UpdateTagRequest {
            name: Some("Clearance".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.name, "Clearance");

    // An update carrying nothing leaves the row alone.
    let untouched = tag_service::update_tag(&db, tag.id, UpdateTagRequest::default())
        .await
        .unwrap();
    assert_eq!(untouched, renamed);
}

#[tokio::test]
async fn missing_tags_report_not_found() {
    let db = setup_db().await;

    let update = tag_service::update_tag(&db, 7, UpdateTagRequest::default()).await;
    assert!(matches!(update, Err(StoreError::NotFound(_))));

    let delete = tag_service::delete_tag(&db, 7).await;
    assert!(matches!(delete, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn deleting_a_tag_detaches_it_from_products() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;
    let sale = seed_tag(&db, "Sale").await;
    let product = seed_product(&db, "Omega TV", 900, category.id, &[sale.id]).await;
    assert_eq!(product.tags.len(), 1);

    tag_service::delete_tag(&db, sale.id).await.unwrap();

    let details = product_service::get_product(&db, product.id)
        .await
        .unwrap()
        .expect("product should survive its tag");
    assert!(details.tags.is_empty());
}

// --- Products ---

#[tokio::test]
async fn product_validation_rejects_blank_and_negative_input() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;

    let base = CreateProductRequest {
        name: "Nova Phone 5".to_string(),
        price: Decimal::from(500),
        description: "A phone".to_string(),
        category_id: category.id,
        tag_ids: None,
    };

    let blank_name = CreateProductRequest {
        name: "  ".to_string(),
        ..base.clone()
    };
    assert!(matches!(
        product_service::create_product(&db, blank_name).await,
        Err(StoreError::Validation(_))
    ));

    let blank_description = CreateProductRequest {
        description: String::new(),
        ..base.clone()
    };
    assert!(matches!(
        product_service::create_product(&db, blank_description).await,
        Err(StoreError::Validation(_))
    ));

    let negative_price = CreateProductRequest {
        price: Decimal::from(-1),
        ..base
    };
    assert!(matches!(
        product_service::create_product(&db, negative_price).await,
        Err(StoreError::Validation(_))
    ));
}

#[tokio::test]
async fn creating_a_product_in_an_unknown_category_fails() {
    let db = setup_db().await;

    let result = product_service::create_product(
        &db,
        CreateProductRequest {
            name: "Orphan".to_string(),
            price: Decimal::from(10),
            description: "No home".to_string(),
            category_id: 999,
            tag_ids: None,
        },
    )
    .await;

    assert!(matches!(result, Err(StoreError::Db(_))));
}

#[tokio::test]
async fn creating_a_product_links_each_tag_once() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;
    let sale = seed_tag(&db, "Sale").await;
    let new_arrival = seed_tag(&db, "New Arrival").await;

    let details = product_service::create_product(
        &db,
        CreateProductRequest {
            name: "Omega TV".to_string(),
            price: Decimal::from(900),
            description: "A television".to_string(),
            category_id: category.id,
            // The duplicate collapses to a single link.
            tag_ids: Some(vec![sale.id, new_arrival.id, sale.id]),
        },
    )
    .await
    .unwrap();

    let mut tag_ids: Vec<i32> = details.tags.iter().map(|t| t.id).collect();
    tag_ids.sort_unstable();
    let mut expected = vec![sale.id, new_arrival.id];
    expected.sort_unstable();
    assert_eq!(tag_ids, expected);

    let links = ProductTag::find().all(&db).await.unwrap();
    assert_eq!(links.len(), 2);
}

#[tokio::test]
async fn fetching_a_missing_product_returns_none() {
    let db = setup_db().await;

    let details = product_service::get_product(&db, 12345).await.unwrap();

    assert!(details.is_none());
}

#[tokio::test]
async fn partial_product_update_keeps_the_other_fields() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;
    let sale = seed_tag(&db, "Sale").await;
    let product = seed_product(&db, "Omega TV", 900, category.id, &[sale.id]).await;

    tokio::time::sleep(Duration::from_millis(2)).await;

    let updated = product_service::update_product(
        &db,
        product.id,
        UpdateProductRequest {
            price: Some(Decimal::from(700)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.price, Decimal::from(700));
    assert_eq!(updated.name, product.name);
    assert_eq!(updated.description, product.description);
    assert_eq!(updated.category_id, product.category_id);
    assert_eq!(updated.tags, product.tags);
    assert_eq!(updated.created_at, product.created_at);
    assert!(updated.updated_at > product.updated_at);
}

#[tokio::test]
async fn empty_product_update_leaves_the_timestamp_alone() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;
    let product = seed_product(&db, "Omega TV", 900, category.id, &[]).await;

    tokio::time::sleep(Duration::from_millis(2)).await;

    let untouched =
        product_service::update_product(&db, product.id, UpdateProductRequest::default())
            .await
            .unwrap();

    assert_eq!(untouched.name, product.name);
    assert_eq!(untouched.price, product.price);
    assert_eq!(untouched.updated_at, product.updated_at);
}

#[tokio::test]
async fn providing_a_tag_set_replaces_the_links() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;
    let sale = seed_tag(&db, "Sale").await;
    let new_arrival = seed_tag(&db, "New Arrival").await;
    let featured = seed_tag(&db, "Featured").await;
    let product = seed_product(&db, "Omega TV", 900, category.id, &[sale.id]).await;

    let updated = product_service::update_product(
        &db,
        product.id,
        UpdateProductRequest {
            tag_ids: Some(vec![new_arrival.id, featured.id]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let mut tag_ids: Vec<i32> = updated.tags.iter().map(|t| t.id).collect();
    tag_ids.sort_unstable();
    let mut expected = vec![new_arrival.id, featured.id];
    expected.sort_unstable();
    assert_eq!(tag_ids, expected);

    // An explicit empty set clears every link.
    let cleared = product_service::update_product(
        &db,
        product.id,
        UpdateProductRequest {
            tag_ids: Some(Vec::new()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(cleared.tags.is_empty());
}

#[tokio::test]
async fn updating_a_missing_product_reports_not_found() {
    let db = setup_db().await;

    let result =
        product_service::update_product(&db, 999, UpdateProductRequest::default()).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn deleting_a_product_removes_its_tag_links() {
    let db = setup_db().await;
    let category = seed_category(&db, "Electronics", None).await;
    let sale = seed_tag(&db, "Sale").await;
    let new_arrival = seed_tag(&db, "New Arrival").await;
    let product =
        seed_product(&db, "Omega TV", 900, category.id, &[sale.id, new_arrival.id]).await;

    product_service::delete_product(&db, product.id).await.unwrap();

    assert!(product_service::get_product(&db, product.id)
        .await
        .unwrap()
        .is_none());
    assert!(ProductTag::find().all(&db).await.unwrap().is_empty());
    // The tags themselves survive.
    assert_eq!(tag_service::list_tags(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_a_missing_product_reports_not_found() {
    let db = setup_db().await;

    let result = product_service::delete_product(&db, 999).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}
