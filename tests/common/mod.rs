//! Shared test fixtures: an in-memory database carrying the catalog schema,
//! plus seed helpers built on the public service API.

use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema};

use storefront_server::db::entities::{category, product, product_tag, tag};
use storefront_server::db::services::{category_service, product_service, tag_service};
use storefront_server::web::models::{
    CreateCategoryRequest, CreateProductRequest, CreateTagRequest,
};

/// Fresh in-memory database with all catalog tables created.
///
/// The pool is capped at a single connection: every new connection to
/// `sqlite::memory:` opens its own private database, so a second one would
/// see no tables at all.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1);
    let db = Database::connect(opt)
        .await
        .expect("Failed to open in-memory database");

    let schema = Schema::new(DbBackend::Sqlite);
    let statements = [
        schema.create_table_from_entity(category::Entity),
        schema.create_table_from_entity(tag::Entity),
        schema.create_table_from_entity(product::Entity),
        schema.create_table_from_entity(product_tag::Entity),
    ];
    for statement in statements {
        db.execute(db.get_database_backend().build(&statement))
            .await
            .expect("Failed to create table");
    }

    db
}

pub async fn seed_category(
    db: &DatabaseConnection,
    name: &str,
    parent_id: Option<i32>,
) -> category::Model {
    category_service::create_category(
        db,
        CreateCategoryRequest {
            name: name.to_string(),
            parent_id,
        },
    )
    .await
    .expect("Failed to seed category")
}

pub async fn seed_tag(db: &DatabaseConnection, name: &str) -> tag::Model {
    tag_service::create_tag(
        db,
        CreateTagRequest {
            name: name.to_string(),
        },
    )
    .await
    .expect("Failed to seed tag")
}

/// Seeds a product with a whole-number price; SQLite round-trips decimals
/// through floats, so fractional seed prices are kept out of the fixtures.
pub async fn seed_product(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
    category_id: i32,
    tag_ids: &[i32],
) -> product_service::ProductDetails {
    product_service::create_product(
        db,
        CreateProductRequest {
            name: name.to_string(),
            price: Decimal::from(price),
            description: format!("{name} description"),
            category_id,
            tag_ids: if tag_ids.is_empty() {
                None
            } else {
                Some(tag_ids.to_vec())
            },
        },
    )
    .await
    .expect("Failed to seed product")
}
