use axum::{http::Method, routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::routes::{category_routes, product_routes, tag_routes};

pub mod error;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(db_pool: DatabaseConnection) -> Router {
    let app_state = Arc::new(AppState { db_pool });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest(
            "/api/categories",
            category_routes::create_categories_router(),
        )
        .nest("/api/tags", tag_routes::create_tags_router())
        .nest("/api/products", product_routes::create_products_router())
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
