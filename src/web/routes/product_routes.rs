use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::Query;
use std::sync::Arc;

use crate::db::services::product_service::{self, ProductDetails, ProductFilter};
use crate::web::models::{CreateProductRequest, UpdateProductRequest};
use crate::web::{AppError, AppState};

// --- Route Handlers ---

// `axum_extra`'s Query collects repeated keys, so `?tagIds=1&tagIds=2`
// arrives as a Vec; the plain axum extractor would reject it.
async fn list_products_handler(
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductDetails>>, AppError> {
    let products = product_service::list_products(&app_state.db_pool, &filter).await?;
    Ok(Json(products))
}

async fn get_product_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<i32>,
) -> Result<Json<ProductDetails>, AppError> {
    match product_service::get_product(&app_state.db_pool, product_id).await? {
        Some(details) => Ok(Json(details)),
        None => Err(AppError::NotFound("product not found".to_string())),
    }
}

async fn create_product_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDetails>), AppError> {
    let created = product_service::create_product(&app_state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_product_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductDetails>, AppError> {
    let updated = product_service::update_product(&app_state.db_pool, product_id, payload).await?;
    Ok(Json(updated))
}

async fn delete_product_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    product_service::delete_product(&app_state.db_pool, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Router ---

pub fn create_products_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products_handler).post(create_product_handler))
        .route(
            "/{product_id}",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
}
