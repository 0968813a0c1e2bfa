use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

use crate::db::category_tree::CategoryTreeNode;
use crate::db::entities::category;
use crate::db::services::category_service;
use crate::web::models::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn get_category_tree_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryTreeNode>>, AppError> {
    let tree = category_service::get_category_tree(&app_state.db_pool).await?;
    Ok(Json(tree))
}

async fn create_category_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<category::Model>), AppError> {
    let created = category_service::create_category(&app_state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_category_handler(
    State(app_state): State<Arc<AppState>>,
    Path(category_id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<category::Model>, AppError> {
    let updated =
        category_service::update_category(&app_state.db_pool, category_id, payload).await?;
    Ok(Json(updated))
}

async fn delete_category_handler(
    State(app_state): State<Arc<AppState>>,
    Path(category_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    category_service::delete_category(&app_state.db_pool, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Router ---

pub fn create_categories_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(get_category_tree_handler).post(create_category_handler),
        )
        .route(
            "/{category_id}",
            put(update_category_handler).delete(delete_category_handler),
        )
}
