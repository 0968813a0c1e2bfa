use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

use crate::db::entities::tag;
use crate::db::services::tag_service;
use crate::web::models::{CreateTagRequest, UpdateTagRequest};
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn list_tags_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<tag::Model>>, AppError> {
    let tags = tag_service::list_tags(&app_state.db_pool).await?;
    Ok(Json(tags))
}

async fn create_tag_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<tag::Model>), AppError> {
    let created = tag_service::create_tag(&app_state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_tag_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
    Json(payload): Json<UpdateTagRequest>,
) -> Result<Json<tag::Model>, AppError> {
    let updated = tag_service::update_tag(&app_state.db_pool, tag_id, payload).await?;
    Ok(Json(updated))
}

async fn delete_tag_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    tag_service::delete_tag(&app_state.db_pool, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Router ---

pub fn create_tags_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tags_handler).post(create_tag_handler))
        .route("/{tag_id}", put(update_tag_handler).delete(delete_tag_handler))
}
