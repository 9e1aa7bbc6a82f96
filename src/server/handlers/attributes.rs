use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::database::entities::attributes;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::{AttributeService, AttributeUpdate, NewAttribute};

pub async fn list_attributes(
    State(state): State<AppState>,
) -> Result<Json<Vec<attributes::Model>>, ApiError> {
    let attributes = AttributeService::new(state.db).list().await?;
    Ok(Json(attributes))
}

pub async fn create_attribute(
    State(state): State<AppState>,
    Json(payload): Json<NewAttribute>,
) -> Result<(StatusCode, Json<attributes::Model>), ApiError> {
    let attribute = AttributeService::new(state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(attribute)))
}

pub async fn get_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<attributes::Model>, ApiError> {
    let attribute = AttributeService::new(state.db).get(id).await?;
    Ok(Json(attribute))
}

pub async fn update_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AttributeUpdate>,
) -> Result<Json<attributes::Model>, ApiError> {
    let attribute = AttributeService::new(state.db).update(id, payload).await?;
    Ok(Json(attribute))
}

pub async fn delete_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    AttributeService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
