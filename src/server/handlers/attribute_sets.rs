use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::database::entities::{attribute_groups, attribute_sets};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::{AttributeSetLayout, AttributeSetService, NewAttributeGroup, NewAttributeSet};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignAttributeRequest {
    pub attribute_id: i32,
    #[serde(default)]
    pub sort_order: i32,
    pub group_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub group_id: Option<i32>,
    pub attribute_ids: Vec<i32>,
}

pub async fn list_sets(
    State(state): State<AppState>,
) -> Result<Json<Vec<attribute_sets::Model>>, ApiError> {
    let sets = AttributeSetService::new(state.db).list_sets().await?;
    Ok(Json(sets))
}

pub async fn create_set(
    State(state): State<AppState>,
    Json(payload): Json<NewAttributeSet>,
) -> Result<(StatusCode, Json<attribute_sets::Model>), ApiError> {
    let set = AttributeSetService::new(state.db).create_set(payload).await?;
    Ok((StatusCode::CREATED, Json(set)))
}

pub async fn get_set(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<attribute_sets::Model>, ApiError> {
    let set = AttributeSetService::new(state.db).get_set(id).await?;
    Ok(Json(set))
}

pub async fn create_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewAttributeGroup>,
) -> Result<(StatusCode, Json<attribute_groups::Model>), ApiError> {
    let group = AttributeSetService::new(state.db)
        .create_group(id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn assign_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AssignAttributeRequest>,
) -> Result<StatusCode, ApiError> {
    AttributeSetService::new(state.db)
        .assign_attribute_to_set(id, payload.attribute_id, payload.sort_order, payload.group_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_attribute(
    State(state): State<AppState>,
    Path((id, attribute_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    AttributeSetService::new(state.db)
        .unassign_attribute(id, attribute_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_attributes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError> {
    AttributeSetService::new(state.db)
        .reorder(id, payload.group_id, &payload.attribute_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_layout(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AttributeSetLayout>, ApiError> {
    let layout = AttributeSetService::new(state.db).layout(id).await?;
    Ok(Json(layout))
}
