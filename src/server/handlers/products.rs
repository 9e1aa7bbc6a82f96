use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::entities::{categories, products, workflow_history, ProductStatus};
use crate::server::app::AppState;
use crate::server::error::{ApiError, CurrentActor};
use crate::services::{
    AttributeValueService, NewProduct, ProductFilters, ProductService, ProductUpdate,
    ResolvedValue,
};

#[derive(Deserialize)]
pub struct SetValueRequest {
    pub value: Value,
}

#[derive(Deserialize)]
pub struct TransitionRequest {
    pub status: ProductStatus,
    pub notes: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(filters): Query<ProductFilters>,
) -> Result<Json<Vec<products::Model>>, ApiError> {
    let products = ProductService::new(state.db).list(&filters).await?;
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<products::Model>), ApiError> {
    let product = ProductService::new(state.db).create(payload, &actor).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<products::Model>, ApiError> {
    let product = ProductService::new(state.db).get(id).await?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductUpdate>,
) -> Result<Json<products::Model>, ApiError> {
    let product = ProductService::new(state.db).update(id, payload).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    ProductService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_values(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ResolvedValue>>, ApiError> {
    let values = AttributeValueService::new(state.db)
        .list_for_product(id)
        .await?;
    Ok(Json(values))
}

pub async fn set_value(
    State(state): State<AppState>,
    Path((id, attribute_id, store_view_id)): Path<(i32, i32, i32)>,
    Json(payload): Json<SetValueRequest>,
) -> Result<Json<ResolvedValue>, ApiError> {
    let value = AttributeValueService::new(state.db)
        .set_value(id, attribute_id, store_view_id, &payload.value)
        .await?;
    Ok(Json(value))
}

pub async fn clear_value(
    State(state): State<AppState>,
    Path((id, attribute_id, store_view_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let removed = AttributeValueService::new(state.db)
        .clear_value(id, attribute_id, store_view_id)
        .await?;
    Ok(if removed {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    })
}

pub async fn transition_product(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
    Json(payload): Json<TransitionRequest>,
) -> Result<Json<workflow_history::Model>, ApiError> {
    let entry = ProductService::new(state.db)
        .transition(id, payload.status, &actor, payload.notes)
        .await?;
    Ok(Json(entry))
}

pub async fn product_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<workflow_history::Model>>, ApiError> {
    let history = ProductService::new(state.db).history(id).await?;
    Ok(Json(history))
}

pub async fn product_categories(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<categories::Model>>, ApiError> {
    let categories = ProductService::new(state.db)
        .categories_for_product(id)
        .await?;
    Ok(Json(categories))
}

pub async fn assign_category(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    ProductService::new(state.db)
        .assign_category(id, category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_category(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let removed = ProductService::new(state.db)
        .unassign_category(id, category_id)
        .await?;
    Ok(if removed {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    })
}
