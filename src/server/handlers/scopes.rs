use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;

use crate::database::entities::{categories, locales, store_views};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::{ProductService, StoreViewService};

#[derive(Deserialize)]
pub struct CreateLocaleRequest {
    pub code: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreViewRequest {
    pub code: String,
    pub name: String,
    pub locale_id: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub code: String,
    pub name: String,
    pub parent_id: Option<i32>,
}

pub async fn list_locales(
    State(state): State<AppState>,
) -> Result<Json<Vec<locales::Model>>, ApiError> {
    let locales = StoreViewService::new(state.db).list_locales().await?;
    Ok(Json(locales))
}

pub async fn create_locale(
    State(state): State<AppState>,
    Json(payload): Json<CreateLocaleRequest>,
) -> Result<(StatusCode, Json<locales::Model>), ApiError> {
    let locale = StoreViewService::new(state.db)
        .create_locale(&payload.code, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(locale)))
}

pub async fn list_store_views(
    State(state): State<AppState>,
) -> Result<Json<Vec<store_views::Model>>, ApiError> {
    let store_views = StoreViewService::new(state.db).list_store_views().await?;
    Ok(Json(store_views))
}

pub async fn create_store_view(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoreViewRequest>,
) -> Result<(StatusCode, Json<store_views::Model>), ApiError> {
    let store_view = StoreViewService::new(state.db)
        .create_store_view(&payload.code, &payload.name, payload.locale_id)
        .await?;
    Ok((StatusCode::CREATED, Json(store_view)))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<categories::Model>>, ApiError> {
    let categories = ProductService::new(state.db).list_categories().await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<categories::Model>), ApiError> {
    let category = ProductService::new(state.db)
        .create_category(&payload.code, &payload.name, payload.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}
