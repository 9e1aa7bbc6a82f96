use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use crate::database::entities::ProductStatus;
use crate::errors::ImportExportError;
use crate::server::app::AppState;
use crate::server::error::{ApiError, CurrentActor};
use crate::services::{ExportService, ImportOptions, ImportResult, ImportService, ProductFilters};
use crate::transfer::TransferFormat;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub format: String,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub status: Option<ProductStatus>,
    pub category_id: Option<i32>,
    pub assigned_to: Option<i32>,
}

#[derive(Deserialize)]
pub struct ImportQuery {
    pub format: String,
}

fn parse_format(format: &str) -> Result<TransferFormat, ImportExportError> {
    TransferFormat::from_str(format)
        .ok_or_else(|| ImportExportError::UnsupportedFormat(format.to_string()))
}

pub async fn export_products(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = parse_format(&query.format)?;
    let filters = ProductFilters {
        search: query.search,
        product_type: query.product_type,
        status: query.status,
        category_id: query.category_id,
        assigned_to: query.assigned_to,
    };

    let bytes = ExportService::new(state.db).export(format, &filters).await?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], bytes))
}

pub async fn import_products(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<Json<ImportResult>, ApiError> {
    let format = parse_format(&query.format)?;
    let service = ImportService::new(state.db, ImportOptions::from(state.config.as_ref()));
    let result = service.import(&body, format, &actor).await?;
    Ok(Json(result))
}
