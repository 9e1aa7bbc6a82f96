use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::Actor;
use crate::config::{PimConfig, DEFAULT_MAX_IMPORT_BYTES};
use crate::database::entities::{
    attribute_sets, attributes, categories, products, store_views, ProductStatus,
};
use crate::errors::{CatalogResult, ImportExportError, ImportExportResult};
use crate::services::attribute_value_service::{coerce_for, upsert_value, values_of};
use crate::services::product_service::{categories_of, insert_product, link_category, set_status};
use crate::services::ValidationService;
use crate::transfer::{ProductRecord, TransferFormat};
use crate::values::{AttributeValue, ValueColumns};

/// One failed row in the import summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    pub row: usize,
    pub sku: Option<String>,
    /// `PARSE_ERROR`, `VALIDATION_ERROR` or `DATABASE_ERROR`
    pub kind: String,
    pub message: String,
}

/// One field-level validation problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub sku: String,
    pub field: String,
    pub message: String,
}

/// What happened to a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Created,
    Updated,
    /// Existing product whose provided content already matched.
    Unchanged,
    Failed(ImportRowError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total: usize,
    pub successful: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportSummary {
    /// Fold one row outcome into the counters.
    ///
    /// Unchanged rows count as both updated and skipped, so
    /// `successful = created + updated` and `total = successful + failed`.
    pub fn record(&mut self, outcome: RowOutcome) {
        self.total += 1;
        match outcome {
            RowOutcome::Created => {
                self.created += 1;
                self.successful += 1;
            }
            RowOutcome::Updated => {
                self.updated += 1;
                self.successful += 1;
            }
            RowOutcome::Unchanged => {
                self.updated += 1;
                self.skipped += 1;
                self.successful += 1;
            }
            RowOutcome::Failed(error) => {
                self.failed += 1;
                self.errors.push(error);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub summary: ImportSummary,
    pub validation_errors: Vec<ValidationIssue>,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub max_import_bytes: usize,
    /// Store view for attribute values that name none.
    pub default_store_view: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_import_bytes: DEFAULT_MAX_IMPORT_BYTES,
            default_store_view: "default".to_string(),
        }
    }
}

impl From<&PimConfig> for ImportOptions {
    fn from(config: &PimConfig) -> Self {
        Self {
            max_import_bytes: config.max_import_bytes,
            default_store_view: config.default_store_view.clone(),
        }
    }
}

/// A validated row with every code resolved to an id.
#[derive(Debug, Clone)]
struct ResolvedRow {
    sku: String,
    product_type: String,
    status: Option<ProductStatus>,
    attribute_set_id: Option<i32>,
    assigned_to: Option<i32>,
    category_ids: Vec<i32>,
    values: Vec<ResolvedValueInput>,
}

#[derive(Debug, Clone)]
struct ResolvedValueInput {
    attribute_id: i32,
    store_view_id: i32,
    value: AttributeValue,
}

/// Code lookups shared by every row of one import.
struct CatalogIndex {
    attributes: HashMap<String, attributes::Model>,
    store_views: HashMap<String, store_views::Model>,
    categories: HashMap<String, categories::Model>,
    attribute_sets: HashMap<String, attribute_sets::Model>,
}

impl CatalogIndex {
    async fn load<C: ConnectionTrait>(conn: &C) -> CatalogResult<Self> {
        Ok(Self {
            attributes: attributes::Entity::find()
                .all(conn)
                .await?
                .into_iter()
                .map(|model| (model.code.clone(), model))
                .collect(),
            store_views: store_views::Entity::find()
                .all(conn)
                .await?
                .into_iter()
                .map(|model| (model.code.clone(), model))
                .collect(),
            categories: categories::Entity::find()
                .all(conn)
                .await?
                .into_iter()
                .map(|model| (model.code.clone(), model))
                .collect(),
            attribute_sets: attribute_sets::Entity::find()
                .all(conn)
                .await?
                .into_iter()
                .map(|model| (model.code.clone(), model))
                .collect(),
        })
    }
}

/// Bulk product import with per-row validation and partial failure.
#[derive(Clone)]
pub struct ImportService {
    db: DatabaseConnection,
    options: ImportOptions,
}

impl ImportService {
    pub fn new(db: DatabaseConnection, options: ImportOptions) -> Self {
        Self { db, options }
    }

    /// Import a document. Rows are processed one by one in file order,
    /// each in its own transaction; a failing row never affects another.
    pub async fn import(
        &self,
        bytes: &[u8],
        format: TransferFormat,
        actor: &Actor,
    ) -> ImportExportResult<ImportResult> {
        if bytes.len() > self.options.max_import_bytes {
            return Err(ImportExportError::FileTooLarge {
                size: bytes.len(),
                limit: self.options.max_import_bytes,
            });
        }

        let rows = format.codec().decode(bytes)?;
        info!("Importing {} {} row(s)", rows.len(), format);

        let index = CatalogIndex::load(&self.db).await?;
        let mut result = ImportResult::default();

        for decoded in rows {
            let row = decoded.row;
            let record = match decoded.outcome {
                Ok(record) => record,
                Err(parse_error) => {
                    warn!("Row {} could not be parsed: {}", row, parse_error.message);
                    result.summary.record(RowOutcome::Failed(ImportRowError {
                        row,
                        sku: parse_error.sku,
                        kind: "PARSE_ERROR".to_string(),
                        message: parse_error.message,
                    }));
                    continue;
                }
            };

            let resolved = match self.validate_row(&index, &record) {
                Ok(resolved) => resolved,
                Err(issues) => {
                    warn!("Row {} ({}) failed validation", row, record.sku);
                    let message = issues
                        .iter()
                        .map(|issue| format!("{}: {}", issue.field, issue.message))
                        .collect::<Vec<_>>()
                        .join("; ");
                    result.validation_errors.extend(issues);
                    result.summary.record(RowOutcome::Failed(ImportRowError {
                        row,
                        sku: Some(record.sku).filter(|sku| !sku.is_empty()),
                        kind: "VALIDATION_ERROR".to_string(),
                        message,
                    }));
                    continue;
                }
            };

            let outcome = match self.write_row(&resolved, actor).await {
                Ok(outcome) => {
                    debug!("Row {} ({}): {:?}", row, resolved.sku, outcome);
                    outcome
                }
                Err(e) => {
                    warn!("Row {} ({}) rolled back: {}", row, resolved.sku, e);
                    RowOutcome::Failed(ImportRowError {
                        row,
                        sku: Some(resolved.sku.clone()),
                        kind: "DATABASE_ERROR".to_string(),
                        message: e.to_string(),
                    })
                }
            };
            result.summary.record(outcome);
        }

        let summary = &result.summary;
        info!(
            "Import finished: {} total, {} created, {} updated, {} skipped, {} failed",
            summary.total, summary.created, summary.updated, summary.skipped, summary.failed
        );
        Ok(result)
    }

    /// Check a record against the catalog, collecting every problem.
    fn validate_row(
        &self,
        index: &CatalogIndex,
        record: &ProductRecord,
    ) -> Result<ResolvedRow, Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        let mut issue = |field: &str, message: String| {
            issues.push(ValidationIssue {
                sku: record.sku.clone(),
                field: field.to_string(),
                message,
            })
        };

        let sku = match ValidationService::validate_sku(&record.sku) {
            Ok(sku) => sku,
            Err(e) => {
                issue("sku", e.to_string());
                String::new()
            }
        };

        let product_type = record.product_type.trim().to_string();
        if product_type.is_empty() {
            issue("type", "type is required".to_string());
        }

        let status = match record.status.as_deref() {
            None => None,
            Some(raw) => match ProductStatus::from_str(raw) {
                Some(status) => Some(status),
                None => {
                    issue("status", format!("unknown status '{}'", raw));
                    None
                }
            },
        };

        let attribute_set_id = match record.attribute_set.as_deref() {
            None => None,
            Some(code) => match index.attribute_sets.get(code) {
                Some(set) => Some(set.id),
                None => {
                    issue("attributeSet", format!("attribute set '{}' does not exist", code));
                    None
                }
            },
        };

        let mut category_ids = Vec::new();
        for code in &record.categories {
            match index.categories.get(code) {
                Some(category) => category_ids.push(category.id),
                None => issue("categories", format!("category '{}' does not exist", code)),
            }
        }

        let mut values = Vec::new();
        for attribute_record in &record.attributes {
            let field = format!("attributes.{}", attribute_record.code);
            let Some(attribute) = index.attributes.get(&attribute_record.code) else {
                issue(&field, format!("attribute '{}' does not exist", attribute_record.code));
                continue;
            };

            let store_view_code = attribute_record
                .store_view
                .as_deref()
                .unwrap_or(&self.options.default_store_view);
            let Some(store_view) = index.store_views.get(store_view_code) else {
                issue(&field, format!("store view '{}' does not exist", store_view_code));
                continue;
            };

            match coerce_for(attribute, &attribute_record.value) {
                Ok(value) => values.push(ResolvedValueInput {
                    attribute_id: attribute.id,
                    store_view_id: store_view.id,
                    value,
                }),
                Err(e) => issue(&field, e.to_string()),
            }
        }

        if !issues.is_empty() {
            return Err(issues);
        }

        Ok(ResolvedRow {
            sku,
            product_type,
            status,
            attribute_set_id,
            assigned_to: record.assigned_to,
            category_ids,
            values,
        })
    }

    /// Write one row in its own transaction.
    async fn write_row(&self, row: &ResolvedRow, actor: &Actor) -> CatalogResult<RowOutcome> {
        let txn = self.db.begin().await?;
        let outcome = apply_row(&txn, row, actor).await?;
        txn.commit().await?;
        Ok(outcome)
    }
}

async fn apply_row<C: ConnectionTrait>(
    conn: &C,
    row: &ResolvedRow,
    actor: &Actor,
) -> CatalogResult<RowOutcome> {
    let existing = products::Entity::find()
        .filter(products::Column::Sku.eq(row.sku.as_str()))
        .one(conn)
        .await?;

    let Some(product) = existing else {
        let product = insert_product(
            conn,
            &row.sku,
            &row.product_type,
            row.status.unwrap_or_default(),
            row.attribute_set_id,
            row.assigned_to,
            actor,
        )
        .await?;
        for category_id in &row.category_ids {
            link_category(conn, product.id, *category_id).await?;
        }
        for input in &row.values {
            upsert_value(conn, product.id, input.attribute_id, input.store_view_id, &input.value)
                .await?;
        }
        return Ok(RowOutcome::Created);
    };

    let fields_changed = product.product_type != row.product_type
        || row
            .attribute_set_id
            .is_some_and(|id| product.attribute_set_id != Some(id))
        || row
            .assigned_to
            .is_some_and(|id| product.assigned_to != Some(id));
    let status_change = row.status.filter(|status| product.status() != Some(*status));

    let linked: Vec<i32> = categories_of(conn, product.id)
        .await?
        .into_iter()
        .map(|category| category.id)
        .collect();
    let new_categories: Vec<i32> = row
        .category_ids
        .iter()
        .copied()
        .filter(|id| !linked.contains(id))
        .collect();

    // Compared in persisted form: decimal equality ignores scale.
    let stored: HashMap<(i32, i32), ValueColumns> = values_of(conn, product.id)
        .await?
        .into_iter()
        .map(|resolved| {
            let key = (resolved.attribute.id, resolved.store_view.id);
            (key, ValueColumns::from(&resolved.value))
        })
        .collect();
    let changed_values: Vec<&ResolvedValueInput> = row
        .values
        .iter()
        .filter(|input| {
            let key = (input.attribute_id, input.store_view_id);
            stored.get(&key) != Some(&ValueColumns::from(&input.value))
        })
        .collect();

    if !fields_changed
        && status_change.is_none()
        && new_categories.is_empty()
        && changed_values.is_empty()
    {
        return Ok(RowOutcome::Unchanged);
    }

    let product_id = product.id;
    let mut active: products::ActiveModel = product.into();
    active.product_type = Set(row.product_type.clone());
    if let Some(set_id) = row.attribute_set_id {
        active.attribute_set_id = Set(Some(set_id));
    }
    if let Some(assigned_to) = row.assigned_to {
        active.assigned_to = Set(Some(assigned_to));
    }
    active.updated_at = Set(Utc::now());
    let product = active.update(conn).await?;

    if let Some(status) = status_change {
        set_status(conn, product, status, actor, Some("Changed by import".to_string())).await?;
    }
    for category_id in new_categories {
        link_category(conn, product_id, category_id).await?;
    }
    for input in changed_values {
        upsert_value(conn, product_id, input.attribute_id, input.store_view_id, &input.value)
            .await?;
    }

    Ok(RowOutcome::Updated)
}
