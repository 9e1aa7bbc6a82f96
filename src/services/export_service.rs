use std::collections::HashMap;

use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::info;

use crate::database::entities::attribute_sets;
use crate::errors::ImportExportResult;
use crate::services::attribute_value_service::values_of;
use crate::services::product_service::categories_of;
use crate::services::{ProductFilters, ProductService};
use crate::transfer::{AttributeRecord, ProductRecord, TransferFormat};

/// Bulk product export.
#[derive(Clone)]
pub struct ExportService {
    db: DatabaseConnection,
}

impl ExportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Export the products matching `filters` in `format`.
    ///
    /// Output is deterministic for the same catalog state: products by id,
    /// categories by code, attributes by code then store view.
    pub async fn export(
        &self,
        format: TransferFormat,
        filters: &ProductFilters,
    ) -> ImportExportResult<Vec<u8>> {
        let records = self.records(filters).await?;
        let bytes = format.codec().encode(&records)?;

        info!(
            "Exported {} product(s) as {} ({} bytes)",
            records.len(),
            format,
            bytes.len()
        );
        Ok(bytes)
    }

    /// The transfer records for the products matching `filters`.
    pub async fn records(
        &self,
        filters: &ProductFilters,
    ) -> ImportExportResult<Vec<ProductRecord>> {
        let products = ProductService::new(self.db.clone()).list(filters).await?;
        let set_codes: HashMap<i32, String> = attribute_sets::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|set| (set.id, set.code))
            .collect();

        let mut records = Vec::with_capacity(products.len());
        for product in products {
            let categories = categories_of(&self.db, product.id)
                .await?
                .into_iter()
                .map(|category| category.code)
                .collect();
            let attributes = values_of(&self.db, product.id)
                .await?
                .into_iter()
                .map(|resolved| AttributeRecord {
                    code: resolved.attribute.code,
                    store_view: Some(resolved.store_view.code),
                    value: resolved.value.to_json(),
                })
                .collect();

            records.push(ProductRecord {
                attribute_set: product
                    .attribute_set_id
                    .and_then(|id| set_codes.get(&id).cloned()),
                sku: product.sku,
                product_type: product.product_type,
                status: Some(product.status),
                assigned_to: product.assigned_to,
                categories,
                attributes,
            });
        }

        Ok(records)
    }
}
