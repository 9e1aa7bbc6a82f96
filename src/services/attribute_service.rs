use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;

use crate::database::entities::{
    attribute_group_attributes, attribute_set_attributes, attributes, product_attribute_values,
    DataType,
};
use crate::errors::{CatalogError, CatalogResult};
use crate::services::ValidationService;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttribute {
    pub code: String,
    pub label: String,
    pub data_type: DataType,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub is_filterable: bool,
    #[serde(default)]
    pub is_global: bool,
}

/// Mutable attribute fields. Code and data type are fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeUpdate {
    pub label: Option<String>,
    pub input_type: Option<String>,
    pub is_filterable: Option<bool>,
    pub is_global: Option<bool>,
}

/// Registry of admin-defined attributes.
#[derive(Clone)]
pub struct AttributeService {
    db: DatabaseConnection,
}

impl AttributeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewAttribute) -> CatalogResult<attributes::Model> {
        let code = ValidationService::validate_code("Attribute", &input.code)?;
        let label = ValidationService::validate_label("Attribute label", &input.label)?;

        if self.find_by_code(&code).await?.is_some() {
            return Err(CatalogError::duplicate_code("Attribute", code));
        }

        let input_type = input
            .input_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| input.data_type.default_input_type().to_string());

        let now = Utc::now();
        let attribute = attributes::ActiveModel {
            code: Set(code),
            label: Set(label),
            data_type: Set(input.data_type.as_str().to_string()),
            input_type: Set(input_type),
            is_filterable: Set(input.is_filterable),
            is_global: Set(input.is_global),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(
            "Created attribute {} ({}) with id {}",
            attribute.code, attribute.data_type, attribute.id
        );
        Ok(attribute)
    }

    pub async fn get(&self, id: i32) -> CatalogResult<attributes::Model> {
        attributes::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("Attribute", id))
    }

    pub async fn find_by_code(&self, code: &str) -> CatalogResult<Option<attributes::Model>> {
        Ok(attributes::Entity::find()
            .filter(attributes::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    /// All attributes ordered by code.
    pub async fn list(&self) -> CatalogResult<Vec<attributes::Model>> {
        Ok(attributes::Entity::find()
            .order_by_asc(attributes::Column::Code)
            .all(&self.db)
            .await?)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: AttributeUpdate,
    ) -> CatalogResult<attributes::Model> {
        let attribute = self.get(id).await?;
        let mut active: attributes::ActiveModel = attribute.into();

        if let Some(label) = changes.label {
            active.label = Set(ValidationService::validate_label("Attribute label", &label)?);
        }
        if let Some(input_type) = changes.input_type {
            active.input_type = Set(input_type);
        }
        if let Some(is_filterable) = changes.is_filterable {
            active.is_filterable = Set(is_filterable);
        }
        if let Some(is_global) = changes.is_global {
            active.is_global = Set(is_global);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Delete an attribute nothing references any more.
    pub async fn delete(&self, id: i32) -> CatalogResult<()> {
        let attribute = self.get(id).await?;

        let value_count = product_attribute_values::Entity::find()
            .filter(product_attribute_values::Column::AttributeId.eq(id))
            .count(&self.db)
            .await?;
        if value_count > 0 {
            return Err(CatalogError::Referenced {
                entity: "Attribute",
                id: attribute.code,
                reason: format!("{} product value(s) use it", value_count),
            });
        }

        let set_count = attribute_set_attributes::Entity::find()
            .filter(attribute_set_attributes::Column::AttributeId.eq(id))
            .count(&self.db)
            .await?;
        let group_count = attribute_group_attributes::Entity::find()
            .filter(attribute_group_attributes::Column::AttributeId.eq(id))
            .count(&self.db)
            .await?;
        if set_count + group_count > 0 {
            return Err(CatalogError::Referenced {
                entity: "Attribute",
                id: attribute.code,
                reason: format!(
                    "assigned to {} attribute set(s)",
                    set_count + group_count
                ),
            });
        }

        attributes::Entity::delete_by_id(id).exec(&self.db).await?;
        info!("Deleted attribute {}", attribute.code);
        Ok(())
    }
}
