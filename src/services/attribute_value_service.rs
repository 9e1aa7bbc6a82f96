use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::database::entities::{attributes, product_attribute_values, products, store_views};
use crate::errors::{CatalogError, CatalogResult};
use crate::values::{AttributeValue, ValueColumns};

/// A stored value together with the attribute and store view it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedValue {
    pub attribute: attributes::Model,
    pub store_view: store_views::Model,
    pub value: AttributeValue,
}

/// Typed attribute values of products, one per (attribute, store view).
#[derive(Clone)]
pub struct AttributeValueService {
    db: DatabaseConnection,
}

impl AttributeValueService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Coerce `raw` to the attribute's type and store it for the scope.
    ///
    /// Nothing is written when the value does not coerce.
    pub async fn set_value(
        &self,
        product_id: i32,
        attribute_id: i32,
        store_view_id: i32,
        raw: &Value,
    ) -> CatalogResult<ResolvedValue> {
        products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", product_id))?;
        let attribute = find_attribute(&self.db, attribute_id).await?;
        let store_view = store_views::Entity::find_by_id(store_view_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("StoreView", store_view_id))?;

        let value = coerce_for(&attribute, raw)?;
        upsert_value(&self.db, product_id, attribute.id, store_view.id, &value).await?;

        info!("Set {}@{} on product {}", attribute.code, store_view.code, product_id);
        Ok(ResolvedValue {
            attribute,
            store_view,
            value,
        })
    }

    /// `None` means no value is set for that scope.
    pub async fn get_value(
        &self,
        product_id: i32,
        attribute_id: i32,
        store_view_id: i32,
    ) -> CatalogResult<Option<AttributeValue>> {
        let attribute = find_attribute(&self.db, attribute_id).await?;
        let row = product_attribute_values::Entity::find()
            .filter(product_attribute_values::Column::ProductId.eq(product_id))
            .filter(product_attribute_values::Column::AttributeId.eq(attribute_id))
            .filter(product_attribute_values::Column::StoreViewId.eq(store_view_id))
            .one(&self.db)
            .await?;

        row.map(|row| read_value(&attribute, &row)).transpose()
    }

    /// Every value of a product, ordered by attribute code then store view code.
    pub async fn list_for_product(&self, product_id: i32) -> CatalogResult<Vec<ResolvedValue>> {
        products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", product_id))?;
        values_of(&self.db, product_id).await
    }

    /// Returns whether a value was removed.
    pub async fn clear_value(
        &self,
        product_id: i32,
        attribute_id: i32,
        store_view_id: i32,
    ) -> CatalogResult<bool> {
        let result = product_attribute_values::Entity::delete_many()
            .filter(product_attribute_values::Column::ProductId.eq(product_id))
            .filter(product_attribute_values::Column::AttributeId.eq(attribute_id))
            .filter(product_attribute_values::Column::StoreViewId.eq(store_view_id))
            .exec(&self.db)
            .await?;

        debug!(
            "Cleared attribute {} in store view {} on product {}: {} row(s)",
            attribute_id, store_view_id, product_id, result.rows_affected
        );
        Ok(result.rows_affected > 0)
    }
}

async fn find_attribute<C: ConnectionTrait>(
    conn: &C,
    attribute_id: i32,
) -> CatalogResult<attributes::Model> {
    attributes::Entity::find_by_id(attribute_id)
        .one(conn)
        .await?
        .ok_or_else(|| CatalogError::not_found("Attribute", attribute_id))
}

/// Coerce a raw value against a stored attribute definition.
pub(crate) fn coerce_for(
    attribute: &attributes::Model,
    raw: &Value,
) -> CatalogResult<AttributeValue> {
    let data_type = attribute.data_type().ok_or_else(|| {
        CatalogError::Validation(format!(
            "Attribute '{}' has unknown data type '{}'",
            attribute.code, attribute.data_type
        ))
    })?;
    AttributeValue::coerce(&attribute.code, data_type, raw)
}

fn read_value(
    attribute: &attributes::Model,
    row: &product_attribute_values::Model,
) -> CatalogResult<AttributeValue> {
    let data_type = attribute.data_type().ok_or_else(|| {
        CatalogError::Validation(format!(
            "Attribute '{}' has unknown data type '{}'",
            attribute.code, attribute.data_type
        ))
    })?;
    ValueColumns::from(row).into_value(&attribute.code, data_type)
}

/// Insert or replace the value for one scope, clearing the other columns.
pub(crate) async fn upsert_value<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
    attribute_id: i32,
    store_view_id: i32,
    value: &AttributeValue,
) -> CatalogResult<product_attribute_values::Model> {
    let existing = product_attribute_values::Entity::find()
        .filter(product_attribute_values::Column::ProductId.eq(product_id))
        .filter(product_attribute_values::Column::AttributeId.eq(attribute_id))
        .filter(product_attribute_values::Column::StoreViewId.eq(store_view_id))
        .one(conn)
        .await?;

    let columns = ValueColumns::from(value);
    let model = match existing {
        Some(row) => {
            let mut active: product_attribute_values::ActiveModel = row.into();
            columns.apply(&mut active);
            active.update(conn).await?
        }
        None => {
            let mut active = product_attribute_values::ActiveModel {
                product_id: Set(product_id),
                attribute_id: Set(attribute_id),
                store_view_id: Set(store_view_id),
                ..Default::default()
            };
            columns.apply(&mut active);
            active.insert(conn).await?
        }
    };

    Ok(model)
}

/// All resolved values of a product in (attribute code, store view code) order.
pub(crate) async fn values_of<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
) -> CatalogResult<Vec<ResolvedValue>> {
    let rows = product_attribute_values::Entity::find()
        .filter(product_attribute_values::Column::ProductId.eq(product_id))
        .all(conn)
        .await?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let attribute_ids: Vec<i32> = rows.iter().map(|row| row.attribute_id).collect();
    let store_view_ids: Vec<i32> = rows.iter().map(|row| row.store_view_id).collect();

    let attributes_by_id: HashMap<i32, attributes::Model> = attributes::Entity::find()
        .filter(attributes::Column::Id.is_in(attribute_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|attribute| (attribute.id, attribute))
        .collect();
    let store_views_by_id: HashMap<i32, store_views::Model> = store_views::Entity::find()
        .filter(store_views::Column::Id.is_in(store_view_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|store_view| (store_view.id, store_view))
        .collect();

    let mut resolved = Vec::with_capacity(rows.len());
    for row in rows {
        let attribute = attributes_by_id
            .get(&row.attribute_id)
            .ok_or_else(|| CatalogError::not_found("Attribute", row.attribute_id))?;
        let store_view = store_views_by_id
            .get(&row.store_view_id)
            .ok_or_else(|| CatalogError::not_found("StoreView", row.store_view_id))?;

        resolved.push(ResolvedValue {
            value: read_value(attribute, &row)?,
            attribute: attribute.clone(),
            store_view: store_view.clone(),
        });
    }

    resolved.sort_by(|a, b| {
        a.attribute
            .code
            .cmp(&b.attribute.code)
            .then_with(|| a.store_view.code.cmp(&b.store_view.code))
    });
    Ok(resolved)
}
