use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::Actor;
use crate::database::entities::{
    attribute_sets, categories, product_attribute_values, product_categories, products,
    workflow_history, ProductStatus,
};
use crate::errors::{CatalogError, CatalogResult};
use crate::services::ValidationService;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub attribute_set_id: Option<i32>,
    #[serde(default)]
    pub assigned_to: Option<i32>,
}

/// Product fields that can change outside of workflow transitions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default, rename = "type")]
    pub product_type: Option<String>,
    pub attribute_set_id: Option<i32>,
    pub assigned_to: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    /// Case-insensitive SKU substring.
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub status: Option<ProductStatus>,
    pub category_id: Option<i32>,
    pub assigned_to: Option<i32>,
}

/// Products, their categories and their workflow history.
#[derive(Clone)]
pub struct ProductService {
    db: DatabaseConnection,
}

impl ProductService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewProduct, actor: &Actor) -> CatalogResult<products::Model> {
        let sku = ValidationService::validate_sku(&input.sku)?;
        let product_type = ValidationService::validate_label("Product type", &input.product_type)?;

        if self.find_by_sku(&sku).await?.is_some() {
            return Err(CatalogError::duplicate_code("Product", sku));
        }
        if let Some(set_id) = input.attribute_set_id {
            attribute_sets::Entity::find_by_id(set_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| CatalogError::not_found("AttributeSet", set_id))?;
        }

        let status = input.status.unwrap_or_default();
        let txn = self.db.begin().await?;
        let product = insert_product(
            &txn,
            &sku,
            &product_type,
            status,
            input.attribute_set_id,
            input.assigned_to,
            actor,
        )
        .await?;
        txn.commit().await?;

        info!("Created product {} with id {}", product.sku, product.id);
        Ok(product)
    }

    pub async fn get(&self, id: i32) -> CatalogResult<products::Model> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))
    }

    pub async fn find_by_sku(&self, sku: &str) -> CatalogResult<Option<products::Model>> {
        Ok(products::Entity::find()
            .filter(products::Column::Sku.eq(sku))
            .one(&self.db)
            .await?)
    }

    pub async fn update(&self, id: i32, changes: ProductUpdate) -> CatalogResult<products::Model> {
        let product = self.get(id).await?;
        let mut active: products::ActiveModel = product.into();

        if let Some(product_type) = changes.product_type {
            active.product_type = Set(ValidationService::validate_label(
                "Product type",
                &product_type,
            )?);
        }
        if let Some(set_id) = changes.attribute_set_id {
            attribute_sets::Entity::find_by_id(set_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| CatalogError::not_found("AttributeSet", set_id))?;
            active.attribute_set_id = Set(Some(set_id));
        }
        if let Some(assigned_to) = changes.assigned_to {
            active.assigned_to = Set(Some(assigned_to));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Delete a product together with its values, category links and history.
    pub async fn delete(&self, id: i32) -> CatalogResult<()> {
        let product = self.get(id).await?;

        let txn = self.db.begin().await?;
        product_attribute_values::Entity::delete_many()
            .filter(product_attribute_values::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        product_categories::Entity::delete_many()
            .filter(product_categories::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        workflow_history::Entity::delete_many()
            .filter(workflow_history::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        products::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!("Deleted product {}", product.sku);
        Ok(())
    }

    /// Products matching every given filter, ordered by id.
    pub async fn list(&self, filters: &ProductFilters) -> CatalogResult<Vec<products::Model>> {
        let mut query = products::Entity::find();

        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(products::Column::Sku.contains(search));
        }
        if let Some(product_type) = &filters.product_type {
            query = query.filter(products::Column::ProductType.eq(product_type.as_str()));
        }
        if let Some(status) = filters.status {
            query = query.filter(products::Column::Status.eq(status.as_str()));
        }
        if let Some(assigned_to) = filters.assigned_to {
            query = query.filter(products::Column::AssignedTo.eq(assigned_to));
        }
        if let Some(category_id) = filters.category_id {
            let product_ids: Vec<i32> = product_categories::Entity::find()
                .filter(product_categories::Column::CategoryId.eq(category_id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|link| link.product_id)
                .collect();
            query = query.filter(products::Column::Id.is_in(product_ids));
        }

        Ok(query
            .order_by_asc(products::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Move a product to `to_status` and record the transition.
    pub async fn transition(
        &self,
        product_id: i32,
        to_status: ProductStatus,
        actor: &Actor,
        notes: Option<String>,
    ) -> CatalogResult<workflow_history::Model> {
        let product = self.get(product_id).await?;
        let from_status = product.status();

        if from_status == Some(to_status) {
            return Err(CatalogError::Validation(format!(
                "Product {} is already in status {}",
                product.sku, to_status
            )));
        }

        let txn = self.db.begin().await?;
        let entry = set_status(&txn, product, to_status, actor, notes).await?;
        txn.commit().await?;

        Ok(entry)
    }

    /// Workflow history, oldest first.
    pub async fn history(&self, product_id: i32) -> CatalogResult<Vec<workflow_history::Model>> {
        self.get(product_id).await?;
        Ok(workflow_history::Entity::find()
            .filter(workflow_history::Column::ProductId.eq(product_id))
            .order_by_asc(workflow_history::Column::CreatedAt)
            .order_by_asc(workflow_history::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn create_category(
        &self,
        code: &str,
        name: &str,
        parent_id: Option<i32>,
    ) -> CatalogResult<categories::Model> {
        let code = ValidationService::validate_code("Category", code)?;
        let name = ValidationService::validate_label("Category name", name)?;

        if self.find_category_by_code(&code).await?.is_some() {
            return Err(CatalogError::duplicate_code("Category", code));
        }
        if let Some(parent_id) = parent_id {
            self.get_category(parent_id).await?;
        }

        let category = categories::ActiveModel {
            code: Set(code),
            name: Set(name),
            parent_id: Set(parent_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created category {} with id {}", category.code, category.id);
        Ok(category)
    }

    pub async fn get_category(&self, id: i32) -> CatalogResult<categories::Model> {
        categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("Category", id))
    }

    pub async fn find_category_by_code(
        &self,
        code: &str,
    ) -> CatalogResult<Option<categories::Model>> {
        Ok(categories::Entity::find()
            .filter(categories::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<categories::Model>> {
        Ok(categories::Entity::find()
            .order_by_asc(categories::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Link a product to a category. Linking twice is a no-op.
    pub async fn assign_category(&self, product_id: i32, category_id: i32) -> CatalogResult<()> {
        self.get(product_id).await?;
        self.get_category(category_id).await?;
        link_category(&self.db, product_id, category_id).await?;
        Ok(())
    }

    /// Returns whether a link was removed.
    pub async fn unassign_category(
        &self,
        product_id: i32,
        category_id: i32,
    ) -> CatalogResult<bool> {
        let result = product_categories::Entity::delete_many()
            .filter(product_categories::Column::ProductId.eq(product_id))
            .filter(product_categories::Column::CategoryId.eq(category_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Categories of a product, ordered by code.
    pub async fn categories_for_product(
        &self,
        product_id: i32,
    ) -> CatalogResult<Vec<categories::Model>> {
        self.get(product_id).await?;
        categories_of(&self.db, product_id).await
    }
}

pub(crate) async fn insert_product<C: ConnectionTrait>(
    conn: &C,
    sku: &str,
    product_type: &str,
    status: ProductStatus,
    attribute_set_id: Option<i32>,
    assigned_to: Option<i32>,
    actor: &Actor,
) -> CatalogResult<products::Model> {
    let now = Utc::now();
    let product = products::ActiveModel {
        sku: Set(sku.to_string()),
        product_type: Set(product_type.to_string()),
        status: Set(status.as_str().to_string()),
        attribute_set_id: Set(attribute_set_id),
        assigned_to: Set(assigned_to),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    append_history(conn, product.id, None, status, actor, None).await?;
    Ok(product)
}

/// Update the status column and append the matching history entry.
pub(crate) async fn set_status<C: ConnectionTrait>(
    conn: &C,
    product: products::Model,
    to_status: ProductStatus,
    actor: &Actor,
    notes: Option<String>,
) -> CatalogResult<workflow_history::Model> {
    let from_status = product.status();
    let product_id = product.id;
    let sku = product.sku.clone();

    let mut active: products::ActiveModel = product.into();
    active.status = Set(to_status.as_str().to_string());
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;

    let entry = append_history(conn, product_id, from_status, to_status, actor, notes).await?;
    info!(
        "Product {} moved from {} to {}",
        sku,
        from_status.map(|s| s.as_str()).unwrap_or("-"),
        to_status
    );
    Ok(entry)
}

async fn append_history<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
    from_status: Option<ProductStatus>,
    to_status: ProductStatus,
    actor: &Actor,
    notes: Option<String>,
) -> CatalogResult<workflow_history::Model> {
    Ok(workflow_history::ActiveModel {
        product_id: Set(product_id),
        from_status: Set(from_status.map(|s| s.as_str().to_string())),
        to_status: Set(to_status.as_str().to_string()),
        changed_by_id: Set(actor.user_id),
        notes: Set(notes),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

/// Returns true when a new link was written.
pub(crate) async fn link_category<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
    category_id: i32,
) -> CatalogResult<bool> {
    let existing = product_categories::Entity::find()
        .filter(product_categories::Column::ProductId.eq(product_id))
        .filter(product_categories::Column::CategoryId.eq(category_id))
        .one(conn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    product_categories::ActiveModel {
        product_id: Set(product_id),
        category_id: Set(category_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(true)
}

pub(crate) async fn categories_of<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
) -> CatalogResult<Vec<categories::Model>> {
    let category_ids: Vec<i32> = product_categories::Entity::find()
        .filter(product_categories::Column::ProductId.eq(product_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|link| link.category_id)
        .collect();
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(categories::Entity::find()
        .filter(categories::Column::Id.is_in(category_ids))
        .order_by_asc(categories::Column::Code)
        .all(conn)
        .await?)
}
