use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::database::entities::{locales, store_views};
use crate::database::seed_data;
use crate::errors::{CatalogError, CatalogResult};
use crate::services::ValidationService;

/// Locales and the store views that scope attribute values.
#[derive(Clone)]
pub struct StoreViewService {
    db: DatabaseConnection,
}

impl StoreViewService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_locale(&self, code: &str, name: &str) -> CatalogResult<locales::Model> {
        let code = ValidationService::validate_locale_code(code)?;
        let name = ValidationService::validate_label("Locale name", name)?;

        let existing = locales::Entity::find()
            .filter(locales::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::duplicate_code("Locale", code));
        }

        let locale = locales::ActiveModel {
            code: Set(code),
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created locale {}", locale.code);
        Ok(locale)
    }

    pub async fn list_locales(&self) -> CatalogResult<Vec<locales::Model>> {
        Ok(locales::Entity::find()
            .order_by_asc(locales::Column::Code)
            .all(&self.db)
            .await?)
    }

    pub async fn create_store_view(
        &self,
        code: &str,
        name: &str,
        locale_id: i32,
    ) -> CatalogResult<store_views::Model> {
        let code = ValidationService::validate_code("Store view", code)?;
        let name = ValidationService::validate_label("Store view name", name)?;

        locales::Entity::find_by_id(locale_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("Locale", locale_id))?;

        if self.find_store_view_by_code(&code).await?.is_some() {
            return Err(CatalogError::duplicate_code("StoreView", code));
        }

        let store_view = store_views::ActiveModel {
            code: Set(code),
            name: Set(name),
            locale_id: Set(locale_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created store view {} with id {}", store_view.code, store_view.id);
        Ok(store_view)
    }

    pub async fn list_store_views(&self) -> CatalogResult<Vec<store_views::Model>> {
        Ok(store_views::Entity::find()
            .order_by_asc(store_views::Column::Code)
            .all(&self.db)
            .await?)
    }

    pub async fn get_store_view(&self, id: i32) -> CatalogResult<store_views::Model> {
        store_views::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("StoreView", id))
    }

    pub async fn find_store_view_by_code(
        &self,
        code: &str,
    ) -> CatalogResult<Option<store_views::Model>> {
        Ok(store_views::Entity::find()
            .filter(store_views::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    /// Create the default locale and store view if they are missing.
    pub async fn ensure_default_scope(
        &self,
        store_view_code: &str,
        locale_code: &str,
    ) -> CatalogResult<store_views::Model> {
        Ok(seed_data::ensure_default_scope(&self.db, store_view_code, locale_code).await?)
    }
}
