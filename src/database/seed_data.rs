use sea_orm::*;
use tracing::info;

use crate::database::entities::{locales, store_views};

/// Make sure the default locale and store view exist.
///
/// Import rows without an explicit store view resolve against the store
/// view created here. Returns the store view.
pub async fn ensure_default_scope(
    db: &DatabaseConnection,
    store_view_code: &str,
    locale_code: &str,
) -> Result<store_views::Model, DbErr> {
    let locale = match locales::Entity::find()
        .filter(locales::Column::Code.eq(locale_code))
        .one(db)
        .await?
    {
        Some(locale) => locale,
        None => {
            info!("Creating default locale: {}", locale_code);
            locales::ActiveModel {
                code: Set(locale_code.to_string()),
                name: Set(locale_code.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    if let Some(existing) = store_views::Entity::find()
        .filter(store_views::Column::Code.eq(store_view_code))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    info!("Creating default store view: {}", store_view_code);
    store_views::ActiveModel {
        code: Set(store_view_code.to_string()),
        name: Set("Default Store View".to_string()),
        locale_id: Set(locale.id),
        ..Default::default()
    }
    .insert(db)
    .await
}
