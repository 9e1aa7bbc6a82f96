//! Attribute value tests
//!
//! Typed storage of values per (product, attribute, store view).

use anyhow::Result;
use pim::auth::Actor;
use pim::database::entities::{product_attribute_values, DataType};
use pim::database::{establish_connection, get_database_url, setup_database};
use pim::errors::CatalogError;
use pim::services::{
    AttributeService, AttributeValueService, NewAttribute, NewProduct, ProductService,
    StoreViewService,
};
use pim::values::AttributeValue;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::json;
use std::str::FromStr;

struct Fixture {
    db: DatabaseConnection,
    product_id: i32,
    default_view: i32,
    french_view: i32,
}

async fn setup_fixture() -> Result<Fixture> {
    let db = establish_connection(&get_database_url(Some(":memory:"))).await?;
    setup_database(&db).await?;

    let store_views = StoreViewService::new(db.clone());
    let default_view = store_views.ensure_default_scope("default", "en_US").await?;
    let french = store_views.create_locale("fr_FR", "French").await?;
    let french_view = store_views
        .create_store_view("france", "France", french.id)
        .await?;

    let product = ProductService::new(db.clone())
        .create(
            NewProduct {
                sku: "TSHIRT-1".to_string(),
                product_type: "simple".to_string(),
                status: None,
                attribute_set_id: None,
                assigned_to: None,
            },
            &Actor::system(),
        )
        .await?;

    Ok(Fixture {
        db,
        product_id: product.id,
        default_view: default_view.id,
        french_view: french_view.id,
    })
}

async fn create_attribute(db: &DatabaseConnection, code: &str, data_type: DataType) -> Result<i32> {
    let attribute = AttributeService::new(db.clone())
        .create(NewAttribute {
            code: code.to_string(),
            label: code.to_string(),
            data_type,
            input_type: None,
            is_filterable: false,
            is_global: false,
        })
        .await?;
    Ok(attribute.id)
}

#[tokio::test]
async fn test_type_mismatch_persists_nothing() -> Result<()> {
    let fixture = setup_fixture().await?;
    let qty = create_attribute(&fixture.db, "qty", DataType::Int).await?;
    let values = AttributeValueService::new(fixture.db.clone());

    let err = values
        .set_value(fixture.product_id, qty, fixture.default_view, &json!("twelve"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::TypeMismatch { .. }));
    assert_eq!(err.error_code(), "TYPE_MISMATCH");

    let rows = product_attribute_values::Entity::find()
        .count(&fixture.db)
        .await?;
    assert_eq!(rows, 0);
    Ok(())
}

#[tokio::test]
async fn test_values_are_coerced_to_the_attribute_type() -> Result<()> {
    let fixture = setup_fixture().await?;
    let db = &fixture.db;
    let qty = create_attribute(db, "qty", DataType::Int).await?;
    let price = create_attribute(db, "price", DataType::Decimal).await?;
    let active = create_attribute(db, "active", DataType::Boolean).await?;
    let values = AttributeValueService::new(db.clone());

    values
        .set_value(fixture.product_id, qty, fixture.default_view, &json!("12"))
        .await?;
    values
        .set_value(fixture.product_id, price, fixture.default_view, &json!("19.90"))
        .await?;
    values
        .set_value(fixture.product_id, active, fixture.default_view, &json!("yes"))
        .await?;

    assert_eq!(
        values
            .get_value(fixture.product_id, qty, fixture.default_view)
            .await?,
        Some(AttributeValue::Int(12))
    );
    assert_eq!(
        values
            .get_value(fixture.product_id, price, fixture.default_view)
            .await?,
        Some(AttributeValue::Decimal(Decimal::from_str("19.90")?))
    );
    assert_eq!(
        values
            .get_value(fixture.product_id, active, fixture.default_view)
            .await?,
        Some(AttributeValue::Boolean(true))
    );
    Ok(())
}

#[tokio::test]
async fn test_one_value_per_scope_last_write_wins() -> Result<()> {
    let fixture = setup_fixture().await?;
    let name = create_attribute(&fixture.db, "name", DataType::String).await?;
    let values = AttributeValueService::new(fixture.db.clone());

    for label in ["first", "second", "final"] {
        values
            .set_value(fixture.product_id, name, fixture.default_view, &json!(label))
            .await?;
    }
    values
        .set_value(fixture.product_id, name, fixture.french_view, &json!("finale"))
        .await?;

    let listed = values.list_for_product(fixture.product_id).await?;
    let scoped: Vec<_> = listed
        .iter()
        .map(|v| (v.store_view.code.as_str(), v.value.clone()))
        .collect();
    assert_eq!(
        scoped,
        vec![
            ("default", AttributeValue::String("final".to_string())),
            ("france", AttributeValue::String("finale".to_string())),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_clear_value_reports_whether_anything_was_removed() -> Result<()> {
    let fixture = setup_fixture().await?;
    let name = create_attribute(&fixture.db, "name", DataType::String).await?;
    let values = AttributeValueService::new(fixture.db.clone());

    values
        .set_value(fixture.product_id, name, fixture.default_view, &json!("shirt"))
        .await?;

    assert!(
        values
            .clear_value(fixture.product_id, name, fixture.default_view)
            .await?
    );
    assert!(
        !values
            .clear_value(fixture.product_id, name, fixture.default_view)
            .await?
    );
    assert!(values.list_for_product(fixture.product_id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unknown_scope_is_not_found() -> Result<()> {
    let fixture = setup_fixture().await?;
    let name = create_attribute(&fixture.db, "name", DataType::String).await?;
    let values = AttributeValueService::new(fixture.db.clone());

    let err = values
        .set_value(fixture.product_id, name, 9999, &json!("shirt"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = values
        .set_value(9999, name, fixture.default_view, &json!("shirt"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}
