//! Import/export pipeline tests
//!
//! Round trips through every transfer format, per-row failure isolation
//! and the import size cap.

use anyhow::Result;
use pim::auth::Actor;
use pim::database::entities::{DataType, ProductStatus};
use pim::database::{establish_connection, get_database_url, setup_database};
use pim::errors::ImportExportError;
use pim::services::{
    AttributeService, AttributeValueService, ExportService, ImportOptions, ImportService,
    NewAttribute, ProductFilters, ProductService, StoreViewService,
};
use pim::transfer::TransferFormat;
use pim::values::AttributeValue;
use sea_orm::DatabaseConnection;

async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = establish_connection(&get_database_url(Some(":memory:"))).await?;
    setup_database(&db).await?;
    StoreViewService::new(db.clone())
        .ensure_default_scope("default", "en_US")
        .await?;

    let attributes = AttributeService::new(db.clone());
    for (code, data_type) in [
        ("color", DataType::String),
        ("qty", DataType::Int),
        ("weight", DataType::Decimal),
    ] {
        attributes
            .create(NewAttribute {
                code: code.to_string(),
                label: code.to_string(),
                data_type,
                input_type: None,
                is_filterable: false,
                is_global: false,
            })
            .await?;
    }
    ProductService::new(db.clone())
        .create_category("shirts", "Shirts", None)
        .await?;

    Ok(db)
}

fn importer(db: &DatabaseConnection) -> ImportService {
    ImportService::new(db.clone(), ImportOptions::default())
}

const SEED_JSON: &str = r#"[
  {
    "sku": "SHIRT-1",
    "type": "simple",
    "status": "ENRICHMENT",
    "categories": ["shirts"],
    "attributes": [
      {"code": "color", "value": "red"},
      {"code": "qty", "value": 5},
      {"code": "weight", "storeView": "default", "value": "0.250"}
    ]
  },
  {
    "sku": "SHIRT-2",
    "type": "simple",
    "attributes": [{"code": "color", "value": "blue"}]
  }
]"#;

#[tokio::test]
async fn test_json_import_creates_products() -> Result<()> {
    let db = setup_test_db().await?;

    let result = importer(&db)
        .import(SEED_JSON.as_bytes(), TransferFormat::Json, &Actor::user(3))
        .await?;
    assert_eq!(result.summary.total, 2);
    assert_eq!(result.summary.created, 2);
    assert_eq!(result.summary.failed, 0);

    let products = ProductService::new(db.clone());
    let shirt = products
        .find_by_sku("SHIRT-1")
        .await?
        .expect("SHIRT-1 imported");
    assert_eq!(shirt.status(), Some(ProductStatus::Enrichment));
    assert_eq!(products.categories_for_product(shirt.id).await?.len(), 1);
    assert_eq!(products.history(shirt.id).await?[0].changed_by_id, Some(3));

    let values = AttributeValueService::new(db).list_for_product(shirt.id).await?;
    let qty = values
        .iter()
        .find(|v| v.attribute.code == "qty")
        .expect("qty imported");
    assert_eq!(qty.value, AttributeValue::Int(5));
    Ok(())
}

#[tokio::test]
async fn test_export_then_import_updates_in_place() -> Result<()> {
    for format in [
        TransferFormat::Json,
        TransferFormat::Xml,
        TransferFormat::Csv,
        TransferFormat::Yaml,
    ] {
        let db = setup_test_db().await?;
        importer(&db)
            .import(SEED_JSON.as_bytes(), TransferFormat::Json, &Actor::system())
            .await?;

        let exported = ExportService::new(db.clone())
            .export(format, &ProductFilters::default())
            .await?;
        let result = importer(&db)
            .import(&exported, format, &Actor::system())
            .await?;

        assert_eq!(result.summary.total, 2, "{}", format);
        assert_eq!(result.summary.created, 0, "{}", format);
        assert_eq!(result.summary.updated, 2, "{}", format);
        assert_eq!(result.summary.failed, 0, "{}: {:?}", format, result.summary.errors);
        // nothing differs, so every row is a no-op
        assert_eq!(result.summary.skipped, 2, "{}", format);
    }
    Ok(())
}

#[tokio::test]
async fn test_reimport_is_idempotent() -> Result<()> {
    let db = setup_test_db().await?;
    importer(&db)
        .import(SEED_JSON.as_bytes(), TransferFormat::Json, &Actor::system())
        .await?;

    let products = ProductService::new(db.clone());
    let shirt = products.find_by_sku("SHIRT-1").await?.expect("imported");
    let history_before = products.history(shirt.id).await?.len();

    let again = importer(&db)
        .import(SEED_JSON.as_bytes(), TransferFormat::Json, &Actor::system())
        .await?;
    assert_eq!(again.summary.successful - again.summary.skipped, 0);
    assert_eq!(products.history(shirt.id).await?.len(), history_before);
    Ok(())
}

#[tokio::test]
async fn test_decimal_scale_change_is_written() -> Result<()> {
    let db = setup_test_db().await?;
    let with_scale = |weight: &str| {
        format!(
            r#"[{{"sku": "DEC-1", "type": "simple",
                 "attributes": [{{"code": "weight", "value": "{}"}}]}}]"#,
            weight
        )
    };

    importer(&db)
        .import(with_scale("0.250").as_bytes(), TransferFormat::Json, &Actor::system())
        .await?;
    let result = importer(&db)
        .import(with_scale("0.25").as_bytes(), TransferFormat::Json, &Actor::system())
        .await?;

    assert_eq!(result.summary.updated, 1);
    assert_eq!(result.summary.skipped, 0);

    let product = ProductService::new(db.clone())
        .find_by_sku("DEC-1")
        .await?
        .expect("DEC-1 imported");
    let values = AttributeValueService::new(db).list_for_product(product.id).await?;
    assert_eq!(values[0].value.to_text(), "0.25");
    Ok(())
}

#[tokio::test]
async fn test_malformed_csv_row_fails_alone() -> Result<()> {
    let db = setup_test_db().await?;
    let csv = "sku,type,qty@default\n\
               CSV-1,simple,1\n\
               CSV-2,simple,2,unexpected\n\
               CSV-3,simple,3\n";

    let result = importer(&db)
        .import(csv.as_bytes(), TransferFormat::Csv, &Actor::system())
        .await?;

    assert_eq!(result.summary.total, 3);
    assert_eq!(result.summary.successful, 2);
    assert_eq!(result.summary.failed, 1);
    assert_eq!(result.summary.skipped, 0);
    assert_eq!(result.summary.errors[0].row, 2);
    assert_eq!(result.summary.errors[0].kind, "PARSE_ERROR");
    assert_eq!(result.summary.errors[0].sku.as_deref(), Some("CSV-2"));

    let products = ProductService::new(db);
    assert!(products.find_by_sku("CSV-2").await?.is_none());
    assert!(products.find_by_sku("CSV-3").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_invalid_rows_are_reported_per_field() -> Result<()> {
    let db = setup_test_db().await?;
    let json = r#"[
      {"sku": "OK-1", "type": "simple"},
      {"sku": "BAD-1", "type": "simple", "status": "ARCHIVED",
       "categories": ["nope"],
       "attributes": [{"code": "qty", "value": "many"}]}
    ]"#;

    let result = importer(&db)
        .import(json.as_bytes(), TransferFormat::Json, &Actor::system())
        .await?;

    assert_eq!(result.summary.successful, 1);
    assert_eq!(result.summary.failed, 1);
    assert_eq!(result.summary.errors[0].kind, "VALIDATION_ERROR");
    let fields: Vec<_> = result
        .validation_errors
        .iter()
        .map(|issue| issue.field.as_str())
        .collect();
    assert_eq!(fields, vec!["status", "categories", "attributes.qty"]);
    assert!(ProductService::new(db)
        .find_by_sku("BAD-1")
        .await?
        .is_none());
    Ok(())
}

#[tokio::test]
async fn test_import_size_cap_is_inclusive() -> Result<()> {
    let db = setup_test_db().await?;
    let bytes = SEED_JSON.as_bytes();

    let at_limit = ImportService::new(
        db.clone(),
        ImportOptions {
            max_import_bytes: bytes.len(),
            ..ImportOptions::default()
        },
    );
    assert!(at_limit.import(bytes, TransferFormat::Json, &Actor::system()).await.is_ok());

    let below = ImportService::new(
        db,
        ImportOptions {
            max_import_bytes: bytes.len() - 1,
            ..ImportOptions::default()
        },
    );
    let err = below
        .import(bytes, TransferFormat::Json, &Actor::system())
        .await
        .unwrap_err();
    assert!(matches!(err, ImportExportError::FileTooLarge { .. }));
    Ok(())
}

#[tokio::test]
async fn test_broken_document_fails_as_a_whole() -> Result<()> {
    let db = setup_test_db().await?;
    let err = importer(&db)
        .import(b"<products><product>", TransferFormat::Xml, &Actor::system())
        .await
        .unwrap_err();
    assert!(matches!(err, ImportExportError::ParseError(_)));
    assert!(ProductService::new(db)
        .list(&ProductFilters::default())
        .await?
        .is_empty());
    Ok(())
}
