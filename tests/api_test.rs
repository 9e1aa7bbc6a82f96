//! API integration tests
//!
//! Tests for the REST endpoints, error envelope and the bulk transfer routes

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use pim::config::PimConfig;
use pim::database::{establish_connection, get_database_url, setup_database};
use pim::server::app::create_app;
use pim::services::StoreViewService;
use serde_json::{json, Value};

/// Create a test server over an in-memory database with the default scope.
async fn setup_test_server(config: PimConfig) -> Result<(TestServer, i32)> {
    let db = establish_connection(&get_database_url(Some(":memory:"))).await?;
    setup_database(&db).await?;
    let store_view = StoreViewService::new(db.clone())
        .ensure_default_scope(&config.default_store_view, &config.default_locale)
        .await?;

    let app = create_app(db, config).await?;
    let server = TestServer::new(app)?;

    Ok((server, store_view.id))
}

async fn create_product(server: &TestServer, sku: &str) -> i64 {
    let response = server
        .post("/api/v1/products")
        .json(&json!({ "sku": sku, "type": "simple" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _) = setup_test_server(PimConfig::default()).await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["service"], "pim-server");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_attributes_crud_api() -> Result<()> {
    let (server, _) = setup_test_server(PimConfig::default()).await?;

    let response = server
        .post("/api/v1/attributes")
        .json(&json!({ "code": "color", "label": "Color", "dataType": "string" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["code"], "color");

    let response = server
        .post("/api/v1/attributes")
        .json(&json!({ "code": "color", "label": "Again", "dataType": "text" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "DUPLICATE_CODE");

    let response = server
        .put(&format!("/api/v1/attributes/{}", id))
        .json(&json!({ "label": "Colour" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["label"], "Colour");

    let response = server.get("/api/v1/attributes").await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = server.delete(&format!("/api/v1/attributes/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/v1/attributes/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_attribute_set_layout_api() -> Result<()> {
    let (server, _) = setup_test_server(PimConfig::default()).await?;

    let set_id = server
        .post("/api/v1/attribute-sets")
        .json(&json!({ "code": "apparel", "label": "Apparel" }))
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();

    let mut ids = Vec::new();
    for code in ["color", "size"] {
        let id = server
            .post("/api/v1/attributes")
            .json(&json!({ "code": code, "label": code, "dataType": "string" }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();
        let response = server
            .post(&format!("/api/v1/attribute-sets/{}/attributes", set_id))
            .json(&json!({ "attributeId": id }))
            .await;
        assert!(response.status_code().is_success());
        ids.push(id);
    }

    let response = server
        .post(&format!("/api/v1/attribute-sets/{}/attributes", set_id))
        .json(&json!({ "attributeId": ids[0] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = server
        .put(&format!("/api/v1/attribute-sets/{}/order", set_id))
        .json(&json!({ "attributeIds": [ids[1]] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INCOMPLETE_SET");

    let response = server
        .put(&format!("/api/v1/attribute-sets/{}/order", set_id))
        .json(&json!({ "attributeIds": [ids[1], ids[0]] }))
        .await;
    assert!(response.status_code().is_success());

    let layout: Value = server
        .get(&format!("/api/v1/attribute-sets/{}/layout", set_id))
        .await
        .json();
    assert_eq!(layout["ungrouped"][0]["attribute"]["code"], "size");
    assert_eq!(layout["ungrouped"][1]["attribute"]["code"], "color");

    Ok(())
}

#[tokio::test]
async fn test_product_values_and_workflow_api() -> Result<()> {
    let (server, store_view_id) = setup_test_server(PimConfig::default()).await?;

    let attribute_id = server
        .post("/api/v1/attributes")
        .json(&json!({ "code": "qty", "label": "Quantity", "dataType": "int" }))
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();
    let product_id = create_product(&server, "API-1").await;
    let value_path = format!(
        "/api/v1/products/{}/values/{}/{}",
        product_id, attribute_id, store_view_id
    );

    let response = server.put(&value_path).json(&json!({ "value": "ten" })).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["error"]["code"], "TYPE_MISMATCH");

    let response = server.put(&value_path).json(&json!({ "value": "10" })).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["value"], 10);

    let values: Vec<Value> = server
        .get(&format!("/api/v1/products/{}/values", product_id))
        .await
        .json();
    assert_eq!(values.len(), 1);

    let response = server
        .post(&format!("/api/v1/products/{}/transitions", product_id))
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static("42"),
        )
        .json(&json!({ "status": "ENRICHMENT", "notes": "ready" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let entry: Value = response.json();
    assert_eq!(entry["fromStatus"], "DRAFT");
    assert_eq!(entry["changedById"], 42);

    let response = server
        .post(&format!("/api/v1/products/{}/transitions", product_id))
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static("nobody"),
        )
        .json(&json!({ "status": "APPROVAL" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_USER");

    let history: Vec<Value> = server
        .get(&format!("/api/v1/products/{}/history", product_id))
        .await
        .json();
    assert_eq!(history.len(), 2);

    let response = server.delete(&value_path).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    let response = server.delete(&value_path).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_product_filters_api() -> Result<()> {
    let (server, _) = setup_test_server(PimConfig::default()).await?;

    let category_id = server
        .post("/api/v1/categories")
        .json(&json!({ "code": "shirts", "name": "Shirts" }))
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();
    let shirt = create_product(&server, "SHIRT-1").await;
    create_product(&server, "HAT-1").await;

    let response = server
        .put(&format!("/api/v1/products/{}/categories/{}", shirt, category_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let found: Vec<Value> = server
        .get("/api/v1/products")
        .add_query_param("search", "shirt")
        .await
        .json();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["sku"], "SHIRT-1");

    let found: Vec<Value> = server
        .get("/api/v1/products")
        .add_query_param("categoryId", category_id)
        .await
        .json();
    assert_eq!(found.len(), 1);

    let found: Vec<Value> = server
        .get("/api/v1/products")
        .add_query_param("status", "DRAFT")
        .await
        .json();
    assert_eq!(found.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_import_and_export_api() -> Result<()> {
    let (server, _) = setup_test_server(PimConfig::default()).await?;
    server
        .post("/api/v1/attributes")
        .json(&json!({ "code": "color", "label": "Color", "dataType": "string" }))
        .await;

    let csv = "sku,type,color\nCSV-1,simple,red\nCSV-2,simple,blue\n";
    let response = server
        .post("/api/v1/import")
        .add_query_param("format", "csv")
        .text(csv)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let result: Value = response.json();
    assert_eq!(result["summary"]["created"], 2);
    assert_eq!(result["summary"]["failed"], 0);

    let response = server
        .get("/api/v1/export")
        .add_query_param("format", "json")
        .add_query_param("search", "CSV-2")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let exported: Vec<Value> = response.json();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0]["attributes"][0]["value"], "blue");
    assert_eq!(exported[0]["attributes"][0]["storeView"], "default");

    let response = server
        .get("/api/v1/export")
        .add_query_param("format", "pdf")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_oversized_import_is_rejected() -> Result<()> {
    let config = PimConfig {
        max_import_bytes: 16,
        ..PimConfig::default()
    };
    let (server, _) = setup_test_server(config).await?;

    let response = server
        .post("/api/v1/import")
        .add_query_param("format", "json")
        .text(r#"[{"sku": "TOO-LONG", "type": "simple"}]"#)
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json::<Value>()["error"]["code"], "FILE_TOO_LARGE");

    Ok(())
}
