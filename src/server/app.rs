use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{attribute_sets, attributes, health, products, scopes, transfer};
use crate::config::PimConfig;

/// Request bodies may exceed the import cap by this much. The importer
/// rejects oversized documents with `FILE_TOO_LARGE` itself.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<PimConfig>,
}

pub async fn create_app(db: DatabaseConnection, config: PimConfig) -> Result<Router> {
    let cors = match config.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };
    let body_limit = config.max_import_bytes.saturating_add(BODY_LIMIT_HEADROOM);

    let state = AppState {
        db,
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Attribute registry
        .route(
            "/attributes",
            get(attributes::list_attributes).post(attributes::create_attribute),
        )
        .route(
            "/attributes/:id",
            get(attributes::get_attribute)
                .put(attributes::update_attribute)
                .delete(attributes::delete_attribute),
        )
        // Attribute sets and groups
        .route(
            "/attribute-sets",
            get(attribute_sets::list_sets).post(attribute_sets::create_set),
        )
        .route("/attribute-sets/:id", get(attribute_sets::get_set))
        .route("/attribute-sets/:id/groups", post(attribute_sets::create_group))
        .route(
            "/attribute-sets/:id/attributes",
            post(attribute_sets::assign_attribute),
        )
        .route(
            "/attribute-sets/:id/attributes/:attribute_id",
            axum::routing::delete(attribute_sets::unassign_attribute),
        )
        .route("/attribute-sets/:id/order", put(attribute_sets::reorder_attributes))
        .route("/attribute-sets/:id/layout", get(attribute_sets::get_layout))
        // Scopes
        .route(
            "/locales",
            get(scopes::list_locales).post(scopes::create_locale),
        )
        .route(
            "/store-views",
            get(scopes::list_store_views).post(scopes::create_store_view),
        )
        .route(
            "/categories",
            get(scopes::list_categories).post(scopes::create_category),
        )
        // Products
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/:id/values", get(products::list_values))
        .route(
            "/products/:id/values/:attribute_id/:store_view_id",
            put(products::set_value).delete(products::clear_value),
        )
        .route(
            "/products/:id/transitions",
            post(products::transition_product),
        )
        .route("/products/:id/history", get(products::product_history))
        .route("/products/:id/categories", get(products::product_categories))
        .route(
            "/products/:id/categories/:category_id",
            put(products::assign_category).delete(products::unassign_category),
        )
        // Bulk transfer
        .route("/export", get(transfer::export_products))
        .route("/import", post(transfer::import_products))
}
