use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use polaris_core::PageQuery;
use polaris_inventory::{InventoryInput, ReceivingReportInput};

use crate::app::dto;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/sku/:sku", get(get_item_by_sku))
        .route("/items/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/receiving-reports", get(list_receiving_reports).post(create_receiving_report))
        .route("/receiving-reports/:id", get(get_receiving_report).delete(delete_receiving_report))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<InventoryInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let created = services.domain.inventory.create(input, Some(principal.actor())).await;
    dto::document(StatusCode::CREATED, created)
}

/// Catalog price edits never reach existing invoices; those carry their own snapshot.
pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<InventoryInput>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.inventory.update(&id, input).await)
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::document(StatusCode::OK, services.domain.inventory.get(&id).await),
        Err(resp) => resp,
    }
}

pub async fn get_item_by_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
) -> axum::response::Response {
    dto::document(StatusCode::OK, services.domain.inventory.get_by_sku(&sku).await)
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.inventory.delete(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::document_page(services.domain.inventory.list(request).await),
        Err(resp) => resp,
    }
}

pub async fn create_receiving_report(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ReceivingReportInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::CREATED, services.domain.inventory.create_receiving_report(input).await)
}

pub async fn get_receiving_report(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.inventory.get_receiving_report(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_receiving_report(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.inventory.delete_receiving_report(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_receiving_reports(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.inventory.list_receiving_reports(request).await),
        Err(resp) => resp,
    }
}
