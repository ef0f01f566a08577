//! Supplier purchase orders, supplier invoices and supplier delivery receipts.

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
use polaris_purchasing::{SupplierDrInput, SupplierInvoiceInput, SupplierPoInput, SupplierPoUpdate};

use crate::app::dto;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/by-supplier/:id", get(list_orders_by_supplier))
        .route("/orders/:id", get(get_order).put(update_order).delete(delete_order))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/:id", get(get_invoice).put(update_invoice).delete(delete_invoice))
        .route("/delivery-receipts", get(list_delivery_receipts).post(create_delivery_receipt))
        .route(
            "/delivery-receipts/:id",
            get(get_delivery_receipt).put(update_delivery_receipt).delete(delete_delivery_receipt),
        )
}

// Purchase orders

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<SupplierPoInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::CREATED, services.domain.purchasing.create_order(input, principal.actor()).await)
}

/// Items and status travel together; approval is stamped with the caller.
pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<SupplierPoUpdate>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let update = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let updated = services.domain.purchasing.update_order(&id, update, principal.actor()).await;
    dto::document(StatusCode::OK, updated)
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.purchasing.get_order(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.purchasing.delete_order(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.purchasing.list_orders(request).await),
        Err(resp) => resp,
    }
}

pub async fn list_orders_by_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.purchasing.list_orders_by_supplier(&id, request).await),
        Err(resp) => resp,
    }
}

// Supplier invoices

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<SupplierInvoiceInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::CREATED, services.domain.purchasing.create_invoice(input, principal.actor()).await)
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<SupplierInvoiceInput>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.purchasing.update_invoice(&id, input).await)
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.purchasing.get_invoice(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.purchasing.delete_invoice(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.purchasing.list_invoices(request).await),
        Err(resp) => resp,
    }
}

// Supplier delivery receipts

pub async fn create_delivery_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<SupplierDrInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let created = services
        .domain
        .purchasing
        .create_delivery_receipt(input, principal.actor())
        .await;
    dto::document(StatusCode::CREATED, created)
}

pub async fn update_delivery_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<SupplierDrInput>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.purchasing.update_delivery_receipt(&id, input).await)
}

pub async fn get_delivery_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.purchasing.get_delivery_receipt(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_delivery_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.purchasing.delete_delivery_receipt(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_delivery_receipts(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.purchasing.list_delivery_receipts(request).await),
        Err(resp) => resp,
    }
}
