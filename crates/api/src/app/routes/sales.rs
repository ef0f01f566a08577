//! Sales orders, invoices, delivery receipts and quotations.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use polaris_core::PageQuery;
use polaris_sales::{InvoiceItemInput, QuotationInput, QuotationItemInput, SalesInvoiceInput, SalesOrderInput, SalesOrderUpdate};

use crate::app::dto;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order).put(update_order).delete(delete_order))
        .route("/orders/:id/fulfillment", get(fulfillment))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/by-project/:id", get(list_invoices_by_project))
        .route("/invoices/:id", get(get_invoice).put(revise_invoice).delete(delete_invoice))
        .route("/delivery-receipts", get(list_delivery_receipts).post(create_delivery_receipt))
        .route("/delivery-receipts/:id", get(get_delivery_receipt).delete(delete_delivery_receipt))
        .route("/delivery-receipts/:id/status", put(set_delivery_status))
        .route("/quotations", get(list_quotations).post(create_quotation))
        .route("/quotations/:id", get(get_quotation).put(revise_quotation).delete(delete_quotation))
        .route("/quotations/:id/status", put(set_quotation_status))
}

// Orders

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<SalesOrderInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::CREATED, services.domain.sales.create_order(input, principal.actor()).await)
}

/// Replaces the items and, when a known status is given, moves the status too.
pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<SalesOrderUpdate>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let update = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.sales.update_order(&id, update).await)
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.sales.get_order(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.sales.delete_order(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.sales.list_orders(request).await),
        Err(resp) => resp,
    }
}

pub async fn fulfillment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.fulfillment.fulfillment_status(&id).await),
        Err(resp) => resp,
    }
}

// Invoices

/// Prices come from the inventory catalog, never from the request.
pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<SalesInvoiceInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::CREATED, services.domain.sales.create_invoice(input, principal.actor()).await)
}

pub async fn revise_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ItemsRequest<InvoiceItemInput>>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let req = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.sales.revise_invoice(&id, req.items).await)
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.sales.get_invoice(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.sales.delete_invoice(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.sales.list_invoices(request).await),
        Err(resp) => resp,
    }
}

pub async fn list_invoices_by_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.sales.list_invoices_by_project(&id, request).await),
        Err(resp) => resp,
    }
}

// Delivery receipts

pub async fn create_delivery_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::DeliveryReceiptRequest>, JsonRejection>,
) -> axum::response::Response {
    let req = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let created = services
        .domain
        .sales
        .create_delivery_receipt(&req.sales_invoice_id, principal.actor())
        .await;
    dto::document(StatusCode::CREATED, created)
}

pub async fn set_delivery_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StatusRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let req = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.sales.set_delivery_status(&id, &req.status).await)
}

pub async fn get_delivery_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.sales.get_delivery_receipt(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_delivery_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.sales.delete_delivery_receipt(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_delivery_receipts(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.sales.list_delivery_receipts(request).await),
        Err(resp) => resp,
    }
}

// Quotations

pub async fn create_quotation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<QuotationInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::CREATED, services.domain.sales.create_quotation(input, principal.actor()).await)
}

pub async fn revise_quotation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ItemsRequest<QuotationItemInput>>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let req = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.sales.revise_quotation(&id, req.items).await)
}

pub async fn set_quotation_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::StatusRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let req = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let updated = services
        .domain
        .sales
        .set_quotation_status(&id, &req.status, principal.actor())
        .await;
    dto::document(StatusCode::OK, updated)
}

pub async fn get_quotation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.sales.get_quotation(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_quotation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.sales.delete_quotation(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_quotations(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.sales.list_quotations(request).await),
        Err(resp) => resp,
    }
}
