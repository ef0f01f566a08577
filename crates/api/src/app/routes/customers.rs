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
use polaris_parties::CustomerInput;

use crate::app::dto;
use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CustomerInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::CREATED, services.domain.customers.create(input).await)
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<CustomerInput>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.customers.update(&id, input).await)
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::document(StatusCode::OK, services.domain.customers.get(&id).await),
        Err(resp) => resp,
    }
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.customers.delete(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::document_page(services.domain.customers.list(request).await),
        Err(resp) => resp,
    }
}
