//! Projects; reads carry the owning customer's name.

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
use polaris_parties::ProjectInput;

use crate::app::dto;
use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/:id", get(get_project).put(update_project).delete(delete_project))
}

pub async fn create_project(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProjectInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::CREATED, services.domain.projects.create(input).await)
}

pub async fn update_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProjectInput>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::document(StatusCode::OK, services.domain.projects.update(&id, input).await)
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::ok(services.domain.projects.get(&id).await),
        Err(resp) => resp,
    }
}

/// Downstream orders and invoices are left in place.
pub async fn delete_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match dto::parse_id(&id) {
        Ok(id) => dto::deleted(services.domain.projects.delete(&id).await),
        Err(resp) => resp,
    }
}

pub async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    match common::page(query) {
        Ok(request) => dto::ok(services.domain.projects.list(request).await),
        Err(resp) => resp,
    }
}
