//! Superadmin user administration.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    routing::{get, post},
    Json, Router,
};

use polaris_core::PageQuery;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/decision", post(decide))
        .route("/pending-users", get(list_pending_users))
        .route("/roles", get(list_roles).post(create_role))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    let request = match common::page(query) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    dto::ok(services.domain.users.list_users(principal.principal(), request).await)
}

pub async fn list_pending_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> axum::response::Response {
    let request = match common::page(query) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    dto::ok(services.domain.users.list_pending(principal.principal(), request).await)
}

/// Approve, reject, deactivate or re-role the user or pending signup with this id.
pub async fn decide(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::DecisionRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let req = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let outcome = services
        .domain
        .users
        .decide(principal.principal(), &id, &req.action, req.role.as_deref())
        .await;
    if let Err(e) = &outcome {
        tracing::info!(target_id = %id, error = %e, "user decision refused");
    }
    dto::ok(outcome)
}

pub async fn create_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateRoleRequest>, JsonRejection>,
) -> axum::response::Response {
    let req = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let created = services
        .domain
        .users
        .create_role(principal.principal(), &req.name, &req.description)
        .await;
    dto::document(axum::http::StatusCode::CREATED, created)
}

pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.domain.users.list_roles(principal.principal()).await {
        Ok(roles) => dto::ok(Ok(serde_json::json!({
            "items": roles.iter().map(dto::document_json).collect::<Vec<_>>(),
        }))),
        Err(e) => errors::domain_error_to_response(e),
    }
}
