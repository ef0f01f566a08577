//! Request bodies specific to the HTTP surface and small response helpers.
//!
//! Most bodies are the domain `*Input` types deserialised directly.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use polaris_core::{DocumentId, DomainResult, Page};

use crate::app::errors;

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub action: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemsRequest<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryReceiptRequest {
    pub sales_invoice_id: DocumentId,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub year: Option<i32>,
}

pub fn parse_id(raw: &str) -> Result<DocumentId, axum::response::Response> {
    raw.parse().map_err(errors::domain_error_to_response)
}

/// `200` with the value as JSON, or the mapped error.
pub fn ok<T: Serialize>(result: DomainResult<T>) -> axum::response::Response {
    respond(StatusCode::OK, result)
}

pub fn created<T: Serialize>(result: DomainResult<T>) -> axum::response::Response {
    respond(StatusCode::CREATED, result)
}

pub fn deleted(result: DomainResult<()>) -> axum::response::Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn respond<T: Serialize>(status: StatusCode, result: DomainResult<T>) -> axum::response::Response {
    match result {
        Ok(v) => (status, Json(v)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Stored documents carry their id as `_id`; responses expose it as `id`.
pub fn document_json<T: Serialize>(value: &T) -> serde_json::Value {
    let mut json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
    if let Some(map) = json.as_object_mut() {
        if let Some(id) = map.remove("_id") {
            map.insert("id".to_string(), id);
        }
    }
    json
}

/// Like [`ok`] for stored documents.
pub fn document<T: Serialize>(status: StatusCode, result: DomainResult<T>) -> axum::response::Response {
    match result {
        Ok(v) => (status, Json(document_json(&v))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// A page of stored documents.
pub fn document_page<T: Serialize>(result: DomainResult<Page<T>>) -> axum::response::Response {
    ok(result.map(|page| page.map(|item| document_json(&item))))
}
