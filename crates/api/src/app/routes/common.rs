use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;

use polaris_core::{PageQuery, PageRequest};

use crate::app::errors;

pub fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    body.map(|Json(b)| b).map_err(errors::json_rejection)
}

pub fn page(query: Result<Query<PageQuery>, QueryRejection>) -> Result<PageRequest, axum::response::Response> {
    query.map(|Query(q)| PageRequest::from(q)).map_err(errors::query_rejection)
}
