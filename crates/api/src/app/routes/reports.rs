//! Report downloads and the dashboard summary.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Datelike;

use polaris_core::{timestamp, DomainError};
use polaris_reports::{export, ReportAggregator, ReportQuery, ReportRequest};

use crate::app::dto;
use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/reports", post(generate))
        .route("/dashboard", get(dashboard))
}

pub async fn generate(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ReportQuery>, JsonRejection>,
) -> axum::response::Response {
    let query = match common::body(body) {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    let request = match ReportRequest::parse(&query) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let report = match ReportAggregator::new(&services.store).build(&request).await {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let artifact = match export::render(&report, request.format) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(DomainError::from(e)),
    };

    tracing::info!(
        report_type = request.report_type.as_str(),
        rows = report.table.len(),
        file = %artifact.filename,
        "report generated"
    );
    let disposition = artifact.content_disposition();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// Defaults to the current calendar year.
pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::DashboardQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection(rejection),
    };
    let year = query.year.unwrap_or_else(|| timestamp::now().year());
    dto::ok(services.dashboard.summary(year).await)
}
