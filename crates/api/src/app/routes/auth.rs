use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    routing::post,
    Json, Router,
};

use polaris_auth::SignupInput;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

/// Registers a pending account; a superadmin must approve it before signin works.
pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<SignupInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    dto::created(services.domain.users.signup(input).await)
}

pub async fn signin(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SigninRequest>, JsonRejection>,
) -> axum::response::Response {
    let req = match common::body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let user = match services.domain.users.signin(&req.email, &req.password).await {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let token = match services.tokens.issue(&user) {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };
    tracing::info!(user_id = %user.id, "user signed in");
    dto::ok(Ok(dto::SigninResponse {
        token,
        token_type: "Bearer",
        expires_in: services.tokens.ttl().num_seconds(),
    }))
}
