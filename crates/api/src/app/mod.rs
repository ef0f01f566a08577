//! HTTP application wiring.
//!
//! - `services.rs`: store handle and domain services shared by all handlers
//! - `routes/`: one file per business area
//! - `dto.rs`: request bodies and response helpers
//! - `errors.rs`: the JSON error envelope

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use polaris_auth::JwtValidator;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router around already-wired services.
pub fn build_app(services: Arc<AppServices>) -> Router {
    let jwt: Arc<dyn JwtValidator> = services.jwt.clone();
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: a valid bearer token is required.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let public = routes::public_router().layer(Extension(services));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new())
}
