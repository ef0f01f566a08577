use axum::{routing::get, Router};

pub mod admin;
pub mod auth;
pub mod common;
pub mod customers;
pub mod inventory;
pub mod projects;
pub mod purchasing;
pub mod reports;
pub mod sales;
pub mod suppliers;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/admin", admin::router())
        .nest("/customers", customers::router())
        .nest("/suppliers", suppliers::router())
        .nest("/projects", projects::router())
        .nest("/inventory", inventory::router())
        .nest("/sales", sales::router())
        .nest("/purchasing", purchasing::router())
        .merge(reports::router())
}

/// Router for endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/auth", auth::router())
}
