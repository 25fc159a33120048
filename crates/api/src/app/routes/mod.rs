use axum::{Router, routing::get};

pub mod auth;
pub mod invoices;
pub mod system;

/// Router for every session-guarded `/dashboard` endpoint.
pub fn dashboard_router() -> Router {
    Router::new()
        .route("/", get(system::overview))
        .route("/customers", get(system::whoami))
        .nest("/invoices", invoices::router())
}
