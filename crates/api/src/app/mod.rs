//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store/identity/session wiring, in-memory or Postgres
//! - `routes/`: handlers, one file per area
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    let session_state = middleware::SessionState {
        sessions: services.sessions.clone(),
    };
    let services = Arc::new(services);

    // Dashboard routes: require a valid session.
    let dashboard = routes::dashboard_router().layer(axum::middleware::from_fn_with_state(
        session_state,
        middleware::session_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/login", post(routes::auth::login))
        .nest("/dashboard", dashboard)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
