use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use invoicedesk_infra::ViewPath;

use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Landing page after sign-in: who is signed in and where the invoices live.
pub async fn overview(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "user": {
            "id": session.user_id().to_string(),
            "name": session.name(),
            "email": session.email(),
        },
        "invoices": ViewPath::INVOICES.as_str(),
    }))
}

/// Identity of the signed-in user (backs the customers page header).
pub async fn whoami(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "id": session.user_id().to_string(),
        "email": session.email(),
        "name": session.name(),
    }))
}
