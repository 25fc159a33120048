use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Form, Json, Router,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::post,
};

use invoicedesk_core::FormData;
use invoicedesk_infra::{ActionOutcome, InvoiceStore, StoreError, ViewPath};

use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_invoice).get(list_invoices))
        .route("/:id", post(update_invoice))
        .route("/:id/delete", post(delete_invoice))
}

/// The invoice list view, served from the view cache until an action
/// marks it stale.
pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let store = services.actions.store();
    let rendered = services
        .views
        .get_or_render(&ViewPath::INVOICES, || async {
            let invoices = store.list().await?;
            serde_json::to_value(invoices).map_err(|e| StoreError::Corrupt(e.to_string()))
        })
        .await;

    match rendered {
        Ok(view) => Json(view).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render invoice list");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Database Error: Failed to Fetch Invoices.",
            )
        }
    }
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Form(body): Form<HashMap<String, String>>,
) -> axum::response::Response {
    match services.actions.create(&FormData::from(body)).await {
        Ok(outcome) => outcome_to_response(outcome),
        Err(e) => errors::action_error_to_response(e),
    }
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(body): Form<HashMap<String, String>>,
) -> axum::response::Response {
    match services.actions.update(&id, &FormData::from(body)).await {
        Ok(outcome) => outcome_to_response(outcome),
        Err(e) => errors::action_error_to_response(e),
    }
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.actions.delete(&id).await {
        Ok(outcome) => outcome_to_response(outcome),
        Err(e) => errors::action_error_to_response(e),
    }
}

fn outcome_to_response(outcome: ActionOutcome) -> axum::response::Response {
    match outcome {
        ActionOutcome::Render(state) => (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response(),
        ActionOutcome::NavigateTo(path) => Redirect::to(path.as_str()).into_response(),
        ActionOutcome::Completed => StatusCode::NO_CONTENT.into_response(),
    }
}
