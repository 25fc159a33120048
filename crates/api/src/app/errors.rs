use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use invoicedesk_auth::{SignInError, messages};
use invoicedesk_infra::ActionError;

pub fn action_error_to_response(err: ActionError) -> axum::response::Response {
    if err.is_not_found() {
        return json_error(StatusCode::NOT_FOUND, "not_found", "Invoice not found.");
    }
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "database_error",
        err.user_message(),
    )
}

pub fn sign_in_error_to_response(_err: SignInError) -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "sign_in_failed",
        messages::SOMETHING_WENT_WRONG,
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
