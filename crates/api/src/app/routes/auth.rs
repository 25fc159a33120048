use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect},
};
use chrono::Utc;

use invoicedesk_auth::{Credentials, SignInOutcome, authenticate};
use invoicedesk_core::FormData;
use invoicedesk_infra::ViewPath;

use crate::app::{errors, services::AppServices};
use crate::middleware::session_cookie_header;

/// Email + password sign-in. Success sets the session cookie and redirects
/// to the dashboard; a rejection answers 401 with the user-facing message.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Form(body): Form<HashMap<String, String>>,
) -> axum::response::Response {
    let credentials = Credentials::from_form(&FormData::from(body));

    let session = match authenticate(services.identity.as_ref(), &credentials).await {
        Ok(SignInOutcome::SignedIn(session)) => session,
        Ok(SignInOutcome::Rejected(message)) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response();
        }
        Err(e) => return errors::sign_in_error_to_response(e),
    };

    let token = match services.sessions.issue(&session, Utc::now()) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to issue session token");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "session_error",
                invoicedesk_auth::messages::SOMETHING_WENT_WRONG,
            );
        }
    };

    let cookie = session_cookie_header(
        &token,
        services.session_ttl.num_seconds(),
        services.secure_cookies,
    );
    (
        [(header::SET_COOKIE, cookie)],
        Redirect::to(ViewPath::DASHBOARD.as_str()),
    )
        .into_response()
}
