//! Sign-in action: delegate to the provider and classify failures.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::credentials::Credentials;
use crate::provider::{AuthErrorKind, CREDENTIALS_STRATEGY, IdentityProvider, ProviderError, Session};

pub mod messages {
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
    pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";
}

/// Result of a sign-in attempt the form can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn(Session),
    /// Authentication failed; carries the user-facing message.
    Rejected(&'static str),
}

/// A failure that is not an authentication problem. Fatal to the caller.
#[derive(Debug, Error)]
#[error("sign-in failed: {0}")]
pub struct SignInError(#[source] pub anyhow::Error);

/// Sign in with the `"credentials"` strategy.
///
/// Invalid credentials map to [`messages::INVALID_CREDENTIALS`], every other
/// authentication subtype to [`messages::SOMETHING_WENT_WRONG`]. Backend
/// failures propagate as [`SignInError`].
pub async fn authenticate<P>(
    provider: &P,
    credentials: &Credentials,
) -> Result<SignInOutcome, SignInError>
where
    P: IdentityProvider + ?Sized,
{
    match provider.sign_in(CREDENTIALS_STRATEGY, credentials).await {
        Ok(session) => {
            info!(user_id = %session.user_id, "signed in");
            Ok(SignInOutcome::SignedIn(session))
        }
        Err(ProviderError::Auth(err)) => {
            warn!(kind = %err.kind, email = %credentials.email, "sign-in rejected");
            let message = match err.kind {
                AuthErrorKind::InvalidCredentials => messages::INVALID_CREDENTIALS,
                _ => messages::SOMETHING_WENT_WRONG,
            };
            Ok(SignInOutcome::Rejected(message))
        }
        Err(ProviderError::Backend(err)) => {
            error!(error = %err, "identity provider failure");
            Err(SignInError(err))
        }
    }
}
