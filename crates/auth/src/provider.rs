//! Identity provider boundary.
//!
//! A provider accepts a strategy tag plus the raw credential payload and
//! either yields a [`Session`] or fails. Failures are split in two:
//! [`ProviderError::Auth`] is a typed authentication error with a subtype,
//! [`ProviderError::Backend`] is everything else (storage down, bugs) and is
//! never shown to users as an auth problem.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use invoicedesk_core::UserId;

use crate::credentials::Credentials;
use crate::directory::UserDirectory;

/// Strategy tag for email + password sign-in.
pub const CREDENTIALS_STRATEGY: &str = "credentials";

const MIN_PASSWORD_LEN: usize = 6;

/// Authenticated identity returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
}

/// Authentication error subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// Unknown user, wrong password, or malformed credentials.
    InvalidCredentials,
    /// The provider does not implement the requested strategy.
    UnsupportedStrategy,
    /// The account exists but may not sign in.
    AccessDenied,
    /// Provider-side callback/configuration failure.
    Callback,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::InvalidCredentials => "invalid_credentials",
            AuthErrorKind::UnsupportedStrategy => "unsupported_strategy",
            AuthErrorKind::AccessDenied => "access_denied",
            AuthErrorKind::Callback => "callback",
        }
    }
}

impl core::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("authentication failed: {kind}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    pub fn invalid_credentials() -> Self {
        Self::new(AuthErrorKind::InvalidCredentials)
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("identity provider failure: {0}")]
    Backend(#[source] anyhow::Error),
}

impl ProviderError {
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(
        &self,
        strategy: &str,
        credentials: &Credentials,
    ) -> Result<Session, ProviderError>;
}

#[async_trait]
impl<P> IdentityProvider for Arc<P>
where
    P: IdentityProvider + ?Sized,
{
    async fn sign_in(
        &self,
        strategy: &str,
        credentials: &Credentials,
    ) -> Result<Session, ProviderError> {
        (**self).sign_in(strategy, credentials).await
    }
}

/// Email + password provider backed by a [`UserDirectory`].
#[derive(Debug)]
pub struct CredentialsProvider<D> {
    directory: D,
}

impl<D> CredentialsProvider<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }
}

fn well_formed(credentials: &Credentials) -> bool {
    credentials.email.contains('@') && credentials.password.chars().count() >= MIN_PASSWORD_LEN
}

#[async_trait]
impl<D: UserDirectory> IdentityProvider for CredentialsProvider<D> {
    async fn sign_in(
        &self,
        strategy: &str,
        credentials: &Credentials,
    ) -> Result<Session, ProviderError> {
        if strategy != CREDENTIALS_STRATEGY {
            return Err(AuthError::new(AuthErrorKind::UnsupportedStrategy).into());
        }
        if !well_formed(credentials) {
            return Err(AuthError::invalid_credentials().into());
        }

        let user = self
            .directory
            .find_by_email(credentials.email.trim())
            .await
            .map_err(ProviderError::backend)?
            .ok_or_else(AuthError::invalid_credentials)?;

        if !user.password.verify(&credentials.password) {
            return Err(AuthError::invalid_credentials().into());
        }

        Ok(Session {
            user_id: user.id,
            email: user.email,
            name: user.name,
        })
    }
}
