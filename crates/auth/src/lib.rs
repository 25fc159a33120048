//! `invoicedesk-auth` — sign-in boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: user lookups
//! go through [`UserDirectory`], and the identity provider is a trait so the
//! sign-in action can be driven by any backend.

pub mod claims;
pub mod credentials;
pub mod directory;
pub mod provider;
pub mod sign_in;

pub use claims::{
    Hs256SessionCodec, SessionClaims, SessionError, SessionValidator, TokenValidationError,
    validate_claims,
};
pub use credentials::{Credentials, PasswordDigest};
pub use directory::{DirectoryError, InMemoryUserDirectory, UserDirectory, UserRecord};
pub use provider::{
    AuthError, AuthErrorKind, CREDENTIALS_STRATEGY, CredentialsProvider, IdentityProvider,
    ProviderError, Session,
};
pub use sign_in::{SignInError, SignInOutcome, authenticate, messages};
