//! Raw sign-in credentials and password digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use invoicedesk_core::FormData;

/// Credential payload exactly as the sign-in form submitted it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Missing fields become empty strings; the provider rejects them.
    pub fn from_form(form: &FormData) -> Self {
        Self::new(
            form.get("email").unwrap_or_default(),
            form.get("password").unwrap_or_default(),
        )
    }
}

// Never print the password.
impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Salted SHA-256 password digest, hex encoded.
///
/// SHA-256 is a fast hash with no work factor, so a leaked `users` table is
/// cheap to brute-force. Stored digests need migrating before this is
/// swapped for a slow KDF (bcrypt/argon2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordDigest {
    pub salt: String,
    pub hash: String,
}

impl PasswordDigest {
    pub fn compute(salt: impl Into<String>, password: &str) -> Self {
        let salt = salt.into();
        let hash = digest(&salt, password);
        Self { salt, hash }
    }

    /// Constant-time comparison against a candidate password.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = digest(&self.salt, password);
        if candidate.len() != self.hash.len() {
            return false;
        }
        candidate
            .bytes()
            .zip(self.hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
