//! Admin password verification.
//!
//! The admin identity is a single configured username plus a salted SHA-256
//! digest. Verification hashes `password + salt` and compares the lowercase
//! hex result to the configured digest.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex `SHA256(password + salt)`.
#[must_use]
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// The configured admin identity.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    salt: String,
    digest: Option<String>,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("digest", &self.digest.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl AdminCredentials {
    /// Create credentials from a username, salt and optional reference digest.
    #[must_use]
    pub fn new(username: String, salt: String, digest: Option<String>) -> Self {
        Self {
            username,
            salt,
            digest: digest.map(|d| d.to_ascii_lowercase()),
        }
    }

    /// Create credentials by hashing a known plaintext password.
    #[must_use]
    pub fn from_password(username: &str, password: &str, salt: &str) -> Self {
        Self::new(
            username.to_string(),
            salt.to_string(),
            Some(hash_password(password, salt)),
        )
    }

    /// The admin username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether a reference digest is configured at all.
    #[must_use]
    pub fn has_digest(&self) -> bool {
        self.digest.is_some()
    }

    /// Check a login attempt.
    ///
    /// The username must match exactly (case-sensitive) and the salted digest
    /// of `password` must equal the configured digest.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        match &self.digest {
            Some(expected) => hash_password(password, &self.salt) == *expected,
            None => false,
        }
    }
}
