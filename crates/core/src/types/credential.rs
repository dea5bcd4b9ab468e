//! Stored operator credentials.
//!
//! Type-safe wrappers for the credential file. Only password hashes are
//! represented here; hashing and verification live in the server crate.

use serde::{Deserialize, Serialize};

use super::username::Username;

/// A PHC-format password hash string (e.g. `$argon2id$v=19$...`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    /// Wrap an encoded hash.
    #[must_use]
    pub const fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHashString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHashString([REDACTED])")
    }
}

/// One operator entry in the credential file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub username: Username,
    pub password_hash: PasswordHashString,
}

/// The credential file document: `{"users": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialFile {
    #[serde(default)]
    pub users: Vec<StoredCredential>,
}

impl CredentialFile {
    /// Find an entry by exact username.
    #[must_use]
    pub fn find(&self, username: &str) -> Option<&StoredCredential> {
        self.users.iter().find(|c| c.username.as_str() == username)
    }
}
