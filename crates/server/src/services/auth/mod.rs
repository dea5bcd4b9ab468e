//! Authentication service.
//!
//! Password authentication against the operator credential file. Passwords
//! are stored as Argon2id PHC strings with a random salt per entry.

mod error;

pub use error::AuthError;

use std::path::Path;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use tracing::instrument;

use commande_core::{PasswordHashString, StoredCredential, Username};

use crate::store::CredentialRepository;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// One entry of a first-generation credential file, with a plaintext password.
#[derive(Debug, Deserialize)]
struct LegacyUser {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LegacyCredentialFile {
    users: Vec<LegacyUser>,
}

/// Credential store for operator logins.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    repository: CredentialRepository,
}

impl CredentialStore {
    /// Create a credential store over `repository`.
    #[must_use]
    pub const fn new(repository: CredentialRepository) -> Self {
        Self { repository }
    }

    /// The underlying repository.
    #[must_use]
    pub const fn repository(&self) -> &CredentialRepository {
        &self.repository
    }

    /// Check a username/password pair.
    ///
    /// The credential file is re-read on every attempt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown user, a
    /// malformed username or a wrong password, and `AuthError::Source` if
    /// the credential file is missing or corrupt.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Username, AuthError> {
        let file = self.repository.load().await?;

        let entry = file
            .find(username)
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, entry.password_hash.as_str())?;

        tracing::info!(username = %entry.username, "Operator authenticated");
        Ok(entry.username.clone())
    }

    /// Register a new operator.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is already registered.
    #[instrument(skip(self, password))]
    pub async fn add_user(&self, username: &str, password: &str) -> Result<Username, AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        self.repository
            .insert(StoredCredential {
                username: username.clone(),
                password_hash,
            })
            .await?;

        Ok(username)
    }

    /// Import a first-generation plaintext credential file.
    ///
    /// Every password is hashed before it is stored. Legacy passwords are
    /// imported as-is, without the minimum length rule. Returns the imported
    /// usernames.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Legacy` if the file cannot be read or parsed,
    /// `AuthError::InvalidUsername` for a username the store cannot hold and
    /// `AuthError::UserAlreadyExists` if any user is already registered (in
    /// which case nothing is imported).
    #[instrument(skip(self))]
    pub async fn import_legacy(&self, path: &Path) -> Result<Vec<Username>, AuthError> {
        let legacy_err = |message: String| AuthError::Legacy {
            path: path.display().to_string(),
            message,
        };

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| legacy_err(e.to_string()))?;
        let legacy: LegacyCredentialFile =
            serde_json::from_slice(&bytes).map_err(|e| legacy_err(e.to_string()))?;

        let mut entries = Vec::with_capacity(legacy.users.len());
        for user in legacy.users {
            let username = Username::parse(user.username.trim())?;
            if entries
                .iter()
                .any(|e: &StoredCredential| e.username == username)
            {
                return Err(AuthError::UserAlreadyExists(username.to_string()));
            }
            entries.push(StoredCredential {
                username,
                password_hash: hash_password(&user.password)?,
            });
        }

        let imported: Vec<Username> = entries.iter().map(|e| e.username.clone()).collect();
        self.repository.insert_many(entries).await?;

        tracing::info!(count = imported.len(), "Legacy credentials imported");
        Ok(imported)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<PasswordHashString, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHashString::new(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
