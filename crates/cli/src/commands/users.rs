//! Operator credential commands.
//!
//! # Environment Variables
//!
//! - `COMMANDE_CREDENTIALS_FILE` - Credential file to update (default: users.json)

use std::path::Path;

use commande_core::Username;
use commande_server::CommandeConfig;
use commande_server::services::auth::{AuthError, CredentialStore};
use commande_server::store::CredentialRepository;

fn credential_store(config: &CommandeConfig) -> CredentialStore {
    CredentialStore::new(CredentialRepository::new(config.credentials_file.clone()))
}

/// Add a new operator with a hashed password.
///
/// # Errors
///
/// Returns `AuthError` if the username is invalid or taken, the password is
/// too short, or the credential file cannot be written.
pub async fn add(config: &CommandeConfig, username: &str, password: &str) -> Result<Username, AuthError> {
    tracing::info!(
        "Adding operator {} to {}",
        username,
        config.credentials_file.display()
    );

    let username = credential_store(config).add_user(username, password).await?;

    tracing::info!("Operator {} created", username);
    Ok(username)
}

/// Hash and import a legacy plaintext user file.
///
/// # Errors
///
/// Returns `AuthError` if the legacy file is unreadable, holds an invalid or
/// already registered username, or the credential file cannot be written.
pub async fn import_legacy(config: &CommandeConfig, path: &Path) -> Result<Vec<Username>, AuthError> {
    tracing::info!(
        "Importing {} into {}",
        path.display(),
        config.credentials_file.display()
    );

    let imported = credential_store(config).import_legacy(path).await?;

    for username in &imported {
        tracing::info!("Imported operator {}", username);
    }
    tracing::warn!(
        "Legacy passwords were imported as-is. Delete {} now that it is no longer needed.",
        path.display()
    );

    Ok(imported)
}
