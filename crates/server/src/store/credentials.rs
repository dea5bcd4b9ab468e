//! Operator credential file.

use std::path::{Path, PathBuf};

use commande_core::{CredentialFile, StoredCredential};

use super::{StoreError, read_json_optional, write_json_atomic};

/// Repository over the credential JSON file.
///
/// The file is read wholesale on every call; nothing is cached, so edits
/// made by the CLI are picked up by a running server on the next login.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    path: PathBuf,
}

impl CredentialRepository {
    /// Create a repository for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the credential file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file is missing or unreadable and
    /// `StoreError::DataCorruption` if it does not parse.
    pub async fn load(&self) -> Result<CredentialFile, StoreError> {
        read_json_optional(&self.path)
            .await?
            .ok_or_else(|| StoreError::Io {
                path: self.path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "credential file not found",
                ),
            })
    }

    /// Read the credential file, treating a missing file as empty.
    ///
    /// Used when provisioning the first operators.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DataCorruption` if an existing file does not parse.
    pub async fn load_or_default(&self) -> Result<CredentialFile, StoreError> {
        Ok(read_json_optional(&self.path).await?.unwrap_or_default())
    }

    /// Add entries to the file, rejecting any username already present.
    ///
    /// All entries are written in one atomic replace; on conflict nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` with the first duplicate username, or
    /// any read/write error.
    pub async fn insert_many(&self, entries: Vec<StoredCredential>) -> Result<(), StoreError> {
        let mut file = self.load_or_default().await?;

        for entry in entries {
            if file.find(entry.username.as_str()).is_some() {
                return Err(StoreError::Conflict(entry.username.to_string()));
            }
            file.users.push(entry);
        }

        write_json_atomic(&self.path, &file).await?;
        tracing::info!(path = %self.path.display(), users = file.users.len(), "Credential file updated");
        Ok(())
    }

    /// Add one entry.
    ///
    /// # Errors
    ///
    /// See [`Self::insert_many`].
    pub async fn insert(&self, entry: StoredCredential) -> Result<(), StoreError> {
        self.insert_many(vec![entry]).await
    }
}
