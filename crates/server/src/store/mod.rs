//! Flat-file storage for order histories and operator credentials.
//!
//! # Layout
//!
//! ```text
//! {data_dir}/order_history_{username}.json   - one pretty-printed JSON array per operator
//! {credentials_file}                         - {"users": [{"username", "password_hash"}]}
//! ```
//!
//! Every write goes through [`write_json_atomic`]: the document is written
//! to a temporary file in the target directory, synced, then renamed over
//! the target. A failed write leaves the previous file untouched.
//!
//! There is no locking. Two concurrent writers for the same file race and
//! the last rename wins.

pub mod credentials;
pub mod orders;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub use credentials::CredentialRepository;
pub use orders::{OrderHistory, OrderStore};

/// Errors from the file store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file exists but does not hold the expected document.
    #[error("data corruption in {path}: {source}")]
    DataCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A record was appended to a history it does not belong to.
    #[error("record owned by {record_owner} cannot be appended to {history_owner}'s history")]
    OwnerMismatch {
        history_owner: String,
        record_owner: String,
    },

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Read and parse a JSON document, returning `None` if the file does not exist.
///
/// # Errors
///
/// Returns `StoreError::Io` for read failures other than "not found" and
/// `StoreError::DataCorruption` if the content does not parse.
pub async fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::DataCorruption {
            path: path.to_path_buf(),
            source,
        })
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// The parent directory is created if missing.
///
/// # Errors
///
/// Returns `StoreError::Serialize` if the value cannot be encoded and
/// `StoreError::Io` if any filesystem step fails. On error the temporary
/// file is removed and `path` keeps its previous content.
pub async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(value).map_err(StoreError::Serialize)?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map_or_else(|| "store".into(), |n| n.to_string_lossy());
    let tmp_path = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

    let result = write_and_rename(&tmp_path, path, &body).await;
    if result.is_err() {
        // Best effort; the rename never happened so the target is intact.
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }
    result
}

async fn write_and_rename(tmp_path: &Path, path: &Path, body: &[u8]) -> Result<(), StoreError> {
    let io_err = |p: &Path| {
        let p = p.to_path_buf();
        move |source: std::io::Error| StoreError::Io { path: p, source }
    };

    let mut file = tokio::fs::File::create(tmp_path)
        .await
        .map_err(io_err(tmp_path))?;
    file.write_all(body).await.map_err(io_err(tmp_path))?;
    file.write_all(b"\n").await.map_err(io_err(tmp_path))?;
    file.sync_all().await.map_err(io_err(tmp_path))?;
    drop(file);

    tokio::fs::rename(tmp_path, path)
        .await
        .map_err(io_err(path))
}
