//! Per-operator order history files.

use std::path::{Path, PathBuf};

use commande_core::{OrderRecord, OrderTable, Username};
use tracing::instrument;

use super::{StoreError, read_json_optional, write_json_atomic};

/// One operator's order history, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHistory {
    username: Username,
    records: Vec<OrderRecord>,
}

impl OrderHistory {
    /// An empty history for `username`.
    #[must_use]
    pub const fn empty(username: Username) -> Self {
        Self {
            username,
            records: Vec::new(),
        }
    }

    /// The owning operator.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    /// Most recent record, if any.
    #[must_use]
    pub fn last(&self) -> Option<&OrderRecord> {
        self.records.last()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display projection of the history.
    #[must_use]
    pub fn to_table(&self) -> OrderTable {
        OrderTable::from_records(&self.records)
    }
}

/// File-backed store of order histories, one JSON file per operator.
#[derive(Debug, Clone)]
pub struct OrderStore {
    data_dir: PathBuf,
}

impl OrderStore {
    /// Create a store rooted at `data_dir`.
    ///
    /// The directory is created on the first append.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the history files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of `username`'s history file.
    #[must_use]
    pub fn history_path(&self, username: &Username) -> PathBuf {
        self.data_dir
            .join(format!("order_history_{}.json", username.as_str()))
    }

    /// Load `username`'s history.
    ///
    /// A missing file means the operator has not ordered yet and yields an
    /// empty history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be read,
    /// `StoreError::DataCorruption` if it does not parse, and
    /// `StoreError::OwnerMismatch` if it holds another operator's records.
    #[instrument(skip(self), fields(username = %username))]
    pub async fn load(&self, username: &Username) -> Result<OrderHistory, StoreError> {
        let path = self.history_path(username);
        let Some(records) = read_json_optional::<Vec<OrderRecord>>(&path).await? else {
            tracing::debug!("No order history yet");
            return Ok(OrderHistory::empty(username.clone()));
        };

        if let Some(foreign) = records.iter().find(|r| &r.username != username) {
            return Err(StoreError::OwnerMismatch {
                history_owner: username.to_string(),
                record_owner: foreign.username.to_string(),
            });
        }

        tracing::debug!(count = records.len(), "Loaded order history");
        Ok(OrderHistory {
            username: username.clone(),
            records,
        })
    }

    /// Append `record` to `username`'s history and persist the whole history.
    ///
    /// Returns the updated history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OwnerMismatch` if the record belongs to another
    /// operator, any error from [`Self::load`], and `StoreError::Io` if the
    /// history cannot be written (the previous file is left intact).
    #[instrument(skip(self, record), fields(username = %username, product = %record.product))]
    pub async fn append(
        &self,
        username: &Username,
        record: OrderRecord,
    ) -> Result<OrderHistory, StoreError> {
        if &record.username != username {
            return Err(StoreError::OwnerMismatch {
                history_owner: username.to_string(),
                record_owner: record.username.to_string(),
            });
        }

        let mut history = self.load(username).await?;
        history.records.push(record);

        write_json_atomic(&self.history_path(username), &history.records).await?;

        tracing::info!(count = history.len(), "Order appended to history");
        Ok(history)
    }
}
