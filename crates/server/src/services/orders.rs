//! Order submission.
//!
//! Validate, stamp, deliver, then commit. A record is appended to the
//! operator's history only after the webhook (when configured) confirms
//! delivery. The CSV export runs after the commit and cannot undo it.

use std::path::PathBuf;

use thiserror::Error;
use tracing::instrument;

use commande_core::{OrderDraft, OrderError, OrderRecord, OrderTimestamp, Username};

use crate::store::{OrderHistory, OrderStore, StoreError};

use super::export::CsvExporter;
use super::webhook::{WebhookClient, WebhookError};

/// Errors that abort a submission. Nothing is committed when one occurs.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The form failed validation.
    #[error(transparent)]
    Validation(#[from] OrderError),

    /// The webhook did not confirm delivery.
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// The history could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to the CSV export of a committed record.
#[derive(Debug)]
pub enum ExportOutcome {
    /// No export directory is configured.
    Disabled,
    /// The record was written to this file.
    Written(PathBuf),
    /// The export failed; the record is committed regardless.
    Failed(String),
}

/// A committed submission.
#[derive(Debug)]
pub struct Submission {
    /// The record as stored.
    pub record: OrderRecord,
    /// The operator's history after the append.
    pub history: OrderHistory,
    /// CSV export result.
    pub export: ExportOutcome,
}

/// Runs the submission sequence against the store, webhook and exporter.
#[derive(Debug, Clone)]
pub struct OrderService {
    store: OrderStore,
    webhook: Option<WebhookClient>,
    exporter: Option<CsvExporter>,
}

impl OrderService {
    /// Create a submission service.
    #[must_use]
    pub const fn new(
        store: OrderStore,
        webhook: Option<WebhookClient>,
        exporter: Option<CsvExporter>,
    ) -> Self {
        Self {
            store,
            webhook,
            exporter,
        }
    }

    /// The order store.
    #[must_use]
    pub const fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Submit `draft` for `username`, stamped with the current Casablanca time.
    ///
    /// # Errors
    ///
    /// See [`Self::submit_at`].
    pub async fn submit(
        &self,
        username: &Username,
        draft: &OrderDraft,
    ) -> Result<Submission, SubmitError> {
        self.submit_at(username, draft, OrderTimestamp::now()).await
    }

    /// Submit `draft` for `username` with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Validation` for an invalid form,
    /// `SubmitError::Webhook` if delivery is not confirmed and
    /// `SubmitError::Store` if the history cannot be persisted. In all three
    /// cases the history is unchanged.
    #[instrument(skip(self, draft), fields(username = %username, product = %draft.product.trim()))]
    pub async fn submit_at(
        &self,
        username: &Username,
        draft: &OrderDraft,
        timestamp: OrderTimestamp,
    ) -> Result<Submission, SubmitError> {
        let record = draft.validate(username.clone(), timestamp)?;

        if let Some(webhook) = &self.webhook {
            webhook.deliver(&record).await?;
        }

        let history = self.store.append(username, record.clone()).await?;

        let export = match &self.exporter {
            None => ExportOutcome::Disabled,
            Some(exporter) => match exporter.export_record(&record).await {
                Ok(path) => ExportOutcome::Written(path),
                Err(e) => {
                    tracing::warn!(error = %e, "CSV export failed after commit");
                    ExportOutcome::Failed(e.to_string())
                }
            },
        };

        Ok(Submission {
            record,
            history,
            export,
        })
    }
}
