//! CSV export of order records.
//!
//! One file per record, named `{username}_{YYYY-MM-DD HH-MM-SS}.csv`, with a
//! header row of field names and a single data row. Existing files are never
//! overwritten: a `_2`, `_3`, ... suffix is added before the extension.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use commande_core::{OrderRecord, OrderTable};

/// Upper bound on collision suffixes tried for one file name.
const MAX_SUFFIX: u32 = 1000;

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Encoding the CSV failed.
    #[error("csv encoding error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every candidate name is already taken.
    #[error("no free file name for {0}")]
    NameExhausted(String),
}

/// Write `table` as one CSV document (header row, then one row per record).
///
/// # Errors
///
/// Returns `ExportError::Csv` if encoding fails.
pub fn write_table(table: &OrderTable) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))
}

/// Exports order records into a directory.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    /// Create an exporter writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Base file name for `record`, without collision suffix.
    #[must_use]
    pub fn file_name(record: &OrderRecord) -> String {
        format!(
            "{}_{}.csv",
            record.username,
            record.timestamp.filename_safe()
        )
    }

    /// Write `record` to its own CSV file and return the path written.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` if the directory or file cannot be written
    /// and `ExportError::NameExhausted` if no free name is found.
    #[instrument(skip(self, record), fields(username = %record.username))]
    pub async fn export_record(&self, record: &OrderRecord) -> Result<PathBuf, ExportError> {
        let body = write_table(&OrderTable::from_records(std::slice::from_ref(record)))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ExportError::Io {
                path: self.output_dir.clone(),
                source,
            })?;

        let base = Self::file_name(record);
        let stem = base.trim_end_matches(".csv");

        for n in 1..=MAX_SUFFIX {
            let name = if n == 1 {
                base.clone()
            } else {
                format!("{stem}_{n}.csv")
            };
            let path = self.output_dir.join(&name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(ExportError::Io { path, source }),
            };

            let written = async {
                file.write_all(&body).await?;
                file.flush().await
            }
            .await;
            if let Err(source) = written {
                let _ = tokio::fs::remove_file(&path).await;
                return Err(ExportError::Io { path, source });
            }

            tracing::info!(path = %path.display(), "Order exported to CSV");
            return Ok(path);
        }

        Err(ExportError::NameExhausted(base))
    }

    /// Write one CSV file per record of `records`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing record; see [`Self::export_record`].
    pub async fn export_history(&self, records: &[OrderRecord]) -> Result<Vec<PathBuf>, ExportError> {
        let mut paths = Vec::with_capacity(records.len());
        for record in records {
            paths.push(self.export_record(record).await?);
        }
        Ok(paths)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use commande_core::{OrderDraft, OrderTimestamp, Username};

    use super::*;

    fn record(ts: &str) -> OrderRecord {
        OrderDraft {
            product: "Poulet".to_string(),
            unit: "Kilogram".to_string(),
            depot: "Fresh".to_string(),
            quantity: "10".to_string(),
            packaging: "Caisse, 5kg".to_string(),
            notes: String::new(),
        }
        .validate(
            Username::parse("alice").unwrap(),
            OrderTimestamp::parse(ts).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_export_record_name_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());

        let path = exporter
            .export_record(&record("2024-01-01 10:00:00"))
            .await
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "alice_2024-01-01 10-00-00.csv"
        );
        let text = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "timestamp,product,unit,depot,quantity,packaging,notes,username"
        );
        assert_eq!(
            lines[1],
            "2024-01-01 10:00:00,Poulet,Kilogram,Fresh,10,\"Caisse, 5kg\",,alice"
        );
    }

    #[tokio::test]
    async fn test_export_record_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path().join("exports"));
        let r = record("2024-01-01 10:00:00");

        let first = exporter.export_record(&r).await.unwrap();
        let second = exporter.export_record(&r).await.unwrap();
        let third = exporter.export_record(&r).await.unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("alice_2024-01-01 10-00-00_2.csv"));
        assert!(third.ends_with("alice_2024-01-01 10-00-00_3.csv"));
    }

    #[tokio::test]
    async fn test_export_history_writes_one_file_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());
        let records = vec![record("2024-01-01 10:00:00"), record("2024-01-02 11:30:00")];

        let paths = exporter.export_history(&records).await.unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[1].ends_with("alice_2024-01-02 11-30-00.csv"));
    }

    #[test]
    fn test_write_table_has_header_and_all_rows() {
        let table = OrderTable::from_records(&[
            record("2024-01-01 10:00:00"),
            record("2024-01-01 10:05:00"),
        ]);
        let text = String::from_utf8(write_table(&table).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("timestamp,product,"));
    }

    #[test]
    fn test_write_empty_table_is_header_only() {
        let table = OrderTable::from_records(&[]);
        let text = String::from_utf8(write_table(&table).unwrap()).unwrap();
        assert_eq!(
            text,
            "timestamp,product,unit,depot,quantity,packaging,notes,username\n"
        );
    }
}
