//! Order history commands.
//!
//! # Environment Variables
//!
//! - `COMMANDE_DATA_DIR` - Order history directory (default: data)
//! - `COMMANDE_EXPORT_DIR` - Default output directory for `history export`

use std::path::PathBuf;

use thiserror::Error;

use commande_core::{OrderTable, Username, UsernameError};
use commande_server::CommandeConfig;
use commande_server::services::export::{CsvExporter, ExportError};
use commande_server::store::{OrderStore, StoreError};

/// Errors that can occur during history commands.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// History could not be read.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// CSV files could not be written.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Render `table` as aligned text columns.
#[must_use]
pub fn format_table(table: &OrderTable) -> String {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = pad_line(table.headers.iter().copied(), &widths);
    out.push('\n');
    for row in &table.rows {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

/// Print an operator's history to stdout.
///
/// # Errors
///
/// Returns `HistoryError` if the username is invalid or the history cannot be read.
#[allow(clippy::print_stdout)]
pub async fn show(config: &CommandeConfig, username: &str) -> Result<OrderTable, HistoryError> {
    let username = Username::parse(username)?;
    let history = OrderStore::new(config.data_dir.clone()).load(&username).await?;
    let table = history.to_table();

    if table.is_empty() {
        tracing::info!("No orders for {}", username);
    } else {
        print!("{}", format_table(&table));
    }

    Ok(table)
}

/// Write one CSV file per order in an operator's history.
///
/// The output directory is `output`, else `COMMANDE_EXPORT_DIR`, else the
/// current directory.
///
/// # Errors
///
/// Returns `HistoryError` if the username is invalid, the history cannot be
/// read, or a file cannot be written.
pub async fn export(
    config: &CommandeConfig,
    username: &str,
    output: Option<PathBuf>,
) -> Result<Vec<PathBuf>, HistoryError> {
    let username = Username::parse(username)?;
    let history = OrderStore::new(config.data_dir.clone()).load(&username).await?;

    let output = output
        .or_else(|| config.export_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let paths = CsvExporter::new(&output)
        .export_history(history.records())
        .await?;

    tracing::info!(
        "Exported {} order(s) for {} to {}",
        paths.len(),
        username,
        output.display()
    );
    Ok(paths)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use commande_core::{OrderDraft, OrderTimestamp};

    use super::*;

    fn config(dir: &Path) -> CommandeConfig {
        let data = dir.join("data").display().to_string();
        CommandeConfig::from_lookup(|key| (key == "COMMANDE_DATA_DIR").then(|| data.clone()))
            .unwrap()
    }

    async fn seed(config: &CommandeConfig, timestamps: &[&str]) {
        let store = OrderStore::new(config.data_dir.clone());
        let alice = Username::parse("alice").unwrap();
        for ts in timestamps {
            let record = OrderDraft {
                product: "Poulet".to_string(),
                unit: "Piece".to_string(),
                depot: "Frozen".to_string(),
                quantity: "4".to_string(),
                ..OrderDraft::default()
            }
            .validate(alice.clone(), OrderTimestamp::parse(ts).unwrap())
            .unwrap();
            store.append(&alice, record).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_show_returns_history_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        seed(&config, &["2024-01-01 10:00:00"]).await;

        let table = show(&config, "alice").await.unwrap();
        assert_eq!(table.len(), 1);
        assert!(show(&config, "bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_writes_one_file_per_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        seed(&config, &["2024-01-01 10:00:00", "2024-01-01 10:00:00"]).await;

        let paths = export(&config, "alice", Some(dir.path().join("out")))
            .await
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("alice_2024-01-01 10-00-00.csv"));
        assert!(paths[1].ends_with("alice_2024-01-01 10-00-00_2.csv"));
    }

    #[tokio::test]
    async fn test_invalid_username_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        assert!(matches!(
            show(&config, "../alice").await,
            Err(HistoryError::InvalidUsername(_))
        ));
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let table = OrderTable {
            headers: vec!["product", "unit"],
            rows: vec![vec!["Poulet fermier".to_string(), "Piece".to_string()]],
        };
        let text = format_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "product         unit");
        assert_eq!(lines[1], "Poulet fermier  Piece");
    }
}
