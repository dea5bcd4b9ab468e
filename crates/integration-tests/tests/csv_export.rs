//! Integration tests for per-record CSV export.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use commande_core::{OrderDraft, OrderRecord, OrderTimestamp, Username};
use commande_server::services::export::CsvExporter;

fn record(ts: &str, notes: &str) -> OrderRecord {
    OrderDraft {
        product: "Poulet".to_string(),
        unit: "Kilogram".to_string(),
        depot: "Fresh".to_string(),
        quantity: "10".to_string(),
        packaging: "Caisse".to_string(),
        notes: notes.to_string(),
    }
    .validate(
        Username::parse("alice").unwrap(),
        OrderTimestamp::parse(ts).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_export_file_name_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path().join("exports"));

    let path = exporter
        .export_record(&record("2024-01-01 10:00:00", "sans peau"))
        .await
        .unwrap();

    assert_eq!(
        path,
        dir.path().join("exports").join("alice_2024-01-01 10-00-00.csv")
    );

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp,product,unit,depot,quantity,packaging,notes,username")
    );
    assert_eq!(
        lines.next(),
        Some("2024-01-01 10:00:00,Poulet,Kilogram,Fresh,10,Caisse,sans peau,alice")
    );
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_same_second_exports_do_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path());

    let first = exporter
        .export_record(&record("2024-01-01 10:00:00", "premier"))
        .await
        .unwrap();
    let second = exporter
        .export_record(&record("2024-01-01 10:00:00", "second"))
        .await
        .unwrap();

    assert_ne!(first, second);
    assert!(second.ends_with("alice_2024-01-01 10-00-00_2.csv"));
    assert!(std::fs::read_to_string(first).unwrap().contains("premier"));
    assert!(std::fs::read_to_string(second).unwrap().contains("second"));
}

#[tokio::test]
async fn test_export_whole_history() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path());

    let paths = exporter
        .export_history(&[
            record("2024-01-01 10:00:00", ""),
            record("2024-01-02 11:30:15", ""),
        ])
        .await
        .unwrap();

    assert_eq!(paths.len(), 2);
    assert!(paths[1].ends_with("alice_2024-01-02 11-30-15.csv"));
}
