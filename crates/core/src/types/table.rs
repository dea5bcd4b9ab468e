//! Tabular projection of an order history for display.

use serde::Serialize;

use super::order::OrderRecord;

/// A history rendered as header + string rows.
///
/// Only record fields appear as columns; estimates are never part of the
/// projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl OrderTable {
    /// Project records, preserving their order.
    #[must_use]
    pub fn from_records(records: &[OrderRecord]) -> Self {
        Self {
            headers: OrderRecord::FIELD_NAMES.to_vec(),
            rows: records
                .iter()
                .map(|record| record.field_values().to_vec())
                .collect(),
        }
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{OrderDraft, OrderTimestamp, Username};

    fn record(product: &str) -> OrderRecord {
        OrderDraft {
            product: product.to_string(),
            unit: "Piece".to_string(),
            depot: "Frozen".to_string(),
            quantity: "3".to_string(),
            ..OrderDraft::default()
        }
        .validate(
            Username::parse("alice").unwrap(),
            OrderTimestamp::parse("2024-02-02 12:00:00").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_history() {
        let table = OrderTable::from_records(&[]);
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 8);
    }

    #[test]
    fn test_rows_preserve_order() {
        let table = OrderTable::from_records(&[record("Poulet"), record("Dinde")]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][1], "Poulet");
        assert_eq!(table.rows[1][1], "Dinde");
    }

    #[test]
    fn test_no_estimate_columns() {
        let table = OrderTable::from_records(&[record("Poulet")]);
        assert!(
            !table
                .headers
                .iter()
                .any(|h| h.to_lowercase().contains("estim"))
        );
    }
}
