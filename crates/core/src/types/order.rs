//! Order records and the form draft they are validated from.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::timestamp::OrderTimestamp;
use super::unit::{Depot, Unit};
use super::username::Username;

/// Errors that can occur when parsing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a decimal number.
    #[error("quantity {0:?} is not a number")]
    Invalid(String),
    /// The value is zero or negative.
    #[error("quantity must be greater than zero (got {0})")]
    NotPositive(Decimal),
    /// The value exceeds what an operator may order in one line.
    #[error("quantity must not exceed {max} (got {value})")]
    TooLarge { value: Decimal, max: Decimal },
}

/// A strictly positive order quantity.
///
/// Zero and negative quantities are unrepresentable, so every estimate
/// derived from a `Quantity` is positive too.
///
/// ```
/// use commande_core::Quantity;
///
/// assert!(Quantity::parse("10").is_ok());
/// assert!(Quantity::parse("2,5").is_ok());
/// assert!(Quantity::parse("0").is_err());
/// assert!(Quantity::parse("-3").is_err());
/// assert!(Quantity::parse("2000000").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    /// Largest quantity accepted from operator input.
    pub const MAX_INPUT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

    /// Create a quantity from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` if `value <= 0`.
    pub fn new(value: Decimal) -> Result<Self, QuantityError> {
        if value <= Decimal::ZERO {
            return Err(QuantityError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Parse a quantity typed by an operator.
    ///
    /// Surrounding whitespace is ignored and a decimal comma is accepted.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Invalid` if the input is not a number,
    /// `QuantityError::NotPositive` if it is not greater than zero and
    /// `QuantityError::TooLarge` if it exceeds [`Self::MAX_INPUT`].
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let trimmed = s.trim().replace(',', ".");
        let value = trimmed
            .parse::<Decimal>()
            .map_err(|_| QuantityError::Invalid(s.to_owned()))?;
        if value > Self::MAX_INPUT {
            return Err(QuantityError::TooLarge {
                value,
                max: Self::MAX_INPUT,
            });
        }
        Self::new(value)
    }

    /// The decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = QuantityError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

/// Validation errors for a submitted order form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The product name is blank.
    #[error("product name is required")]
    MissingProduct,
    /// The unit is not one of the known units.
    #[error("{0}")]
    InvalidUnit(String),
    /// The depot is not one of the known depots.
    #[error("{0}")]
    InvalidDepot(String),
    /// The quantity failed validation.
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

/// Raw order form fields, as typed by the operator.
///
/// Presence and type checks only; there are no cross-field rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub depot: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub packaging: String,
    #[serde(default)]
    pub notes: String,
}

impl OrderDraft {
    /// Validate the draft and stamp it into an immutable record.
    ///
    /// # Errors
    ///
    /// Returns the first `OrderError` found, checking product, unit, depot
    /// and quantity in that order.
    pub fn validate(
        &self,
        username: Username,
        timestamp: OrderTimestamp,
    ) -> Result<OrderRecord, OrderError> {
        let product = self.product.trim();
        if product.is_empty() {
            return Err(OrderError::MissingProduct);
        }

        let unit: Unit = self.unit.parse().map_err(OrderError::InvalidUnit)?;
        let depot: Depot = self.depot.parse().map_err(OrderError::InvalidDepot)?;
        let quantity = Quantity::parse(&self.quantity)?;

        Ok(OrderRecord {
            timestamp,
            product: product.to_owned(),
            unit,
            depot,
            quantity,
            packaging: self.packaging.trim().to_owned(),
            notes: self.notes.trim().to_owned(),
            username,
        })
    }
}

/// A submitted order line.
///
/// Records are never mutated after creation. Estimates are not part of the
/// record: they are computed on demand for display only.
///
/// Deserialization accepts the French keys written by the first generation
/// of the order form; serialization always writes the English field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(alias = "Date et heure")]
    pub timestamp: OrderTimestamp,
    #[serde(alias = "Produit")]
    pub product: String,
    #[serde(alias = "Unité")]
    pub unit: Unit,
    #[serde(alias = "Dépôt")]
    pub depot: Depot,
    #[serde(alias = "Quantité")]
    pub quantity: Quantity,
    #[serde(default, alias = "Conditionnement")]
    pub packaging: String,
    #[serde(default, alias = "Autres spécifications")]
    pub notes: String,
    #[serde(alias = "Username")]
    pub username: Username,
}

impl OrderRecord {
    /// Field names, in export and display order.
    pub const FIELD_NAMES: [&'static str; 8] = [
        "timestamp",
        "product",
        "unit",
        "depot",
        "quantity",
        "packaging",
        "notes",
        "username",
    ];

    /// Field values rendered as text, aligned with [`Self::FIELD_NAMES`].
    #[must_use]
    pub fn field_values(&self) -> [String; 8] {
        [
            self.timestamp.to_string(),
            self.product.clone(),
            self.unit.to_string(),
            self.depot.to_string(),
            self.quantity.to_string(),
            self.packaging.clone(),
            self.notes.clone(),
            self.username.to_string(),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> OrderDraft {
        OrderDraft {
            product: "  Poulet ".to_string(),
            unit: "Kilogram".to_string(),
            depot: "Fresh".to_string(),
            quantity: "10".to_string(),
            packaging: "Caisse".to_string(),
            notes: String::new(),
        }
    }

    fn alice() -> Username {
        Username::parse("alice").unwrap()
    }

    fn ts() -> OrderTimestamp {
        OrderTimestamp::parse("2024-01-01 10:00:00").unwrap()
    }

    #[test]
    fn test_quantity_rejects_zero_and_negative() {
        assert_eq!(
            Quantity::parse("0"),
            Err(QuantityError::NotPositive(Decimal::ZERO))
        );
        assert!(matches!(
            Quantity::parse("-1.5"),
            Err(QuantityError::NotPositive(_))
        ));
    }

    #[test]
    fn test_quantity_rejects_garbage() {
        assert!(matches!(
            Quantity::parse("dix"),
            Err(QuantityError::Invalid(_))
        ));
        assert!(matches!(Quantity::parse(""), Err(QuantityError::Invalid(_))));
    }

    #[test]
    fn test_quantity_input_is_bounded() {
        assert!(Quantity::parse("1000000").is_ok());
        assert!(matches!(
            Quantity::parse("1000000.01"),
            Err(QuantityError::TooLarge { .. })
        ));
        assert!(matches!(
            Quantity::parse("79228162514264337593543950335"),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_quantity_accepts_decimal_comma() {
        let q = Quantity::parse(" 2,5 ").unwrap();
        assert_eq!(q.value(), Decimal::new(25, 1));
    }

    #[test]
    fn test_quantity_display_is_normalized() {
        assert_eq!(Quantity::parse("10.00").unwrap().to_string(), "10");
    }

    #[test]
    fn test_quantity_deserializes_from_number_or_string() {
        let from_number: Quantity = serde_json::from_str("10").unwrap();
        let from_string: Quantity = serde_json::from_str("\"10\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    #[test]
    fn test_validate_builds_trimmed_record() {
        let record = draft().validate(alice(), ts()).unwrap();
        assert_eq!(record.product, "Poulet");
        assert_eq!(record.unit, Unit::Kilogram);
        assert_eq!(record.depot, Depot::Fresh);
        assert_eq!(record.quantity.to_string(), "10");
        assert_eq!(record.username.as_str(), "alice");
        assert_eq!(record.timestamp, ts());
    }

    #[test]
    fn test_validate_missing_product() {
        let mut d = draft();
        d.product = "   ".to_string();
        assert_eq!(
            d.validate(alice(), ts()),
            Err(OrderError::MissingProduct)
        );
    }

    #[test]
    fn test_validate_invalid_unit_and_depot() {
        let mut d = draft();
        d.unit = "Litre".to_string();
        assert!(matches!(
            d.validate(alice(), ts()),
            Err(OrderError::InvalidUnit(_))
        ));

        let mut d = draft();
        d.depot = "Ambient".to_string();
        assert!(matches!(
            d.validate(alice(), ts()),
            Err(OrderError::InvalidDepot(_))
        ));
    }

    #[test]
    fn test_validate_non_positive_quantity() {
        let mut d = draft();
        d.quantity = "0".to_string();
        assert!(matches!(
            d.validate(alice(), ts()),
            Err(OrderError::Quantity(QuantityError::NotPositive(_)))
        ));
    }

    #[test]
    fn test_record_json_shape() {
        let record = draft().validate(alice(), ts()).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timestamp"], "2024-01-01 10:00:00");
        assert_eq!(value["unit"], "Kilogram");
        assert_eq!(value["depot"], "Fresh");
        assert_eq!(value["quantity"], "10");
        assert_eq!(value["username"], "alice");
        assert!(value.get("estimate").is_none());
    }

    #[test]
    fn test_record_loads_legacy_french_keys() {
        let legacy = r#"{
            "Date et heure": "2023-06-01 09:15:00",
            "Produit": "Poulet",
            "Unité": "Pcs",
            "Quantité": 12,
            "Dépôt": "Surgelé",
            "Conditionnement": "Sac",
            "Autres spécifications": "Livrer avant midi",
            "Username": "alice",
            "Estimation": 18.0,
            "Estimation_Unit": "KG"
        }"#;

        let record: OrderRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(record.unit, Unit::Piece);
        assert_eq!(record.depot, Depot::Frozen);
        assert_eq!(record.quantity.to_string(), "12");
        assert_eq!(record.notes, "Livrer avant midi");
    }

    #[test]
    fn test_field_values_align_with_names() {
        let record = draft().validate(alice(), ts()).unwrap();
        let values = record.field_values();
        assert_eq!(values.len(), OrderRecord::FIELD_NAMES.len());
        assert_eq!(values[0], "2024-01-01 10:00:00");
        assert_eq!(values[7], "alice");
    }
}
