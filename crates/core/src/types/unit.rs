//! Order line enums: the ordered unit and the depot it ships from.
//!
//! Both enums serialize to their English variant names. Deserialization and
//! `FromStr` also accept the labels written by the first generation of the
//! order form (`Pcs`/`KG`, `Frais`/`Surgelé`) so that old history files load.

use serde::{Deserialize, Serialize};

/// Unit an order quantity is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Counted pieces.
    #[serde(alias = "Pcs")]
    Piece,
    /// Weight in kilograms.
    #[serde(alias = "KG")]
    Kilogram,
}

impl Unit {
    /// All units, in form display order.
    pub const ALL: [Self; 2] = [Self::Piece, Self::Kilogram];

    /// The other unit (the one an estimate converts into).
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Piece => Self::Kilogram,
            Self::Kilogram => Self::Piece,
        }
    }

    /// Canonical name, as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Piece => "Piece",
            Self::Kilogram => "Kilogram",
        }
    }

    /// Short operator-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Piece => "Pcs",
            Self::Kilogram => "KG",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Piece" | "Pcs" => Ok(Self::Piece),
            "Kilogram" | "KG" => Ok(Self::Kilogram),
            _ => Err(format!("invalid unit: {s}")),
        }
    }
}

/// Storage condition of the depot an order line ships from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Depot {
    /// Chilled goods.
    #[serde(alias = "Frais")]
    Fresh,
    /// Frozen goods.
    #[serde(alias = "Surgelé")]
    Frozen,
}

impl Depot {
    /// All depots, in form display order.
    pub const ALL: [Self; 2] = [Self::Fresh, Self::Frozen];

    /// Canonical name, as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::Frozen => "Frozen",
        }
    }

    /// Operator-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fresh => "Frais",
            Self::Frozen => "Surgelé",
        }
    }
}

impl std::fmt::Display for Depot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Depot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fresh" | "Frais" => Ok(Self::Fresh),
            "Frozen" | "Surgelé" => Ok(Self::Frozen),
            _ => Err(format!("invalid depot: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_opposite() {
        assert_eq!(Unit::Piece.opposite(), Unit::Kilogram);
        assert_eq!(Unit::Kilogram.opposite(), Unit::Piece);
    }

    #[test]
    fn test_unit_from_str_accepts_legacy_labels() {
        assert_eq!("Piece".parse::<Unit>().unwrap(), Unit::Piece);
        assert_eq!("Pcs".parse::<Unit>().unwrap(), Unit::Piece);
        assert_eq!("KG".parse::<Unit>().unwrap(), Unit::Kilogram);
        assert!("kg".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_serializes_canonical_name() {
        assert_eq!(serde_json::to_string(&Unit::Kilogram).unwrap(), "\"Kilogram\"");
        let legacy: Unit = serde_json::from_str("\"Pcs\"").unwrap();
        assert_eq!(legacy, Unit::Piece);
    }

    #[test]
    fn test_depot_legacy_labels() {
        let fresh: Depot = serde_json::from_str("\"Frais\"").unwrap();
        let frozen: Depot = serde_json::from_str("\"Surgelé\"").unwrap();
        assert_eq!(fresh, Depot::Fresh);
        assert_eq!(frozen, Depot::Frozen);
        assert_eq!("Surgelé".parse::<Depot>().unwrap(), Depot::Frozen);
    }

    #[test]
    fn test_depot_display() {
        assert_eq!(Depot::Frozen.to_string(), "Frozen");
        assert_eq!(Depot::Frozen.label(), "Surgelé");
    }
}
