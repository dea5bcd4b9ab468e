//! Display-only unit conversion estimates.
//!
//! An estimate converts the ordered quantity into the other unit using a
//! fixed product factor. It is shown to the operator while filling the form
//! and is never stored, posted or exported.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::Quantity;
use super::unit::Unit;

/// Error building [`EstimateFactors`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("conversion factor {name} must be greater than zero (got {value})")]
pub struct FactorError {
    /// Name of the offending factor.
    pub name: &'static str,
    /// Rejected value.
    pub value: Decimal,
}

/// Conversion factors between pieces and kilograms.
///
/// Defaults: 1 piece ≈ 1.5 kg, 1 kg ≈ 0.70 piece. The two factors are
/// configured independently and are not required to be reciprocal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateFactors {
    piece_to_kilogram: Decimal,
    kilogram_to_piece: Decimal,
}

impl EstimateFactors {
    /// Default kilograms per piece.
    pub const DEFAULT_PIECE_TO_KILOGRAM: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
    /// Default pieces per kilogram.
    pub const DEFAULT_KILOGRAM_TO_PIECE: Decimal = Decimal::from_parts(70, 0, 0, false, 2);

    /// Create a factor set.
    ///
    /// # Errors
    ///
    /// Returns `FactorError` if either factor is zero or negative.
    pub fn new(piece_to_kilogram: Decimal, kilogram_to_piece: Decimal) -> Result<Self, FactorError> {
        if piece_to_kilogram <= Decimal::ZERO {
            return Err(FactorError {
                name: "piece_to_kilogram",
                value: piece_to_kilogram,
            });
        }
        if kilogram_to_piece <= Decimal::ZERO {
            return Err(FactorError {
                name: "kilogram_to_piece",
                value: kilogram_to_piece,
            });
        }
        Ok(Self {
            piece_to_kilogram,
            kilogram_to_piece,
        })
    }

    /// Kilograms per piece.
    #[must_use]
    pub const fn piece_to_kilogram(&self) -> Decimal {
        self.piece_to_kilogram
    }

    /// Pieces per kilogram.
    #[must_use]
    pub const fn kilogram_to_piece(&self) -> Decimal {
        self.kilogram_to_piece
    }

    /// Convert `quantity` expressed in `unit` into the opposite unit.
    ///
    /// Returns `None` if the product does not fit in a `Decimal`.
    #[must_use]
    pub fn estimate(&self, unit: Unit, quantity: Quantity) -> Option<Estimate> {
        let factor = match unit {
            Unit::Piece => self.piece_to_kilogram,
            Unit::Kilogram => self.kilogram_to_piece,
        };
        let value = quantity.value().checked_mul(factor)?;
        Some(Estimate {
            value,
            unit: unit.opposite(),
        })
    }
}

impl Default for EstimateFactors {
    fn default() -> Self {
        Self {
            piece_to_kilogram: Self::DEFAULT_PIECE_TO_KILOGRAM,
            kilogram_to_piece: Self::DEFAULT_KILOGRAM_TO_PIECE,
        }
    }
}

/// A converted quantity, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub value: Decimal,
    pub unit: Unit,
}

impl Estimate {
    /// Value rounded to two decimals, e.g. `7.00`.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut value = self.value.round_dp(2);
        value.rescale(2);
        value
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rounded(), self.unit.label())
    }
}
