//! Estimate command.
//!
//! # Environment Variables
//!
//! - `COMMANDE_PIECE_TO_KG` - Kilograms per piece (default: 1.5)
//! - `COMMANDE_KG_TO_PIECE` - Pieces per kilogram (default: 0.70)

use thiserror::Error;

use commande_core::{Estimate, Quantity, QuantityError, Unit};
use commande_server::CommandeConfig;

/// Errors that can occur during the estimate command.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Unknown unit.
    #[error("{0}")]
    InvalidUnit(String),

    /// Invalid quantity.
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    /// The converted value does not fit in a decimal.
    #[error("estimate for {0} is out of range")]
    OutOfRange(String),
}

/// Convert `quantity` of `unit` with the configured factors and print it.
///
/// # Errors
///
/// Returns `EstimateError` if the unit or quantity does not parse, or if
/// the configured factor pushes the result out of range.
#[allow(clippy::print_stdout)]
pub fn run(config: &CommandeConfig, unit: &str, quantity: &str) -> Result<Estimate, EstimateError> {
    let unit: Unit = unit.parse().map_err(EstimateError::InvalidUnit)?;
    let quantity = Quantity::parse(quantity)?;

    let estimate = config
        .estimate_factors
        .estimate(unit, quantity)
        .ok_or_else(|| EstimateError::OutOfRange(format!("{quantity} {}", unit.label())))?;
    println!("{quantity} {} ≈ {estimate}", unit.label());

    Ok(estimate)
}
