//! Core types for Commande.
//!
//! This module provides type-safe wrappers for the order-taking domain.

pub mod credential;
pub mod estimate;
pub mod order;
pub mod table;
pub mod timestamp;
pub mod unit;
pub mod username;

pub use credential::{CredentialFile, PasswordHashString, StoredCredential};
pub use estimate::{Estimate, EstimateFactors, FactorError};
pub use order::{OrderDraft, OrderError, OrderRecord, Quantity, QuantityError};
pub use table::OrderTable;
pub use timestamp::{OrderTimestamp, TimestampError};
pub use unit::{Depot, Unit};
pub use username::{Username, UsernameError};
