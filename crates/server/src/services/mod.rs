//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Operator authentication against the credential file
//! - `orders` - Order submission (validate, deliver, commit, export)
//! - `webhook` - Signed JSON delivery of each order
//! - `export` - Per-record CSV files and whole-history CSV downloads

pub mod auth;
pub mod export;
pub mod orders;
pub mod webhook;

pub use auth::{AuthError, CredentialStore};
pub use export::{CsvExporter, ExportError};
pub use orders::{ExportOutcome, OrderService, SubmitError, Submission};
pub use webhook::{WebhookClient, WebhookError};
