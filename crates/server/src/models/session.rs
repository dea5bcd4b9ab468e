//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use commande_core::Username;

/// Session-stored operator identity.
///
/// Minimal data stored in the session to identify the logged-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Operator username, owner of the order history.
    pub username: Username,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in operator.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for a one-shot message shown on the next page render.
    pub const FLASH: &str = "flash";
}
