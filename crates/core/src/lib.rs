//! Commande Core - Shared domain types library.
//!
//! This crate provides the types shared by all Commande components:
//! - `server` - Order-taking web application
//! - `cli` - Command-line tools for credentials, history and exports
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no file access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Usernames, order records, units, quantities, timestamps,
//!   stored credentials and the unit-conversion estimator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
