//! CLI subcommands.

pub mod estimate;
pub mod history;
pub mod users;
