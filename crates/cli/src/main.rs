//! Commande CLI - operator and order history management.
//!
//! # Usage
//!
//! ```bash
//! # Add an operator
//! commande-cli users add -u alice -p 'correct horse battery'
//!
//! # Hash and import a plaintext user file from the first order form
//! commande-cli users import-legacy user.json
//!
//! # Print an operator's order history
//! commande-cli history show -u alice
//!
//! # Write one CSV file per historical order
//! commande-cli history export -u alice -o exports/
//!
//! # Convert a quantity with the configured factors
//! commande-cli estimate --unit Kilogram --quantity 10
//! ```
//!
//! All commands read the same environment configuration as the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commande_server::CommandeConfig;

mod commands;

#[derive(Parser)]
#[command(name = "commande-cli")]
#[command(author, version, about = "Commande CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage operator credentials
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Inspect and export order histories
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Convert a quantity into the other unit
    Estimate {
        /// Unit of the quantity (`Piece` or `Kilogram`)
        #[arg(long)]
        unit: String,

        /// Quantity to convert
        #[arg(long)]
        quantity: String,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// Add a new operator
    Add {
        /// Operator username
        #[arg(short, long)]
        username: String,

        /// Operator password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Import a plaintext `{"users": [{"username", "password"}]}` file
    ImportLegacy {
        /// Path of the legacy user file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Print an operator's order history
    Show {
        /// Operator username
        #[arg(short, long)]
        username: String,
    },
    /// Write one CSV file per order in an operator's history
    Export {
        /// Operator username
        #[arg(short, long)]
        username: String,

        /// Output directory (defaults to `COMMANDE_EXPORT_DIR`, then `.`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CommandeConfig::from_env()?;

    match cli.command {
        Commands::Users { action } => match action {
            UsersAction::Add { username, password } => {
                commands::users::add(&config, &username, &password).await?;
            }
            UsersAction::ImportLegacy { path } => {
                commands::users::import_legacy(&config, &path).await?;
            }
        },
        Commands::History { action } => match action {
            HistoryAction::Show { username } => {
                commands::history::show(&config, &username).await?;
            }
            HistoryAction::Export { username, output } => {
                commands::history::export(&config, &username, output).await?;
            }
        },
        Commands::Estimate { unit, quantity } => {
            commands::estimate::run(&config, &unit, &quantity)?;
        }
    }
    Ok(())
}
