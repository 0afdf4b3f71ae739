//! Cake Maker CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! cake-cli migrate
//!
//! # Replace the layer catalog with the built-in seed
//! cake-cli catalog reset
//! ```
//!
//! Both commands read `CAKE_DATABASE_URL` (or `DATABASE_URL`), like the API.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cake-cli")]
#[command(author, version, about = "Cake Maker CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage the layer catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Delete all layers and insert the built-in seed set
    Reset,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Reset => commands::catalog::reset().await?,
        },
    }
    Ok(())
}
