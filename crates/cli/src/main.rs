//! La Ruche d'Or CLI - seeding and health checks.
//!
//! # Usage
//!
//! ```bash
//! # Seed the default catalog into an empty products table
//! ruche-cli seed products
//!
//! # Re-seed even when products already exist
//! ruche-cli seed products --force
//!
//! # Verify table store and image bucket are reachable
//! ruche-cli check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ruche-cli")]
#[command(author, version, about = "La Ruche d'Or CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed initial data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Check connectivity to the hosted services
    Check,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the default catalog
    Products {
        /// Seed even when the products table is not empty
        #[arg(long)]
        force: bool,
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
    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Products { force } => commands::seed::products(force).await?,
        },
        Commands::Check => commands::check::run().await?,
    }
    Ok(())
}
