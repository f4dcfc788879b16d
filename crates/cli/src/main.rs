//! Hikyaku CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! hikyaku-cli migrate
//!
//! # Seed correction profiles and the carrier rate table
//! hikyaku-cli seed
//!
//! # Wipe existing data and re-seed
//! hikyaku-cli seed --reset
//!
//! # Show row counts for the seeded data
//! hikyaku-cli stats
//!
//! # Manage correction profiles
//! hikyaku-cli profile list
//! hikyaku-cli profile set-default --id 2
//! hikyaku-cli profile delete --id 3
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed correction profiles and carrier rates
//! - `stats` - Show statistics for the seeded data
//! - `profile` - List and manage correction profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hikyaku-cli")]
#[command(author, version, about = "Hikyaku CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed correction profiles and the carrier rate table
    Seed {
        /// Clear existing profiles and rates before seeding
        #[arg(long)]
        reset: bool,
    },
    /// Show row counts for profiles and rates
    Stats,
    /// Manage correction profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List all active correction profiles
    List,
    /// Make a profile the default used for quotes
    SetDefault {
        /// Profile ID
        #[arg(long)]
        id: i32,
    },
    /// Delete a profile (the active default cannot be deleted)
    Delete {
        /// Profile ID
        #[arg(long)]
        id: i32,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { reset } => commands::seed::run(reset).await?,
        Commands::Stats => commands::seed::stats().await?,
        Commands::Profile { action } => match action {
            ProfileAction::List => commands::profile::list().await?,
            ProfileAction::SetDefault { id } => commands::profile::set_default(id).await?,
            ProfileAction::Delete { id } => commands::profile::delete(id).await?,
        },
    }
    Ok(())
}
