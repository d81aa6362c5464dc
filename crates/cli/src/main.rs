//! Hotspots CLI - database migrations and seeding tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! hs-cli migrate
//!
//! # Create test_user1@test.com .. test_user10@test.com (password 123456)
//! hs-cli insert-test-users 10
//!
//! # Load fish species, replacing what is there
//! hs-cli seed-fish --file data/all-fish-species.json --clear
//!
//! # Load city locations
//! hs-cli seed-cities --file data/usa-cities-geo.json
//! ```
//!
//! All commands read `HOTSPOTS_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hs-cli")]
#[command(author, version, about = "Hotspots CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create numbered test users
    InsertTestUsers {
        /// How many users to create
        count: u32,
    },
    /// Load fish species from a JSON file
    SeedFish {
        /// Fixture file holding a JSON array of species
        #[arg(short, long, default_value = "data/all-fish-species.json")]
        file: PathBuf,

        /// Delete all fish species first
        #[arg(long)]
        clear: bool,
    },
    /// Load city locations from a JSON file
    SeedCities {
        /// Fixture file holding a JSON array of cities
        #[arg(short, long, default_value = "data/usa-cities-geo.json")]
        file: PathBuf,

        /// Delete all locations first
        #[arg(long)]
        clear: bool,
    },
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
        Commands::InsertTestUsers { count } => commands::users::insert_test_users(count).await?,
        Commands::SeedFish { file, clear } => commands::seed::fish(&file, clear).await?,
        Commands::SeedCities { file, clear } => commands::seed::cities(&file, clear).await?,
    }
    Ok(())
}
