//! Gilded CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! gilded-cli migrate
//!
//! # Seed the catalog with sample jewelry
//! gilded-cli seed
//!
//! # Create a shopper account
//! gilded-cli user create -u asha -e asha@example.com -p "a strong password"
//!
//! # Delete expired pending orders
//! gilded-cli purge-orders --ttl-secs 3600
//! ```
//!
//! # Environment Variables
//!
//! - `GILDED_DATABASE_URL` (or `DATABASE_URL`) - `SQLite` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gilded-cli")]
#[command(author, version, about = "Gilded CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with sample jewelry
    Seed,
    /// Manage shopper accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Delete expired pending orders
    PurgeOrders {
        /// Treat pending orders older than this many seconds as expired
        #[arg(long, default_value = "3600")]
        ttl_secs: u64,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new shopper account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (min 8 characters)
        #[arg(short, long)]
        password: String,
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
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
            } => {
                commands::user::create(&username, &email, &password).await?;
            }
        },
        Commands::PurgeOrders { ttl_secs } => commands::purge::run(ttl_secs).await?,
    }
    Ok(())
}
