//! Waymark CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run site database migrations
//! wm-cli migrate
//!
//! # Seed the starter directory content
//! wm-cli seed
//!
//! # Seed content plus a demo account
//! wm-cli seed --demo-password "a long passphrase"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with starter categories and pages

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wm-cli")]
#[command(author, version, about = "Waymark CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with starter categories, pages, and an optional
    /// demo account
    Seed {
        /// Password for the `demo` account; skipped when absent
        #[arg(long)]
        demo_password: Option<String>,
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
        Commands::Seed { demo_password } => {
            commands::seed::run(demo_password.as_deref()).await?;
        }
    }
    Ok(())
}
