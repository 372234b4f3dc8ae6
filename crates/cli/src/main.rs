//! Tajeer CLI - offline quotes and configuration checks.
//!
//! # Usage
//!
//! ```bash
//! # Quote a configuration from a catalog file using the fallback rules
//! tajeer-cli quote --catalog catalog.yaml --product <id> --storage <id> \
//!     --color <id> --term 24 --condition refurbished --locale ar
//!
//! # Validate the storefront environment
//! tajeer-cli check-config
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tajeer_core::{ColorOptionId, Condition, LeaseTerm, Locale, ProductId, StorageOptionId};

mod commands;

#[derive(Parser)]
#[command(name = "tajeer-cli")]
#[command(author, version, about = "Tajeer CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a configuration from a catalog file
    Quote {
        /// Catalog of products (`.yaml`, `.yml` or `.json`)
        #[arg(long)]
        catalog: PathBuf,

        #[arg(long)]
        product: ProductId,

        #[arg(long)]
        storage: StorageOptionId,

        #[arg(long)]
        color: ColorOptionId,

        /// Lease term (`monthly`, `12`, `24`, `36`)
        #[arg(long)]
        term: LeaseTerm,

        /// Device condition (`new`, `refurbished`)
        #[arg(long, default_value = "new")]
        condition: Condition,

        /// Output language (`en`, `ar`)
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// Load the storefront configuration and report problems
    CheckConfig,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Quote {
            catalog,
            product,
            storage,
            color,
            term,
            condition,
            locale,
        } => {
            let request = commands::quote::QuoteArgs {
                product,
                storage,
                color,
                term,
                condition,
            };
            commands::quote::run(&catalog, &request, locale)?;
        }
        Commands::CheckConfig => commands::config::check()?,
    }
    Ok(())
}
