//! EECOL CLI - Catalog inspection and offline page decoration.
//!
//! # Usage
//!
//! ```bash
//! # Print the category tree
//! eecol-cli categories
//!
//! # One category by URL key
//! eecol-cli category wire-cable
//!
//! # Decorate a saved page
//! eecol-cli decorate page.html --offline
//!
//! # Product lookups
//! eecol-cli lookup product ABC-123
//! eecol-cli lookup inventory 1001 123456 SWR
//!
//! # Format a price
//! eecol-cli format-price 1234.5 CAD
//! ```
//!
//! Configuration comes from the same environment variables as the
//! storefront server (see `eecol_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "eecol-cli")]
#[command(author, version, about = "EECOL storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the category tree
    Categories {
        /// Print the raw taxonomy as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one category by URL key
    Category {
        /// Category URL key
        url_key: String,
    },
    /// Decorate a saved HTML page and print the result
    Decorate {
        /// Path to the HTML file
        file: String,

        /// Skip the eager phase (no category fetch)
        #[arg(long)]
        offline: bool,
    },
    /// Query the product lookup service
    Lookup {
        #[command(subcommand)]
        target: LookupTarget,
    },
    /// Format an amount in a currency
    FormatPrice {
        /// Amount, as numeric text
        amount: String,

        /// ISO 4217 currency code
        #[arg(default_value = "USD")]
        currency: String,
    },
}

#[derive(Subcommand)]
enum LookupTarget {
    /// One product by sku
    Product { sku: String },
    /// Products of a category
    Category {
        /// Category uid
        uid: String,

        /// Facet filters as a query string
        #[arg(short, long)]
        filters: Option<String>,
    },
    /// Customer inventory for a product
    Inventory {
        customer_id: String,
        product_id: String,
        product_line: String,
    },
    /// Customer pricing for a product
    Pricing {
        customer_id: String,
        product_id: String,
        product_line: String,

        /// Currency used to format the price
        #[arg(short, long, default_value = "USD")]
        currency: String,
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
    if let Commands::FormatPrice { amount, currency } = &cli.command {
        commands::price::print(amount, currency)?;
        return Ok(());
    }

    let state = commands::load_state()?;
    match cli.command {
        Commands::Categories { json } => commands::catalog::categories(&state, json).await?,
        Commands::Category { url_key } => commands::catalog::category(&state, &url_key).await?,
        Commands::Decorate { file, offline } => {
            commands::decorate::decorate(&state, &file, offline).await?;
        }
        Commands::Lookup { target } => match target {
            LookupTarget::Product { sku } => commands::catalog::lookup_product(&state, &sku).await?,
            LookupTarget::Category { uid, filters } => {
                commands::catalog::lookup_category(&state, &uid, filters.as_deref()).await?;
            }
            LookupTarget::Inventory {
                customer_id,
                product_id,
                product_line,
            } => {
                commands::catalog::lookup_inventory(&state, &customer_id, &product_id, &product_line)
                    .await?;
            }
            LookupTarget::Pricing {
                customer_id,
                product_id,
                product_line,
                currency,
            } => {
                commands::catalog::lookup_pricing(
                    &state,
                    &customer_id,
                    &product_id,
                    &product_line,
                    &currency,
                )
                .await?;
            }
        },
        Commands::FormatPrice { .. } => {}
    }
    Ok(())
}
