//! myhygia CLI - Catalog, cart and asset tools.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! myhygia catalog list --category fantaisie
//! myhygia catalog show calot-floral-elegant
//!
//! # Drive the cart stored in .myhygia/storage.json
//! myhygia cart add 1 -q 2
//! myhygia cart update 1 3
//! myhygia cart show
//! myhygia cart clear
//!
//! # Shrink product photos before deploying
//! myhygia images optimize --root assets/images
//! ```
//!
//! # Commands
//!
//! - `catalog` - List and inspect products
//! - `cart` - Show and mutate the persisted cart
//! - `images optimize` - Downscale and recompress JPEG/PNG assets in place

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use myhygia_core::ProductId;
use myhygia_storefront::{FileStore, StoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "myhygia")]
#[command(author, version, about = "myhygia storefront tools")]
struct Cli {
    /// Key-value store file backing the cart
    #[arg(
        long,
        global = true,
        env = "MYHYGIA_STORE_PATH",
        default_value = ".myhygia/storage.json"
    )]
    store: PathBuf,

    /// YAML product list to use instead of the built-in catalog
    #[arg(long, global = true, env = "MYHYGIA_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List and inspect products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Show and mutate the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Build-time image tools
    Images {
        #[command(subcommand)]
        action: ImagesAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Category filter (`tous` for everything)
        #[arg(short, long)]
        category: Option<String>,

        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
    /// Show one product by id or slug
    Show { product: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add a product
    Add {
        product_id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { product_id: ProductId },
    /// Set a product's quantity (0 or less removes it)
    Update {
        product_id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ImagesAction {
    /// Downscale and recompress JPEG/PNG files in place
    Optimize {
        /// Directory scanned recursively
        #[arg(long, default_value = "assets/images")]
        root: PathBuf,

        /// Images wider than this are scaled down
        #[arg(long, default_value_t = commands::images::DEFAULT_MAX_WIDTH)]
        max_width: u32,

        /// JPEG quality (1-100)
        #[arg(
            long,
            default_value_t = commands::images::DEFAULT_JPEG_QUALITY,
            value_parser = clap::value_parser!(u8).range(1..=100)
        )]
        quality: u8,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "myhygia_cli=info,myhygia_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => {
            let catalog = commands::catalog::load(cli.catalog.as_deref()).await?;
            let config = StoreConfig::from_env()?;
            match action {
                CatalogAction::List { category, featured } => {
                    commands::catalog::list(&catalog, &config, category.as_deref(), featured);
                }
                CatalogAction::Show { product } => {
                    commands::catalog::show(&catalog, &config, &product)?;
                }
            }
        }
        Commands::Cart { action } => {
            let catalog = commands::catalog::load(cli.catalog.as_deref()).await?;
            let config = StoreConfig::from_env()?;
            let mut cart = commands::cart::open(FileStore::new(cli.store), catalog, config)?;
            match action {
                CartAction::Show => {}
                CartAction::Add {
                    product_id,
                    quantity,
                } => {
                    cart.add_item(product_id, quantity)?;
                }
                CartAction::Remove { product_id } => cart.remove_item(product_id)?,
                CartAction::Update {
                    product_id,
                    quantity,
                } => cart.update_quantity(product_id, quantity)?,
                CartAction::Clear => cart.clear_cart()?,
            }
            commands::cart::show(&cart)?;
        }
        Commands::Images { action } => match action {
            ImagesAction::Optimize {
                root,
                max_width,
                quality,
            } => {
                let options = commands::images::OptimizeOptions {
                    root,
                    max_width,
                    quality,
                };
                commands::images::optimize(&options).await?;
            }
        },
    }
    Ok(())
}
