//! Cart CLI - Command line front end for the shopping cart.
//!
//! Commands:
//! - `cart show` - Show the cart and its total
//! - `cart add` - Add one unit of a product
//! - `cart remove` - Remove a product entirely
//! - `cart update` - Set the amount of a product already in the cart
//! - `cart catalog` - Browse products with their amount in the cart

mod commands;
mod config;
mod context;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, CatalogArgs, RemoveArgs, UpdateArgs};
use config::Overrides;

/// Cart CLI - Manage a stock-checked shopping cart
#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Storefront API base URL
    #[arg(long, global = true)]
    api: Option<String>,

    /// Directory holding the persisted cart
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart contents and total
    Show,

    /// Add one unit of a product
    Add(AddArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Set the amount of a product in the cart
    Update(UpdateArgs),

    /// List catalog products with their amount in the cart
    Catalog(CatalogArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);
    let overrides = Overrides {
        api: cli.api,
        store_dir: cli.store_dir,
    };
    let ctx = context::Context::load(cli.config.as_deref(), overrides, output)?;

    let result = match cli.command {
        Commands::Show => commands::show::run(&ctx).await,
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Remove(args) => commands::remove::run(args, &ctx).await,
        Commands::Update(args) => commands::update::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
