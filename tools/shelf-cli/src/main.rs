//! Shelf CLI - Developer tool for the product showcase.
//!
//! Commands:
//! - `shelf catalog` - Fetch and list the product catalog
//! - `shelf status` - Check configuration and content service connectivity
//! - `shelf asset` - Resolve an image through the signed-asset proxy
//! - `shelf dither` - Re-encode a local image with a dithering variant

mod commands;
mod config;
mod context;
mod output;
mod transport;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AssetArgs, CatalogArgs, DitherArgs, StatusArgs};

/// Shelf CLI - Inspect and exercise the product showcase
#[derive(Parser)]
#[command(name = "shelf")]
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

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the product catalog
    Catalog(CatalogArgs),

    /// Report configuration presence and check connectivity to the collection
    Status(StatusArgs),

    /// Resolve an image through the signed-asset proxy
    Asset(AssetArgs),

    /// Re-encode an image with a dithering variant
    Dither(DitherArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Status(args) => commands::status::run(args, &ctx).await,
        Commands::Asset(args) => commands::asset::run(args, &ctx).await,
        Commands::Dither(args) => commands::dither::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
