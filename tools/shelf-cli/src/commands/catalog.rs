//! Fetch and list the product catalog.

use anyhow::{bail, Result};
use shelf_catalog::{CatalogReply, CatalogSource, CatalogSync};

use super::CatalogArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let config = ctx.showcase_config()?;
    let sync = CatalogSync::new(ctx.transport()?, &config);
    let logger = ctx.logger("catalog");

    let spinner = ctx.output.spinner("Fetching catalog...");
    let snapshot = sync.fetch_catalog(&logger).await;
    spinner.finish_and_clear();

    let source = snapshot.source.clone();
    let mut products = match snapshot.into_reply(config.fallback) {
        CatalogReply::Products(products) => products,
        CatalogReply::Failed { error } => bail!("Catalog fetch failed: {}", error),
    };
    if let Some(limit) = args.limit {
        products.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "source": source,
            "products": products,
        }));
        return Ok(());
    }

    ctx.output.header("Catalog");
    match &source {
        CatalogSource::Live { pages, truncated } => {
            ctx.output.kv("Source", &status_badge("live"));
            ctx.output.kv("Pages", &pages.to_string());
            if *truncated {
                ctx.output.warn("Page cap reached; older records were not fetched");
            }
        }
        CatalogSource::Unconfigured => {
            ctx.output.kv("Source", &status_badge("unconfigured"));
            ctx.output.warn("Credentials not set; showing the sample catalog");
        }
        CatalogSource::Fallback { reason, aborted } => {
            ctx.output.kv("Source", &status_badge("fallback"));
            ctx.output.warn(&format!(
                "{} ({}); showing the sample catalog",
                reason,
                if *aborted { "timed out" } else { "failed" }
            ));
        }
    }
    println!();

    let widths = [28, 14, 12, 10, 10];
    ctx.output.table_row(&["NAME", "BRAND", "CATEGORY", "PRICE", "DATE"], &widths);
    for product in &products {
        let price = format!("{:.2}", product.price);
        ctx.output.table_row(
            &[
                product.name.as_str(),
                product.brand.as_deref().unwrap_or("-"),
                product.category.as_str(),
                price.as_str(),
                product.date.get(..10).unwrap_or(&product.date),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.success(&format!("{} products", products.len()));
    Ok(())
}
