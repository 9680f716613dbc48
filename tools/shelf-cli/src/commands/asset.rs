//! Resolve an image through the signed-asset proxy.

use anyhow::{Context as _, Result};
use shelf_assets::{AssetQuery, AssetResolver};

use super::AssetArgs;
use crate::context::Context;
use crate::output::format_bytes;

/// Run the asset command.
pub async fn run(args: AssetArgs, ctx: &Context) -> Result<()> {
    let config = ctx.showcase_config()?;
    let resolver = AssetResolver::new(ctx.transport()?, &config);
    let logger = ctx.logger("assets");

    let query = AssetQuery::parse(&args.query);
    ctx.output.debug(&format!("{:?}", query));
    if query.asset_ref().is_some() && !resolver.can_refresh() {
        ctx.output.warn("Credentials not set; expired URLs cannot be refreshed");
    }

    let spinner = ctx.output.spinner("Fetching image...");
    let result = resolver.resolve(&query, &logger).await;
    spinner.finish_and_clear();

    let asset = result.map_err(|err| anyhow::anyhow!("{} (HTTP {})", err, err.status_code()))?;

    let path = ctx.resolve_path(&args.output);
    std::fs::write(&path, &asset.body)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "path": path.display().to_string(),
            "bytes": asset.body.len(),
            "contentType": asset.content_type,
            "cacheControl": asset.cache_control,
            "refreshed": asset.refreshed,
        }));
        return Ok(());
    }

    ctx.output.header("Asset");
    ctx.output.kv("Content-Type", &asset.content_type);
    ctx.output.kv("Cache-Control", &asset.cache_control);
    ctx.output.kv("Refreshed", if asset.refreshed { "yes" } else { "no" });
    ctx.output.kv("Size", &format_bytes(asset.body.len() as u64));
    println!();
    ctx.output.success(&format!("Wrote {}", path.display()));
    Ok(())
}
