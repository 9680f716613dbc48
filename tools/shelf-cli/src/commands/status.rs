//! Report configuration presence and check connectivity to the collection.

use anyhow::{bail, Result};
use shelf_catalog::check_status;

use super::StatusArgs;
use crate::context::Context;
use crate::output::status_badge;

fn yes_no(present: bool) -> &'static str {
    if present {
        "set"
    } else {
        "missing"
    }
}

/// Run the status command.
pub async fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let config = ctx.showcase_config()?;
    let logger = ctx.logger("catalog");

    let spinner = ctx.output.spinner("Probing content service...");
    let report = check_status(ctx.transport()?, &config, &logger).await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&report);
    } else {
        ctx.output.header("Status");
        ctx.output.kv("NOTION_API_KEY", yes_no(report.env.has_notion_api_key));
        ctx.output.kv("NOTION_DATABASE_ID", yes_no(report.env.has_database_id));

        if !report.notion.attempted {
            ctx.output.kv("Connectivity", &status_badge("skipped"));
        } else if report.ok {
            ctx.output.kv("Connectivity", &status_badge("ok"));
            if let Some(results) = report.notion.results {
                ctx.output.kv("Results", &results.to_string());
            }
        } else {
            ctx.output.kv("Connectivity", &status_badge("failed"));
            if let Some(name) = &report.notion.error_name {
                ctx.output.kv("Error", name);
            }
            if let Some(message) = &report.notion.error_message {
                ctx.output.kv("Message", message);
            }
        }
    }

    if !report.ok {
        bail!("Content service check failed");
    }
    Ok(())
}
