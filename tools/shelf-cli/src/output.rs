//! Output formatting for the CLI.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal output, styled for humans or plain JSON.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Human-readable lines are suppressed when JSON is requested.
    fn human(&self) -> bool {
        !self.json
    }

    pub fn success(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("✓").green(), msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.human() {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    /// Errors are always printed; as a JSON object in JSON mode.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Verbose-only diagnostics on stderr.
    pub fn debug(&self, msg: &str) {
        if self.verbose && self.human() {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if self.human() {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Pretty-printed JSON on stdout.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(rendered) = serde_json::to_string_pretty(value) {
            println!("{}", rendered);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.human() {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// One fixed-width row; overlong cells are cut with an ellipsis.
    pub fn table_row(&self, cells: &[&str], widths: &[usize]) {
        if !self.human() {
            return;
        }
        let row: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, &width)| format!("{:width$}", truncate(cell, width), width = width))
            .collect();
        println!("  {}", row.join("  "));
    }

    /// Steady-ticking spinner, hidden in JSON mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if !self.human() {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Colored badge for a health or source state.
pub fn status_badge(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "ok" | "live" | "healthy" => style(status).green().to_string(),
        "unconfigured" | "truncated" | "skipped" => style(status).yellow().to_string(),
        "failed" | "error" | "fallback" => style(status).red().to_string(),
        _ => status.to_string(),
    }
}

/// Binary-prefixed size, e.g. `2.00 KB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
