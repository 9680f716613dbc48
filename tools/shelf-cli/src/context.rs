//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use shelf_core::{RequestId, ShowcaseConfig};
use shelf_observability::{LogFormat, LogLevel, StructuredLogger};

use crate::config::CliConfig;
use crate::output::Output;
use crate::transport::ReqwestTransport;

/// Execution context for CLI commands.
pub struct Context {
    /// Configuration file contents, empty when none was found.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["shelf.toml", ".shelf.toml", "shelf.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// File configuration merged with the process environment.
    pub fn showcase_config(&self) -> Result<ShowcaseConfig> {
        let config = self.config.showcase_config()?;
        self.output.debug(&format!("{:?}", config));
        Ok(config)
    }

    pub fn transport(&self) -> Result<ReqwestTransport> {
        ReqwestTransport::new()
    }

    /// Human-format logger on stderr; warnings only unless verbose.
    pub fn logger(&self, component: &str) -> StructuredLogger {
        let level = if self.output.is_verbose() {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        };
        StructuredLogger::new(RequestId::generate())
            .with_component(component)
            .with_format(LogFormat::Human)
            .with_min_level(level)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
