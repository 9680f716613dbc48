//! CLI configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shelf_core::{
    ShowcaseConfig, ENV_ALLOW_PRIVATE_ORIGINS, ENV_API_BASE, ENV_API_KEY, ENV_CATALOG_FALLBACK,
    ENV_DATABASE_ID, ENV_FETCH_TIMEOUT_MS, ENV_MANAGED_HOSTS, ENV_MAX_PAGES, ENV_NOTION_VERSION,
    ENV_PAGE_SIZE,
};

/// `shelf.toml`. Every value may be overridden by its environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub notion: NotionSection,

    #[serde(default)]
    pub catalog: CatalogSection,

    #[serde(default)]
    pub assets: AssetsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotionSection {
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub api_base: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    /// `sample` or `strict`.
    pub fallback: Option<String>,
    pub page_size: Option<u32>,
    pub max_pages: Option<u32>,
    pub fetch_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsSection {
    pub managed_hosts: Option<Vec<String>>,
    pub allow_private_origins: Option<bool>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// File value for an environment key, rendered as the environment
    /// would carry it.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            ENV_API_KEY => self.notion.api_key.clone(),
            ENV_DATABASE_ID => self.notion.database_id.clone(),
            ENV_API_BASE => self.notion.api_base.clone(),
            ENV_NOTION_VERSION => self.notion.version.clone(),
            ENV_CATALOG_FALLBACK => self.catalog.fallback.clone(),
            ENV_PAGE_SIZE => self.catalog.page_size.map(|v| v.to_string()),
            ENV_MAX_PAGES => self.catalog.max_pages.map(|v| v.to_string()),
            ENV_FETCH_TIMEOUT_MS => self.catalog.fetch_timeout_ms.map(|v| v.to_string()),
            ENV_MANAGED_HOSTS => self.assets.managed_hosts.as_ref().map(|v| v.join(",")),
            ENV_ALLOW_PRIVATE_ORIGINS => self.assets.allow_private_origins.map(|v| v.to_string()),
            _ => None,
        }
    }

    /// Merge with `env`, which wins for every non-blank value.
    pub fn showcase_config_with<F>(&self, env: F) -> Result<ShowcaseConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        ShowcaseConfig::from_lookup(|key| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| self.get(key))
        })
        .context("Invalid showcase configuration")
    }

    pub fn showcase_config(&self) -> Result<ShowcaseConfig> {
        self.showcase_config_with(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use shelf_core::CatalogFallback;

    use super::*;

    const SAMPLE: &str = r#"
[notion]
api_key = "secret_file"
database_id = "db_file"

[catalog]
fallback = "strict"
page_size = 50

[assets]
managed_hosts = ["*.example-cdn.com"]
"#;

    #[test]
    fn test_file_values() {
        let file: CliConfig = toml::from_str(SAMPLE).unwrap();
        let config = file.showcase_config_with(|_| None).unwrap();

        assert_eq!(config.credentials(), Some(("secret_file", "db_file")));
        assert_eq!(config.fallback, CatalogFallback::Strict);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.managed_hosts, vec!["*.example-cdn.com".to_string()]);
    }

    #[test]
    fn test_env_overrides_file() {
        let file: CliConfig = toml::from_str(SAMPLE).unwrap();
        let config = file
            .showcase_config_with(|key| match key {
                ENV_DATABASE_ID => Some("db_env".to_string()),
                ENV_API_KEY => Some("  ".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.credentials(), Some(("secret_file", "db_env")));
    }

    #[test]
    fn test_empty_file_is_unconfigured() {
        let config = CliConfig::default().showcase_config_with(|_| None).unwrap();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let file: CliConfig = toml::from_str("[catalog]\nfallback = \"loud\"\n").unwrap();
        assert!(file.showcase_config_with(|_| None).is_err());
    }
}
