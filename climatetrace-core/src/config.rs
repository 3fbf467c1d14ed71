use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root of the production Climate TRACE API.
pub const DEFAULT_BASE_URL: &str = "https://api.climatetrace.org/v4";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://api.climatetrace.org/v4"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// API root; the production API is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// Configured API root, or the production one.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Store a new API root. Only absolute http(s) URLs are accepted.
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.base_url = Some(checked_base_url(url)?);
        Ok(())
    }

    /// Config that only points at `url`, without touching the file on disk.
    pub fn with_base_url(url: &str) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.set_base_url(url)?;
        Ok(cfg)
    }

    /// Go back to the production API.
    pub fn reset_base_url(&mut self) {
        self.base_url = None;
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(url) = cfg.base_url.take() {
            let url = checked_base_url(&url)
                .with_context(|| format!("Invalid base_url in config file: {}", path.display()))?;
            cfg.base_url = Some(url);
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "climatetrace", "climatetrace-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Absolute http(s) URL without a trailing slash.
fn checked_base_url(url: &str) -> Result<String> {
    let url = url.trim();
    let parsed = Url::parse(url).with_context(|| format!("Invalid base URL '{url}'"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Base URL must use http or https, got '{}'", parsed.scheme());
    }

    Ok(url.trim_end_matches('/').to_string())
}
