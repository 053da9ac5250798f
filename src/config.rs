use crate::paths;
use crate::presentation::EmptyListPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server root, e.g. http://localhost:8088
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix of the REST API
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Per-request timeout; unset means the HTTP client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Where downloaded artifacts go (defaults to the user download dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Sizes cycled through with +/-
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<u32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// What an empty history looks like: "empty_state" or "table"
    #[serde(default)]
    pub empty_list: EmptyListPolicy,
}

fn default_base_url() -> String {
    "http://localhost:8088".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_page_size_options() -> Vec<u32> {
    vec![10, 20, 50, 100]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            access_token: None,
            request_timeout_secs: None,
            download_dir: None,
            pagination: PaginationConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the default file, or return default if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path, or return default if it doesn't exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Save config to the default file.
    pub fn save(&self) -> Result<()> {
        paths::ensure_config_dir()?;
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get the config file path.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(paths::config_dir()?.join("config.toml"))
    }

    /// Get the download directory, falling back to the platform default.
    pub fn download_dir(&self) -> Result<PathBuf> {
        match &self.download_dir {
            Some(dir) => Ok(paths::expand_tilde(dir)),
            None => paths::default_download_dir(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        access_token: Option<String>,
        page_size: Option<u32>,
    ) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if access_token.is_some() {
            self.access_token = access_token;
        }
        if let Some(size) = page_size {
            self.pagination.default_page_size = size;
        }
        self
    }

    /// Validate the configuration, normalizing the page size options.
    pub fn validate(&mut self) -> Result<()> {
        reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.base_url))?;

        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            self.api_prefix.insert(0, '/');
        }
        let trimmed = self.api_prefix.trim_end_matches('/').len();
        self.api_prefix.truncate(trimmed);

        if self.pagination.default_page_size == 0 {
            anyhow::bail!("default_page_size must be greater than 0");
        }
        if self.pagination.page_size_options.iter().any(|&s| s == 0) {
            anyhow::bail!("page_size_options must all be greater than 0");
        }

        let options = &mut self.pagination.page_size_options;
        if !options.contains(&self.pagination.default_page_size) {
            options.push(self.pagination.default_page_size);
        }
        options.sort_unstable();
        options.dedup();

        if self.request_timeout_secs == Some(0) {
            anyhow::bail!("request_timeout_secs must be greater than 0 when set");
        }

        paths::validate_dir(&self.download_dir()?)?;

        Ok(())
    }
}
