use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;
use crate::fetch::{MAX_PAGE_SIZE, PAGE_SIZE};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `dexgrid=debug`. `RUST_LOG` wins.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// ~/.config/dexgrid/config.toml (Linux) or the platform equivalent
pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("dexgrid").join("config.toml"))
}

/// Default log location, next to other per-user caches.
pub fn default_log_path() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("dexgrid");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("dexgrid.log"))
}

impl Config {
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    /// Reads a config file. A missing or unparsable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Config::default();
        };

        Self::parse(&content).unwrap_or_default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.normalize();
        Ok(config)
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        page_size: Option<u32>,
        log_file: Option<PathBuf>,
    ) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        if let Some(size) = page_size {
            self.api.page_size = size;
        }
        if log_file.is_some() {
            self.log.file = log_file;
        }
        self.normalize();
        self
    }

    fn normalize(&mut self) {
        if self.api.page_size == 0 {
            self.api.page_size = PAGE_SIZE;
        }
        self.api.page_size = self.api.page_size.min(MAX_PAGE_SIZE);
        if self.api.base_url.trim().is_empty() {
            self.api.base_url = DEFAULT_BASE_URL.to_string();
        }
    }
}
