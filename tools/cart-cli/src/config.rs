//! CLI configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cart_core::CartConfig;
use cart_data::{DependencyTag, FetchPolicy, TimeoutConfig};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart behaviour.
    #[serde(default)]
    pub cart: CartConfig,

    /// Storefront API.
    #[serde(default)]
    pub api: ApiConfig,

    /// Durable store location.
    #[serde(default)]
    pub store: StoreConfig,
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

    /// Apply command-line overrides on top of file values.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(api) = overrides.api {
            self.api.base_url = api;
        }
        if let Some(dir) = overrides.store_dir {
            self.store.dir = dir;
        }
        self
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api: Option<String>,
    pub store_dir: Option<PathBuf>,
}

/// Storefront API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the products and stock endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-attempt timeout; the dependency default when unset.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Retries after the first attempt; the dependency default when unset.
    #[serde(default)]
    pub max_retries: Option<u32>,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

impl ApiConfig {
    /// Fetch policy for `tag` with configured values applied.
    pub fn policy(&self, tag: DependencyTag) -> FetchPolicy {
        let mut policy = FetchPolicy::from_tag(tag);
        if let Some(ms) = self.timeout_ms {
            policy.timeout = TimeoutConfig::from_total(Duration::from_millis(ms));
        }
        if let Some(retries) = self.max_retries {
            policy.retry.max_attempts = retries;
        }
        policy
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
            max_retries: None,
        }
    }
}

/// Durable store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory for stored keys, relative to the working directory.
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".cart")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}
