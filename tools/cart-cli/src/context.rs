//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use cart_core::CartMachine;
use cart_data::{DependencyTag, HttpCatalogClient};
use cart_store::FileStore;

use crate::config::{CliConfig, Overrides};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file, then apply command-line overrides.
    pub fn load(config_path: Option<&str>, overrides: Overrides, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self {
            config: config.apply(overrides),
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["cart.toml", ".cart.toml", "cart.json"];

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

    /// Directory the cart is persisted under.
    pub fn store_dir(&self) -> PathBuf {
        self.cwd.join(&self.config.store.dir)
    }

    /// HTTP client for the configured storefront API.
    pub fn client(&self) -> Result<Arc<HttpCatalogClient>> {
        let api = &self.config.api;
        let client = HttpCatalogClient::with_policies(
            &api.base_url,
            self.config.cart.currency,
            api.policy(DependencyTag::Catalog),
            api.policy(DependencyTag::Inventory),
        )
        .with_context(|| format!("Failed to create API client for {}", api.base_url))?;
        Ok(Arc::new(client))
    }

    /// Restore the cart machine from the store directory.
    pub fn machine(&self, client: Arc<HttpCatalogClient>) -> Result<CartMachine> {
        let dir = self.store_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart store at {}", dir.display()))?;

        self.output.debug(&format!("Cart store: {}", dir.display()));
        CartMachine::load(
            Arc::new(store),
            client.clone(),
            client,
            self.config.cart.clone(),
        )
        .context("Failed to load cart")
    }
}
