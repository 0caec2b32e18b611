//! Cart configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::money::Currency;

/// Store key the cart is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "cart:v1";

/// Default bound on a single stock or catalog lookup.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 3000;

/// Settings for a [`CartMachine`](crate::CartMachine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Durable store key (a fixed, versioned namespace).
    pub storage_key: String,

    /// Upper bound on each external lookup, in milliseconds.
    pub fetch_timeout_ms: u64,

    /// Currency used for totals.
    pub currency: Currency,
}

impl CartConfig {
    /// Lookup timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Set the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the lookup timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the totals currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            currency: Currency::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "cart:v1");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: CartConfig = serde_json::from_str(r#"{"currency":"BRL"}"#).unwrap();
        assert_eq!(config.currency, Currency::BRL);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.fetch_timeout_ms, DEFAULT_FETCH_TIMEOUT_MS);
    }
}
