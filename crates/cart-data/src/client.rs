//! REST client for stock and catalog lookups.

use std::time::Duration;

use async_trait::async_trait;
use cart_core::catalog::{CatalogLookup, CatalogProduct, Stock, StockOracle};
use cart_core::{Currency, FetchError, Money, ProductId};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::dependency::DependencyTag;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from a dependency tag's defaults.
    pub fn from_tag(tag: DependencyTag) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(tag.default_timeout()),
            retry: RetryPolicy::new(tag.default_max_retries()),
        }
    }
}

/// Product record as served by the catalog API.
///
/// Prices arrive as decimals in major units.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: ProductId,
    title: String,
    price: f64,
    #[serde(default)]
    image: String,
}

/// Client for a storefront REST API.
///
/// Expects `GET {base}/products`, `GET {base}/products/{id}` and
/// `GET {base}/stock/{id}`, returning JSON. Implements both
/// [`StockOracle`] and [`CatalogLookup`].
///
/// # Example
///
/// ```rust,ignore
/// let client = HttpCatalogClient::new("http://localhost:3333", Currency::BRL)?;
/// let stock = client.get_stock(&ProductId::from(1u64)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: Url,
    currency: Currency,
    catalog_policy: FetchPolicy,
    stock_policy: FetchPolicy,
}

impl HttpCatalogClient {
    /// Create a client with the default policy for each dependency.
    pub fn new(base_url: &str, currency: Currency) -> Result<Self, FetchError> {
        Self::with_policies(
            base_url,
            currency,
            FetchPolicy::from_tag(DependencyTag::Catalog),
            FetchPolicy::from_tag(DependencyTag::Inventory),
        )
    }

    /// Create a client with explicit catalog and stock policies.
    pub fn with_policies(
        base_url: &str,
        currency: Currency,
        catalog_policy: FetchPolicy,
        stock_policy: FetchPolicy,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::Request(format!("invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::Request(format!(
                "invalid base URL {base_url}: cannot be a base"
            )));
        }

        let connect = catalog_policy
            .timeout
            .connect
            .min(stock_policy.timeout.connect);
        let http = reqwest::Client::builder()
            .connect_timeout(connect)
            .user_agent(concat!("cart-data/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            currency,
            catalog_policy,
            stock_policy,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Policy applied to lookups of `tag`.
    pub fn policy(&self, tag: DependencyTag) -> &FetchPolicy {
        match tag {
            DependencyTag::Catalog => &self.catalog_policy,
            DependencyTag::Inventory => &self.stock_policy,
        }
    }

    /// Fetch the whole catalog.
    pub async fn list_products(&self) -> Result<Vec<CatalogProduct>, FetchError> {
        let url = self.url(&["products"]);
        let records: Vec<ProductRecord> = self.get_json(&url, DependencyTag::Catalog).await?;
        Ok(records
            .into_iter()
            .map(|r| self.to_product(r))
            .collect())
    }

    fn to_product(&self, record: ProductRecord) -> CatalogProduct {
        CatalogProduct {
            id: record.id,
            title: record.title,
            price: Money::from_decimal(record.price, self.currency),
            image: record.image,
        }
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        tag: DependencyTag,
    ) -> Result<T, FetchError> {
        let policy = self.policy(tag);
        let total = policy.timeout.total;
        tracing::debug!(%url, dependency = %tag, "fetch");
        policy.retry.run(move || self.get_once(url, total)).await
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        total: Duration,
    ) -> Result<T, FetchError> {
        let resp = self
            .http
            .get(url.clone())
            .timeout(total)
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.json::<T>().await.map_err(|e| classify(e, url))
    }
}

#[async_trait]
impl StockOracle for HttpCatalogClient {
    async fn get_stock(&self, product_id: &ProductId) -> Result<Stock, FetchError> {
        let url = self.url(&["stock", product_id.as_str()]);
        self.get_json(&url, DependencyTag::Inventory).await
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalogClient {
    async fn get_product(&self, product_id: &ProductId) -> Result<CatalogProduct, FetchError> {
        let url = self.url(&["products", product_id.as_str()]);
        let record: ProductRecord = self.get_json(&url, DependencyTag::Catalog).await?;
        Ok(self.to_product(record))
    }
}

fn classify(e: reqwest::Error, url: &Url) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else if e.is_connect() {
        FetchError::Connection(format!("{url}: {e}"))
    } else if e.is_decode() {
        FetchError::Deserialization(format!("{url}: {e}"))
    } else {
        FetchError::Request(format!("{url}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = HttpCatalogClient::new("http://localhost:3333/api/", Currency::USD).unwrap();
        assert_eq!(
            client.url(&["stock", "1"]).as_str(),
            "http://localhost:3333/api/stock/1"
        );
    }

    #[test]
    fn test_url_escapes_ids() {
        let client = HttpCatalogClient::new("http://localhost:3333", Currency::USD).unwrap();
        assert_eq!(
            client.url(&["products", "a/b c"]).as_str(),
            "http://localhost:3333/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpCatalogClient::new("not a url", Currency::USD),
            Err(FetchError::Request(_))
        ));
        assert!(HttpCatalogClient::new("mailto:shop@example.com", Currency::USD).is_err());
    }

    #[test]
    fn test_policies_follow_tags() {
        let client = HttpCatalogClient::new("http://localhost:3333", Currency::USD).unwrap();
        assert_eq!(client.policy(DependencyTag::Inventory).retry.max_attempts, 2);
        assert_eq!(client.policy(DependencyTag::Catalog).retry.max_attempts, 1);
    }

    #[test]
    fn test_record_to_product() {
        let client = HttpCatalogClient::new("http://localhost:3333", Currency::BRL).unwrap();
        let record: ProductRecord = serde_json::from_str(
            r#"{"id":1,"title":"Tenis","price":179.9,"image":"https://img/1.jpg"}"#,
        )
        .unwrap();

        let product = client.to_product(record);
        assert_eq!(product.id, ProductId::from(1u64));
        assert_eq!(product.price, Money::new(17990, Currency::BRL));
    }
}
