//! REST client for the backend service.
//!
//! Uses `reqwest` 0.13 against the backend's table and storage endpoints.
//! Products and authoritative prices are cached with `moka`; a missing
//! price is cached too, so a configuration without a stored price does not
//! hit the backend on every quote.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tajeer_core::checkout::{NewOrder, OrderReceipt};
use tajeer_core::funnel::FunnelEvent;
use tajeer_core::{Product, ProductId};
use tracing::{debug, instrument};

use super::types::{CreatedOrderRow, FunnelEventRow, OrderRow, ProductPriceRow, ProductRow};
use super::{
    BackendError, CatalogLookup, DocumentStorage, FunnelRecorder, OrderCreation, PriceKey,
    PricingLookup,
};
use crate::config::BackendConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const CACHE_CAPACITY: u64 = 1000;

/// Selects a product together with its embedded option rows.
const PRODUCT_SELECT: &str = "id,name,name_ar,image_url,base_price,currency_code,\
storage_options(id,label,price_modifier,price_monthly,price_12_months,price_24_months,price_36_months),\
color_options(id,name,name_ar,hex_code,price_modifier)";

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the backend REST and storage APIs.
///
/// Cheap to clone; clones share the connection pool and caches.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
    documents_bucket: String,
    products: moka::future::Cache<ProductId, Option<Product>>,
    prices: moka::future::Cache<PriceKey, Option<Decimal>>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let key = config.api_key.expose_secret();
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| BackendError::Configuration(format!("Invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| BackendError::Configuration(format!("Invalid API key format: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache_ttl = config.price_cache_ttl;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.url.as_str().trim_end_matches('/').to_string(),
                documents_bucket: config.documents_bucket.clone(),
                products: moka::future::Cache::builder()
                    .max_capacity(CACHE_CAPACITY)
                    .time_to_live(cache_ttl)
                    .build(),
                prices: moka::future::Cache::builder()
                    .max_capacity(CACHE_CAPACITY)
                    .time_to_live(cache_ttl)
                    .build(),
            }),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base_url)
    }

    fn storage_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{path}",
            self.inner.base_url, self.inner.documents_bucket
        )
    }

    /// Turn a response into its JSON body, or an API error.
    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let response = Self::check(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e.to_string())
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = %status,
            body = %message.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );
        Err(BackendError::Api {
            status: status.as_u16(),
            message: message.chars().take(200).collect(),
        })
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.rest_url("products"))
            .query(&[
                ("id", format!("eq.{id}")),
                ("select", PRODUCT_SELECT.to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let rows: Vec<ProductRow> = Self::json(response).await?;
        Ok(rows.into_iter().next().map(Product::from))
    }

    async fn fetch_price(&self, key: &PriceKey) -> Result<Option<Decimal>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.rest_url("product_prices"))
            .query(&[
                ("product_id", format!("eq.{}", key.product_id)),
                ("storage_option_id", format!("eq.{}", key.storage_id)),
                ("color_option_id", format!("eq.{}", key.color_id)),
                ("condition", format!("eq.{}", key.condition.as_str())),
                ("lease_term", format!("eq.{}", key.lease_term.as_str())),
                ("select", "monthly_price".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let rows: Vec<ProductPriceRow> = Self::json(response).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.monthly_price)
            .filter(|price| *price > Decimal::ZERO))
    }
}

#[async_trait]
impl CatalogLookup for BackendClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        if let Some(cached) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(cached);
        }

        let product = self.fetch_product(id).await?;
        self.inner.products.insert(id, product.clone()).await;
        Ok(product)
    }
}

#[async_trait]
impl PricingLookup for BackendClient {
    #[instrument(skip(self), fields(product_id = %key.product_id, lease_term = %key.lease_term))]
    async fn authoritative_price(&self, key: &PriceKey) -> Result<Option<Decimal>, BackendError> {
        if let Some(cached) = self.inner.prices.get(key).await {
            debug!("Cache hit for price");
            return Ok(cached);
        }

        let price = self.fetch_price(key).await?;
        self.inner.prices.insert(*key, price).await;
        Ok(price)
    }
}

#[async_trait]
impl DocumentStorage for BackendClient {
    #[instrument(skip(self, contents), fields(size = contents.len()))]
    async fn upload_document(
        &self,
        path: &str,
        content_type: &str,
        contents: Bytes,
    ) -> Result<String, BackendError> {
        let response = self
            .inner
            .client
            .post(self.storage_url(path))
            .header(CONTENT_TYPE, content_type)
            // A retried submission writes to the same path.
            .header("x-upsert", "true")
            .body(contents)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(path.to_string())
    }
}

#[async_trait]
impl OrderCreation for BackendClient {
    #[instrument(skip(self, order), fields(checkout_id = %order.draft.checkout_id))]
    async fn create_order(&self, order: &NewOrder) -> Result<OrderReceipt, BackendError> {
        let response = self
            .inner
            .client
            .post(self.rest_url("orders"))
            .header("Prefer", "return=representation")
            .json(&OrderRow::from(order))
            .send()
            .await?;

        let rows: Vec<CreatedOrderRow> = Self::json(response).await?;
        rows.into_iter()
            .next()
            .map(OrderReceipt::from)
            .ok_or_else(|| BackendError::Parse("order insert returned no rows".to_string()))
    }
}

#[async_trait]
impl FunnelRecorder for BackendClient {
    #[instrument(skip(self, event), fields(step = %event.step))]
    async fn record_event(&self, event: &FunnelEvent) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.rest_url("funnel_events"))
            .header("Prefer", "return=minimal")
            .json(&FunnelEventRow::from(event))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn config(url: &str) -> BackendConfig {
        BackendConfig {
            url: Url::parse(url).unwrap(),
            api_key: SecretString::from("sb9Kq2mZ7xPfL4wR8tYc3VnJ6hD1gA5e"),
            documents_bucket: "verification-documents".to_string(),
            price_cache_ttl: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_urls() {
        let client = BackendClient::new(&config("https://tajeer.backend.test/")).unwrap();
        assert_eq!(
            client.rest_url("orders"),
            "https://tajeer.backend.test/rest/v1/orders"
        );
        assert_eq!(
            client.storage_url("abc/national_id.pdf"),
            "https://tajeer.backend.test/storage/v1/object/verification-documents/abc/national_id.pdf"
        );
    }

    #[test]
    fn test_rejects_unprintable_key() {
        let mut config = config("https://tajeer.backend.test");
        config.api_key = SecretString::from("bad\nkey");
        assert!(matches!(
            BackendClient::new(&config),
            Err(BackendError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transient() {
        // Port 9 (discard) on localhost is not listening in test environments.
        let client = BackendClient::new(&config("http://127.0.0.1:9")).unwrap();
        let err = client.product(ProductId::new_random()).await.unwrap_err();
        assert!(err.is_transient());
    }
}
