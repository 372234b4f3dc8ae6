//! Backend service contracts and the REST client that implements them.
//!
//! # Architecture
//!
//! - The backend is a hosted Postgres REST + object storage service
//! - Each concern the checkout consumes is a trait, so services and tests
//!   depend on the contract rather than on HTTP
//! - [`BackendClient`] implements every trait with `reqwest` and caches
//!   products and authoritative prices with `moka`
//!
//! # Contracts
//!
//! - [`CatalogLookup`] - product with its storage and color options
//! - [`PricingLookup`] - authoritative monthly price for an exact configuration
//! - [`DocumentStorage`] - upload a verification document
//! - [`OrderCreation`] - insert the order row
//! - [`FunnelRecorder`] - store a funnel analytics event

mod client;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use rust_decimal::Decimal;
use tajeer_core::checkout::{NewOrder, OrderReceipt};
use tajeer_core::funnel::FunnelEvent;
use tajeer_core::{
    ColorOptionId, Condition, LeaseTerm, Product, ProductConfiguration, ProductId,
    StorageOptionId,
};
use thiserror::Error;

pub use client::BackendClient;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

impl BackendError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Parse(_) | Self::Configuration(_) => false,
        }
    }
}

/// The exact configuration an authoritative price is stored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceKey {
    pub product_id: ProductId,
    pub storage_id: StorageOptionId,
    pub color_id: ColorOptionId,
    pub condition: Condition,
    pub lease_term: LeaseTerm,
}

impl PriceKey {
    /// Key for a configuration, `None` until storage, color and term are set.
    #[must_use]
    pub fn for_configuration(config: &ProductConfiguration) -> Option<Self> {
        Some(Self {
            product_id: config.product_id(),
            storage_id: config.storage()?.id,
            color_id: config.color()?.id,
            condition: config.condition(),
            lease_term: config.lease_term()?,
        })
    }
}

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Product with its options, `None` if it does not exist.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError>;
}

#[async_trait]
pub trait PricingLookup: Send + Sync {
    /// Stored monthly price for the exact configuration, if one exists.
    async fn authoritative_price(&self, key: &PriceKey) -> Result<Option<Decimal>, BackendError>;
}

#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Store a file at `path` in the documents bucket and return its path.
    async fn upload_document(
        &self,
        path: &str,
        content_type: &str,
        contents: Bytes,
    ) -> Result<String, BackendError>;
}

#[async_trait]
pub trait OrderCreation: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderReceipt, BackendError>;
}

#[async_trait]
pub trait FunnelRecorder: Send + Sync {
    async fn record_event(&self, event: &FunnelEvent) -> Result<(), BackendError>;
}

/// The set of collaborators the storefront runs against.
#[derive(Clone)]
pub struct Backends {
    pub catalog: Arc<dyn CatalogLookup>,
    pub pricing: Arc<dyn PricingLookup>,
    pub documents: Arc<dyn DocumentStorage>,
    pub orders: Arc<dyn OrderCreation>,
    pub funnel: Arc<dyn FunnelRecorder>,
}

impl Backends {
    /// Use one implementation for every contract.
    pub fn uniform<B>(backend: Arc<B>) -> Self
    where
        B: CatalogLookup + PricingLookup + DocumentStorage + OrderCreation + FunnelRecorder + 'static,
    {
        Self {
            catalog: backend.clone(),
            pricing: backend.clone(),
            documents: backend.clone(),
            orders: backend.clone(),
            funnel: backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_transience() {
        let unavailable = BackendError::Api {
            status: 503,
            message: String::new(),
        };
        assert!(unavailable.is_transient());

        let conflict = BackendError::Api {
            status: 409,
            message: String::new(),
        };
        assert!(!conflict.is_transient());
        assert!(!BackendError::Parse("bad".to_string()).is_transient());
    }
}
