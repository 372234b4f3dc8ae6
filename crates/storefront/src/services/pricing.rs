//! Quoting configurations against the backend.

use std::sync::Arc;

use tajeer_core::pricing::{self, PricingInput};
use tajeer_core::{
    ConfigurationError, PriceQuote, Product, ProductConfiguration, ProductId,
};
use tracing::{instrument, warn};

use crate::backend::{BackendError, CatalogLookup, PriceKey, PricingLookup};

/// Resolves monthly prices, preferring the backend's stored price.
#[derive(Clone)]
pub struct PricingService {
    catalog: Arc<dyn CatalogLookup>,
    lookup: Arc<dyn PricingLookup>,
}

impl PricingService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogLookup>, lookup: Arc<dyn PricingLookup>) -> Self {
        Self { catalog, lookup }
    }

    /// Load a product with its options.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the catalog cannot be reached.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        self.catalog.product(id).await
    }

    /// Quote a complete configuration.
    ///
    /// A failed authoritative lookup is logged and the fallback rules are
    /// used instead; it never fails the quote.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Incomplete`] until storage, color and
    /// lease term are all selected.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub async fn quote(
        &self,
        product: &Product,
        config: &ProductConfiguration,
    ) -> Result<PriceQuote, ConfigurationError> {
        let input = PricingInput::for_configuration(product, config)?;
        let key = PriceKey::for_configuration(config).ok_or_else(|| {
            ConfigurationError::Incomplete {
                missing: config.missing(),
            }
        })?;

        let authoritative = match self.lookup.authoritative_price(&key).await {
            Ok(price) => price,
            Err(e) => {
                warn!(error = %e, "Authoritative price lookup failed, using fallback pricing");
                None
            }
        };

        let quote = pricing::resolve(&input, authoritative);
        tracing::debug!(source = ?quote.source, monthly = %quote.monthly, "Resolved quote");
        Ok(quote)
    }
}
