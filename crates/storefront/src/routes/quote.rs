//! Product and price quote handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tajeer_core::{
    ColorOptionId, Condition, LeaseTerm, Locale, PriceQuote, Product, ProductConfiguration,
    ProductId, StorageOptionId,
};
use tracing::instrument;

use super::views::{ProductView, QuoteView};
use crate::error::{AppError, Localize, Result};
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// Option IDs picked in the configurator.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationRequest {
    pub product_id: ProductId,
    pub storage_id: Option<StorageOptionId>,
    pub color_id: Option<ColorOptionId>,
    #[serde(default)]
    pub condition: Condition,
    pub lease_term: Option<LeaseTerm>,
}

/// Load the product and resolve the requested options against it.
pub(crate) async fn load_product(
    state: &AppState,
    product_id: ProductId,
    locale: Locale,
) -> Result<Product> {
    state
        .pricing()
        .product(product_id)
        .await
        .localize(locale)?
        .ok_or_else(|| AppError::ProductNotFound(product_id).localized(locale))
}

/// Build the configuration and quote it.
pub(crate) async fn quote_request(
    state: &AppState,
    request: &ConfigurationRequest,
    locale: Locale,
) -> Result<(Product, ProductConfiguration, PriceQuote)> {
    let product = load_product(state, request.product_id, locale).await?;
    let config = ProductConfiguration::from_ids(
        &product,
        request.storage_id,
        request.color_id,
        request.condition,
        request.lease_term,
    )
    .localize(locale)?;
    let quote = state.pricing().quote(&product, &config).await.localize(locale)?;
    Ok((product, config, quote))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn product(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = load_product(&state, product_id, locale).await?;
    Ok(Json(ProductView::new(product, locale)))
}

/// `POST /api/quote`
#[instrument(skip(state))]
pub async fn quote(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Json(request): Json<ConfigurationRequest>,
) -> Result<Json<QuoteView>> {
    let (_, _, quote) = quote_request(&state, &request, locale).await?;
    Ok(Json(QuoteView::new(&quote, locale)))
}
