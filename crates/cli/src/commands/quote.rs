//! Offline price quotes from a catalog file.
//!
//! No backend is consulted, so the quote always comes from the fallback
//! rules. Useful for checking catalog data before it is published.

use std::path::Path;

use serde::Deserialize;
use tajeer_core::pricing::{self, PricingInput, protection_price};
use tajeer_core::{
    ColorOptionId, Condition, ConfigurationError, LeaseTerm, Locale, PriceQuote, Product,
    ProductConfiguration, ProductId, StorageOptionId,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// A catalog file: either a bare list of products or `{ products: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Listed { products: Vec<Product> },
    Bare(Vec<Product>),
}

impl From<CatalogFile> for Vec<Product> {
    fn from(file: CatalogFile) -> Self {
        match file {
            CatalogFile::Listed { products } | CatalogFile::Bare(products) => products,
        }
    }
}

/// Parse catalog contents. JSON is used for `.json` files, YAML otherwise.
///
/// # Errors
///
/// Returns a parse error for malformed contents.
pub fn parse_catalog(contents: &str, path: &Path) -> Result<Vec<Product>, QuoteError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let file: CatalogFile = if is_json {
        serde_json::from_str(contents)?
    } else {
        serde_yaml::from_str(contents)?
    };
    Ok(file.into())
}

pub struct QuoteArgs {
    pub product: ProductId,
    pub storage: StorageOptionId,
    pub color: ColorOptionId,
    pub term: LeaseTerm,
    pub condition: Condition,
}

/// Quote one configuration against a parsed catalog.
///
/// # Errors
///
/// Returns an error if the product or one of its options is unknown.
pub fn quote(products: &[Product], args: &QuoteArgs) -> Result<PriceQuote, QuoteError> {
    let product = products
        .iter()
        .find(|p| p.id == args.product)
        .ok_or(QuoteError::UnknownProduct(args.product))?;
    let config = ProductConfiguration::from_ids(
        product,
        Some(args.storage),
        Some(args.color),
        args.condition,
        Some(args.term),
    )?;
    let input = PricingInput::for_configuration(product, &config)?;
    Ok(pricing::resolve(&input, None))
}

/// Localized report lines for a quote.
#[must_use]
pub fn report(quote: &PriceQuote, locale: Locale) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{}{}",
            locale.format_price(&quote.monthly),
            locale.text(tajeer_core::Message::PerMonth)
        ),
        format!(
            "{} / {}",
            locale.text(quote.lease_term.label()),
            locale.text(quote.condition.label())
        ),
    ];
    if let Some(badge) = quote.badge {
        lines.push(badge.label(locale));
    }
    lines.push(format!(
        "{}: {}",
        locale.text(tajeer_core::Message::ProtectionPlanName),
        locale.format_price(&protection_price(quote.monthly))
    ));
    lines
}

/// Run the `quote` command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or the configuration is
/// invalid.
#[allow(clippy::print_stdout)]
pub fn run(catalog: &Path, args: &QuoteArgs, locale: Locale) -> Result<(), QuoteError> {
    info!(path = %catalog.display(), "Loading catalog");
    let contents = std::fs::read_to_string(catalog)?;
    let products = parse_catalog(&contents, catalog)?;
    info!(products = products.len(), "Parsed catalog");

    let quote = quote(&products, args)?;
    info!(source = ?quote.source, "Resolved quote");

    for line in report(&quote, locale) {
        println!("{line}");
    }
    Ok(())
}
