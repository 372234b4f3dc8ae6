//! Product catalog and configuration types.
//!
//! A [`Product`] offers storage and color options. A shopper builds a
//! [`ProductConfiguration`] by picking one of each plus a condition and a lease
//! term. Once complete, the configuration is frozen into a [`CheckoutConfig`]
//! snapshot that checkout carries for the rest of the session.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n::Message;
use crate::types::{ColorOptionId, CurrencyCode, Price, ProductId, StorageOptionId};

/// Device condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    New,
    Refurbished,
}

impl Condition {
    /// Stable identifier used by the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Refurbished => "refurbished",
        }
    }

    /// Translation key for the condition's display name.
    #[must_use]
    pub const fn label(&self) -> Message {
        match self {
            Self::New => Message::ConditionNew,
            Self::Refurbished => Message::ConditionRefurbished,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "refurbished" => Ok(Self::Refurbished),
            _ => Err(format!("invalid condition: {s}")),
        }
    }
}

/// One of the four fixed lease commitments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeaseTerm {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "12_months")]
    TwelveMonths,
    #[serde(rename = "24_months")]
    TwentyFourMonths,
    #[serde(rename = "36_months")]
    ThirtySixMonths,
}

impl LeaseTerm {
    /// All terms, shortest commitment first.
    pub const ALL: [Self; 4] = [
        Self::Monthly,
        Self::TwelveMonths,
        Self::TwentyFourMonths,
        Self::ThirtySixMonths,
    ];

    /// Stable identifier used by the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::TwelveMonths => "12_months",
            Self::TwentyFourMonths => "24_months",
            Self::ThirtySixMonths => "36_months",
        }
    }

    /// Commitment length in months. The rolling monthly plan commits to one.
    #[must_use]
    pub const fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::TwelveMonths => 12,
            Self::TwentyFourMonths => 24,
            Self::ThirtySixMonths => 36,
        }
    }

    /// Multiplier applied to the modified base price when no exact per-term
    /// price exists.
    #[must_use]
    pub fn fallback_multiplier(&self) -> Decimal {
        match self {
            Self::Monthly | Self::TwelveMonths => Decimal::ONE,
            Self::TwentyFourMonths => Decimal::new(75, 2),
            Self::ThirtySixMonths => Decimal::new(70, 2),
        }
    }

    /// Translation key for the term's display name.
    #[must_use]
    pub const fn label(&self) -> Message {
        match self {
            Self::Monthly => Message::TermMonthly,
            Self::TwelveMonths => Message::TermTwelveMonths,
            Self::TwentyFourMonths => Message::TermTwentyFourMonths,
            Self::ThirtySixMonths => Message::TermThirtySixMonths,
        }
    }

    /// Translation key for the term's descriptive text.
    #[must_use]
    pub const fn description(&self) -> Message {
        match self {
            Self::Monthly => Message::TermMonthlyDescription,
            Self::TwelveMonths => Message::TermTwelveMonthsDescription,
            Self::TwentyFourMonths => Message::TermTwentyFourMonthsDescription,
            Self::ThirtySixMonths => Message::TermThirtySixMonthsDescription,
        }
    }
}

impl fmt::Display for LeaseTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaseTerm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" | "1" => Ok(Self::Monthly),
            "12_months" | "12" => Ok(Self::TwelveMonths),
            "24_months" | "24" => Ok(Self::TwentyFourMonths),
            "36_months" | "36" => Ok(Self::ThirtySixMonths),
            _ => Err(format!("invalid lease term: {s}")),
        }
    }
}

/// Exact monthly prices a storage option defines for specific terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPrices {
    #[serde(default, rename = "monthly", skip_serializing_if = "Option::is_none")]
    pub monthly: Option<Decimal>,
    #[serde(default, rename = "12_months", skip_serializing_if = "Option::is_none")]
    pub twelve_months: Option<Decimal>,
    #[serde(default, rename = "24_months", skip_serializing_if = "Option::is_none")]
    pub twenty_four_months: Option<Decimal>,
    #[serde(default, rename = "36_months", skip_serializing_if = "Option::is_none")]
    pub thirty_six_months: Option<Decimal>,
}

impl TermPrices {
    /// Exact price for a term, if one is defined and positive.
    #[must_use]
    pub fn get(&self, term: LeaseTerm) -> Option<Decimal> {
        let price = match term {
            LeaseTerm::Monthly => self.monthly,
            LeaseTerm::TwelveMonths => self.twelve_months,
            LeaseTerm::TwentyFourMonths => self.twenty_four_months,
            LeaseTerm::ThirtySixMonths => self.thirty_six_months,
        };
        price.filter(|p| *p > Decimal::ZERO)
    }
}

/// A storage capacity a product can be leased with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageOption {
    pub id: StorageOptionId,
    /// Display label, e.g. "256 GB".
    pub label: String,
    /// Added to the product base price.
    #[serde(default)]
    pub price_modifier: Decimal,
    #[serde(default)]
    pub exact_prices: TermPrices,
}

/// A color a product can be leased in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub id: ColorOptionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    /// CSS hex value for the swatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default)]
    pub price_modifier: Decimal,
}

/// A leasable device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Undiscounted monthly price before any option modifiers.
    pub base_price: Decimal,
    #[serde(default)]
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub storage_options: Vec<StorageOption>,
    #[serde(default)]
    pub color_options: Vec<ColorOption>,
}

impl Product {
    /// Find a storage option by ID.
    #[must_use]
    pub fn storage(&self, id: StorageOptionId) -> Option<&StorageOption> {
        self.storage_options.iter().find(|s| s.id == id)
    }

    /// Find a color option by ID.
    #[must_use]
    pub fn color(&self, id: ColorOptionId) -> Option<&ColorOption> {
        self.color_options.iter().find(|c| c.id == id)
    }

    /// Undiscounted base price with currency.
    #[must_use]
    pub const fn base(&self) -> Price {
        Price::new(self.base_price, self.currency_code)
    }
}

/// Selections a configuration needs before it is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Storage,
    Color,
    LeaseTerm,
}

/// Errors building or freezing a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("configuration is incomplete, missing: {missing:?}")]
    Incomplete { missing: Vec<Selection> },
    #[error("storage option {0} does not belong to this product")]
    UnknownStorage(StorageOptionId),
    #[error("color option {0} does not belong to this product")]
    UnknownColor(ColorOptionId),
    #[error("configuration is for product {configured}, not {given}")]
    ProductMismatch {
        configured: ProductId,
        given: ProductId,
    },
}

/// A shopper's in-progress selection for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfiguration {
    product_id: ProductId,
    storage: Option<StorageOption>,
    color: Option<ColorOption>,
    condition: Condition,
    lease_term: Option<LeaseTerm>,
}

impl ProductConfiguration {
    /// Start an empty configuration for a product.
    #[must_use]
    pub const fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            storage: None,
            color: None,
            condition: Condition::New,
            lease_term: None,
        }
    }

    /// Build a configuration from option IDs in one go.
    ///
    /// # Errors
    ///
    /// Returns an error if an ID does not belong to the product.
    pub fn from_ids(
        product: &Product,
        storage: Option<StorageOptionId>,
        color: Option<ColorOptionId>,
        condition: Condition,
        lease_term: Option<LeaseTerm>,
    ) -> Result<Self, ConfigurationError> {
        let mut config = Self::new(product.id);
        if let Some(id) = storage {
            config.select_storage(product, id)?;
        }
        if let Some(id) = color {
            config.select_color(product, id)?;
        }
        config.select_condition(condition);
        if let Some(term) = lease_term {
            config.select_lease_term(term);
        }
        Ok(config)
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    #[must_use]
    pub const fn storage(&self) -> Option<&StorageOption> {
        self.storage.as_ref()
    }

    #[must_use]
    pub const fn color(&self) -> Option<&ColorOption> {
        self.color.as_ref()
    }

    #[must_use]
    pub const fn condition(&self) -> Condition {
        self.condition
    }

    #[must_use]
    pub const fn lease_term(&self) -> Option<LeaseTerm> {
        self.lease_term
    }

    /// Select a storage option.
    ///
    /// # Errors
    ///
    /// Returns an error if the product differs or does not offer the option.
    pub fn select_storage(
        &mut self,
        product: &Product,
        id: StorageOptionId,
    ) -> Result<(), ConfigurationError> {
        self.ensure_product(product)?;
        let option = product
            .storage(id)
            .ok_or(ConfigurationError::UnknownStorage(id))?;
        self.storage = Some(option.clone());
        Ok(())
    }

    /// Select a color option.
    ///
    /// # Errors
    ///
    /// Returns an error if the product differs or does not offer the option.
    pub fn select_color(
        &mut self,
        product: &Product,
        id: ColorOptionId,
    ) -> Result<(), ConfigurationError> {
        self.ensure_product(product)?;
        let option = product.color(id).ok_or(ConfigurationError::UnknownColor(id))?;
        self.color = Some(option.clone());
        Ok(())
    }

    pub const fn select_condition(&mut self, condition: Condition) {
        self.condition = condition;
    }

    pub const fn select_lease_term(&mut self, term: LeaseTerm) {
        self.lease_term = Some(term);
    }

    /// Selections still missing before the configuration is complete.
    #[must_use]
    pub fn missing(&self) -> Vec<Selection> {
        let mut missing = Vec::new();
        if self.storage.is_none() {
            missing.push(Selection::Storage);
        }
        if self.color.is_none() {
            missing.push(Selection::Color);
        }
        if self.lease_term.is_none() {
            missing.push(Selection::LeaseTerm);
        }
        missing
    }

    /// Storage, color and lease term are all selected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.storage.is_some() && self.color.is_some() && self.lease_term.is_some()
    }

    fn ensure_product(&self, product: &Product) -> Result<(), ConfigurationError> {
        if product.id == self.product_id {
            Ok(())
        } else {
            Err(ConfigurationError::ProductMismatch {
                configured: self.product_id,
                given: product.id,
            })
        }
    }
}

/// Frozen configuration carried through checkout.
///
/// Option values are copies taken when checkout began. Only the price may be
/// refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image_url: Option<String>,
    pub storage: StorageOption,
    pub color: ColorOption,
    pub condition: Condition,
    pub lease_term: LeaseTerm,
    /// Resolved monthly price when checkout began.
    pub price: Price,
}

impl CheckoutConfig {
    /// Freeze a complete configuration together with its resolved price.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Incomplete`] when storage, color or lease
    /// term is missing, or a mismatch error when the product differs.
    pub fn snapshot(
        product: &Product,
        config: &ProductConfiguration,
        price: Price,
    ) -> Result<Self, ConfigurationError> {
        config.ensure_product(product)?;

        let (Some(storage), Some(color), Some(lease_term)) =
            (config.storage(), config.color(), config.lease_term())
        else {
            return Err(ConfigurationError::Incomplete {
                missing: config.missing(),
            });
        };

        Ok(Self {
            product_id: product.id,
            product_name: product.name.clone(),
            product_image_url: product.image_url.clone(),
            storage: storage.clone(),
            color: color.clone(),
            condition: config.condition(),
            lease_term,
            price,
        })
    }
}
