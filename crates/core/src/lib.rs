//! Tajeer Core - device leasing domain library.
//!
//! This crate holds everything the storefront and tooling share:
//! - `storefront` - Bilingual checkout service
//! - `cli` - Quoting and configuration checks from the command line
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Collaborators such as the pricing backend are consumed by the
//! storefront, which feeds their results in here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails and phone numbers
//! - [`catalog`] - Products, options, lease terms and configurations
//! - [`pricing`] - Monthly price resolution, badges and order totals
//! - [`checkout`] - The four-step checkout controller
//! - [`funnel`] - Funnel analytics events
//! - [`i18n`] - English and Arabic messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod funnel;
pub mod i18n;
pub mod pricing;
pub mod types;

pub use catalog::{
    CheckoutConfig, ColorOption, Condition, ConfigurationError, LeaseTerm, Product,
    ProductConfiguration, StorageOption, TermPrices,
};
pub use checkout::{CheckoutSession, CheckoutStep, StepError};
pub use i18n::{Locale, Message};
pub use pricing::{PriceBadge, PriceQuote, PriceSource};
pub use types::*;
