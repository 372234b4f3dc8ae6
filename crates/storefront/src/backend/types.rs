//! Wire rows exchanged with the backend REST API.
//!
//! Column names follow the backend tables; conversions into core types live
//! next to each row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tajeer_core::checkout::{NewOrder, OrderReceipt};
use tajeer_core::funnel::{DeviceKind, FunnelEvent, FunnelStep};
use tajeer_core::{
    CheckoutId, ColorOption, ColorOptionId, Condition, CurrencyCode, LeaseTerm, Locale, OrderId,
    Product, ProductId, StorageOption, StorageOptionId, TermPrices,
};

// =============================================================================
// Catalog
// =============================================================================

/// `products` row with embedded option rows.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub base_price: Decimal,
    #[serde(default)]
    pub currency_code: Option<CurrencyCode>,
    #[serde(default)]
    pub storage_options: Vec<StorageOptionRow>,
    #[serde(default)]
    pub color_options: Vec<ColorOptionRow>,
}

/// `storage_options` row. Per-term prices are nullable columns.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageOptionRow {
    pub id: StorageOptionId,
    pub label: String,
    #[serde(default)]
    pub price_modifier: Option<Decimal>,
    #[serde(default)]
    pub price_monthly: Option<Decimal>,
    #[serde(default)]
    pub price_12_months: Option<Decimal>,
    #[serde(default)]
    pub price_24_months: Option<Decimal>,
    #[serde(default)]
    pub price_36_months: Option<Decimal>,
}

/// `color_options` row.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorOptionRow {
    pub id: ColorOptionId,
    pub name: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub hex_code: Option<String>,
    #[serde(default)]
    pub price_modifier: Option<Decimal>,
}

impl From<StorageOptionRow> for StorageOption {
    fn from(row: StorageOptionRow) -> Self {
        Self {
            id: row.id,
            label: row.label,
            price_modifier: row.price_modifier.unwrap_or_default(),
            exact_prices: TermPrices {
                monthly: row.price_monthly,
                twelve_months: row.price_12_months,
                twenty_four_months: row.price_24_months,
                thirty_six_months: row.price_36_months,
            },
        }
    }
}

impl From<ColorOptionRow> for ColorOption {
    fn from(row: ColorOptionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            name_ar: row.name_ar,
            hex: row.hex_code,
            price_modifier: row.price_modifier.unwrap_or_default(),
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            name_ar: row.name_ar,
            image_url: row.image_url,
            base_price: row.base_price,
            currency_code: row.currency_code.unwrap_or_default(),
            storage_options: row.storage_options.into_iter().map(Into::into).collect(),
            color_options: row.color_options.into_iter().map(Into::into).collect(),
        }
    }
}

/// `product_prices` row, selected down to the price column.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPriceRow {
    pub monthly_price: Option<Decimal>,
}

// =============================================================================
// Orders
// =============================================================================

/// Insert payload for `orders`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub checkout_id: CheckoutId,
    pub status: &'static str,
    pub locale: Locale,

    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub is_business_order: bool,
    pub business_name: Option<String>,

    pub product_id: ProductId,
    pub product_name: String,
    pub storage_option_id: StorageOptionId,
    pub storage_label: String,
    pub color_option_id: ColorOptionId,
    pub color_name: String,
    pub condition: Condition,
    pub lease_term: LeaseTerm,
    pub lease_months: u32,

    pub currency_code: CurrencyCode,
    pub monthly_price: Decimal,
    pub protection_plan: bool,
    pub protection_price: Option<Decimal>,
    pub monthly_total: Decimal,
    pub contract_total: Decimal,

    pub national_id_path: String,
    pub salary_certificate_path: String,
}

/// Status every new order starts in.
pub const ORDER_STATUS_PENDING: &str = "pending";

impl From<&NewOrder> for OrderRow {
    fn from(order: &NewOrder) -> Self {
        let draft = &order.draft;
        let customer = &draft.customer;
        let config = &draft.configuration;
        let pricing = &draft.pricing;

        Self {
            checkout_id: draft.checkout_id,
            status: ORDER_STATUS_PENDING,
            locale: draft.locale,
            full_name: customer.full_name.clone(),
            email: customer.email.as_str().to_string(),
            phone: customer.phone.as_str().to_string(),
            is_business_order: customer.is_business_order(),
            business_name: customer.business_name.clone(),
            product_id: config.product_id,
            product_name: config.product_name.clone(),
            storage_option_id: config.storage.id,
            storage_label: config.storage.label.clone(),
            color_option_id: config.color.id,
            color_name: config.color.name.clone(),
            condition: config.condition,
            lease_term: config.lease_term,
            lease_months: pricing.lease_months,
            currency_code: pricing.monthly_price.currency_code,
            monthly_price: pricing.monthly_price.amount,
            protection_plan: draft.add_protection,
            protection_price: pricing.protection_price.map(|p| p.amount),
            monthly_total: pricing.monthly_total.amount,
            contract_total: pricing.contract_total.amount,
            national_id_path: order.document_paths.national_id.clone(),
            salary_certificate_path: order.document_paths.salary_certificate.clone(),
        }
    }
}

/// Columns returned for a created order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrderRow {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
}

impl From<CreatedOrderRow> for OrderReceipt {
    fn from(row: CreatedOrderRow) -> Self {
        Self {
            order_id: row.id,
            order_number: row.order_number,
        }
    }
}

// =============================================================================
// Funnel
// =============================================================================

/// Insert payload for `funnel_events`.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelEventRow {
    pub session_id: CheckoutId,
    pub step: FunnelStep,
    pub device_type: DeviceKind,
    pub source: Option<String>,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
}

impl From<&FunnelEvent> for FunnelEventRow {
    fn from(event: &FunnelEvent) -> Self {
        Self {
            session_id: event.session_id,
            step: event.step,
            device_type: event.device,
            source: event.source.clone(),
            locale: event.locale,
            created_at: event.occurred_at,
        }
    }
}
