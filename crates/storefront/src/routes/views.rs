//! JSON view models.
//!
//! Views carry both raw values (for client logic) and text already
//! translated into the request locale (for display), so the client never
//! needs its own string tables.

use serde::Serialize;
use tajeer_core::checkout::{CustomerInfo, CustomerInfoForm};
use tajeer_core::i18n::Direction;
use tajeer_core::pricing::protection_price;
use tajeer_core::{
    CheckoutSession, CheckoutStep, ColorOption, Condition, LeaseTerm, Locale, Message, Price,
    PriceBadge, PriceQuote, PriceSource, Product,
};

/// A price with its display string.
#[derive(Debug, Serialize)]
pub struct PriceView {
    #[serde(flatten)]
    pub price: Price,
    pub display: String,
}

impl PriceView {
    #[must_use]
    pub fn new(price: Price, locale: Locale) -> Self {
        Self {
            display: locale.format_price(&price),
            price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BadgeView {
    #[serde(flatten)]
    pub badge: PriceBadge,
    pub label: String,
}

/// Response of `POST /api/quote`.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub monthly: PriceView,
    pub per_month: &'static str,
    pub source: PriceSource,
    pub condition: Condition,
    pub condition_label: &'static str,
    pub lease_term: LeaseTerm,
    pub lease_term_label: &'static str,
    pub lease_term_description: &'static str,
    pub badge: Option<BadgeView>,
    pub protection: PriceView,
}

impl QuoteView {
    #[must_use]
    pub fn new(quote: &PriceQuote, locale: Locale) -> Self {
        Self {
            monthly: PriceView::new(quote.monthly, locale),
            per_month: locale.text(Message::PerMonth),
            source: quote.source,
            condition: quote.condition,
            condition_label: locale.text(quote.condition.label()),
            lease_term: quote.lease_term,
            lease_term_label: locale.text(quote.lease_term.label()),
            lease_term_description: locale.text(quote.lease_term.description()),
            badge: quote.badge.map(|badge| BadgeView {
                label: badge.label(locale),
                badge,
            }),
            protection: PriceView::new(protection_price(quote.monthly), locale),
        }
    }
}

/// Product options for the configurator.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub display_name: String,
    pub lease_terms: Vec<LeaseTermView>,
}

#[derive(Debug, Serialize)]
pub struct LeaseTermView {
    pub term: LeaseTerm,
    pub label: &'static str,
    pub description: &'static str,
}

impl ProductView {
    #[must_use]
    pub fn new(product: Product, locale: Locale) -> Self {
        let display_name = match (locale, &product.name_ar) {
            (Locale::Ar, Some(name)) => name.clone(),
            _ => product.name.clone(),
        };
        Self {
            display_name,
            lease_terms: LeaseTerm::ALL
                .iter()
                .map(|&term| LeaseTermView {
                    term,
                    label: locale.text(term.label()),
                    description: locale.text(term.description()),
                })
                .collect(),
            product,
        }
    }
}

fn color_name(color: &ColorOption, locale: Locale) -> String {
    match (locale, &color.name_ar) {
        (Locale::Ar, Some(name)) => name.clone(),
        _ => color.name.clone(),
    }
}

#[derive(Debug, Serialize)]
pub struct StepView {
    pub step: CheckoutStep,
    pub number: String,
    pub title: &'static str,
    pub current: bool,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfigurationView {
    pub product_name: String,
    pub product_image_url: Option<String>,
    pub storage: String,
    pub color: String,
    pub condition: &'static str,
    pub lease_term: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TotalsView {
    pub monthly_price: PriceView,
    pub protection_price: Option<PriceView>,
    pub monthly_total: PriceView,
    pub lease_months: u32,
    pub contract_total: PriceView,
}

#[derive(Debug, Serialize)]
pub struct DocumentView {
    pub file_name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct DocumentsView {
    pub national_id: DocumentView,
    pub salary_certificate: DocumentView,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationView {
    pub order_id: String,
    pub reference: String,
    pub message: String,
}

/// Response of every `/api/checkout` endpoint.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub id: String,
    pub locale: Locale,
    pub direction: Direction,
    pub step: CheckoutStep,
    pub steps: Vec<StepView>,
    pub configuration: ConfigurationView,
    pub totals: TotalsView,
    /// Previously entered values, for pre-filling step 1.
    pub customer: Option<CustomerInfoForm>,
    pub add_protection: Option<bool>,
    pub documents: Option<DocumentsView>,
    pub confirmation: Option<ConfirmationView>,
}

impl CheckoutView {
    #[must_use]
    pub fn new(session: &CheckoutSession, locale: Locale) -> Self {
        let current = session.step();
        let config = session.config();
        let pricing = session.pricing();

        let steps = [
            CheckoutStep::CustomerInfo,
            CheckoutStep::ProtectionPlan,
            CheckoutStep::VerificationDocuments,
            CheckoutStep::Review,
        ]
        .into_iter()
        .map(|step| StepView {
            step,
            number: locale.digits(&step.number().to_string()),
            title: locale.text(step.title()),
            current: step == current,
            completed: step < current || session.is_submitted(),
        })
        .collect();

        Self {
            id: session.id().to_string(),
            locale,
            direction: locale.direction(),
            step: current,
            steps,
            configuration: ConfigurationView {
                product_name: config.product_name.clone(),
                product_image_url: config.product_image_url.clone(),
                storage: config.storage.label.clone(),
                color: color_name(&config.color, locale),
                condition: locale.text(config.condition.label()),
                lease_term: locale.text(config.lease_term.label()),
            },
            totals: TotalsView {
                monthly_price: PriceView::new(pricing.monthly_price, locale),
                protection_price: pricing
                    .protection_price
                    .map(|price| PriceView::new(price, locale)),
                monthly_total: PriceView::new(pricing.monthly_total, locale),
                lease_months: pricing.lease_months,
                contract_total: PriceView::new(pricing.contract_total, locale),
            },
            customer: session.customer().map(CustomerInfo::to_form),
            add_protection: session.add_protection(),
            documents: session.documents().map(|docs| DocumentsView {
                national_id: DocumentView {
                    file_name: docs.national_id.file_name.clone(),
                    size_bytes: docs.national_id.size_bytes,
                },
                salary_certificate: DocumentView {
                    file_name: docs.salary_certificate.file_name.clone(),
                    size_bytes: docs.salary_certificate.size_bytes,
                },
            }),
            confirmation: session.receipt().map(|receipt| {
                let reference = receipt.reference();
                ConfirmationView {
                    order_id: receipt.order_id.to_string(),
                    message: locale.render(Message::OrderConfirmed, &[&reference]),
                    reference,
                }
            }),
        }
    }
}
