//! Monthly price resolution.
//!
//! The displayed monthly price for a configuration comes from the first
//! source that yields one:
//!
//! 1. an authoritative price stored by the backend for the exact
//!    `(product, storage, color, condition, term)` tuple, used verbatim;
//! 2. the [`FALLBACK_RULES`], tried in order, each producing a term-specific
//!    figure that is rounded up to a whole unit;
//! 3. for refurbished devices, the fallback figure less
//!    [`REFURBISHED_DISCOUNT_PERCENT`], rounded up again.
//!
//! Every rounding step is a ceiling: a displayed price is never lower than
//! what is billed.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{
    CheckoutConfig, ColorOption, Condition, ConfigurationError, LeaseTerm, Product,
    ProductConfiguration, StorageOption,
};
use crate::i18n::{Locale, Message};
use crate::types::{CurrencyCode, Price, ceil_whole};

/// Flat discount applied to refurbished fallback prices.
pub const REFURBISHED_DISCOUNT_PERCENT: u32 = 20;

/// Protection plan price as a share of the monthly lease price.
pub const PROTECTION_PLAN_PERCENT: u32 = 10;

/// Where a quoted price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Stored by the backend for the exact configuration.
    Authoritative,
    /// The storage option's exact price for the term.
    StorageTermPrice,
    /// Base price plus option modifiers, scaled by the term multiplier.
    ModifiedBasePrice,
}

/// Fallback rules, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackRule {
    StorageTermPrice,
    ModifiedBasePrice,
}

/// The fallback decision table.
pub const FALLBACK_RULES: [FallbackRule; 2] =
    [FallbackRule::StorageTermPrice, FallbackRule::ModifiedBasePrice];

/// Everything the resolver needs to price a configuration.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    pub base_price: Decimal,
    pub currency_code: CurrencyCode,
    pub storage: Option<&'a StorageOption>,
    pub color: Option<&'a ColorOption>,
    pub condition: Condition,
    pub lease_term: LeaseTerm,
}

impl<'a> PricingInput<'a> {
    /// Build the input for a configuration of `product`.
    ///
    /// # Errors
    ///
    /// Returns an error when no lease term is selected or the configuration
    /// belongs to another product.
    pub fn for_configuration(
        product: &Product,
        config: &'a ProductConfiguration,
    ) -> Result<Self, ConfigurationError> {
        if config.product_id() != product.id {
            return Err(ConfigurationError::ProductMismatch {
                configured: config.product_id(),
                given: product.id,
            });
        }
        let lease_term = config
            .lease_term()
            .ok_or_else(|| ConfigurationError::Incomplete {
                missing: config.missing(),
            })?;
        Ok(Self {
            base_price: product.base_price,
            currency_code: product.currency_code,
            storage: config.storage(),
            color: config.color(),
            condition: config.condition(),
            lease_term,
        })
    }

    fn color_modifier(&self) -> Decimal {
        self.color.map_or(Decimal::ZERO, |c| c.price_modifier)
    }
}

impl FallbackRule {
    /// The unrounded new-condition figure this rule yields, if it applies.
    #[must_use]
    pub fn term_figure(&self, input: &PricingInput<'_>) -> Option<Decimal> {
        match self {
            Self::StorageTermPrice => input
                .storage?
                .exact_prices
                .get(input.lease_term)
                .map(|exact| exact + input.color_modifier()),
            Self::ModifiedBasePrice => {
                let storage_modifier = input.storage.map_or(Decimal::ZERO, |s| s.price_modifier);
                let modified = input.base_price + storage_modifier + input.color_modifier();
                Some(modified * input.lease_term.fallback_multiplier())
            }
        }
    }

    #[must_use]
    pub const fn source(&self) -> PriceSource {
        match self {
            Self::StorageTermPrice => PriceSource::StorageTermPrice,
            Self::ModifiedBasePrice => PriceSource::ModifiedBasePrice,
        }
    }
}

/// A badge shown next to a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum PriceBadge {
    /// Lease-term savings against the base price, new devices only.
    PercentOff(u32),
    /// The refurbished discount.
    Refurbished(u32),
}

impl PriceBadge {
    /// Localized badge text.
    #[must_use]
    pub fn label(&self, locale: Locale) -> String {
        match self {
            Self::PercentOff(percent) => {
                locale.render(Message::BadgePercentOff, &[&percent.to_string()])
            }
            Self::Refurbished(percent) => {
                locale.render(Message::BadgeRefurbished, &[&percent.to_string()])
            }
        }
    }
}

/// A resolved monthly price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub monthly: Price,
    pub source: PriceSource,
    pub condition: Condition,
    pub lease_term: LeaseTerm,
    pub badge: Option<PriceBadge>,
}

/// The new-condition fallback figure (rounded up) and the rule that produced it.
#[must_use]
pub fn fallback_new_price(input: &PricingInput<'_>) -> (Decimal, PriceSource) {
    FALLBACK_RULES
        .iter()
        .find_map(|rule| {
            rule.term_figure(input)
                .map(|figure| (ceil_whole(figure), rule.source()))
        })
        .unwrap_or_else(|| (ceil_whole(input.base_price), PriceSource::ModifiedBasePrice))
}

/// Apply the refurbished discount to a new-condition figure, rounding up.
#[must_use]
pub fn apply_condition(amount: Decimal, condition: Condition) -> Decimal {
    match condition {
        Condition::New => amount,
        Condition::Refurbished => ceil_whole(amount * retained_share(REFURBISHED_DISCOUNT_PERCENT)),
    }
}

/// Resolve the displayed monthly price.
///
/// A positive `authoritative` price wins outright. Otherwise the fallback
/// rules and the condition discount apply.
#[must_use]
pub fn resolve(input: &PricingInput<'_>, authoritative: Option<Decimal>) -> PriceQuote {
    let (amount, source) = match authoritative.filter(|p| *p > Decimal::ZERO) {
        Some(price) => (price, PriceSource::Authoritative),
        None => {
            let (figure, source) = fallback_new_price(input);
            (apply_condition(figure, input.condition), source)
        }
    };

    PriceQuote {
        monthly: Price::new(amount, input.currency_code),
        source,
        condition: input.condition,
        lease_term: input.lease_term,
        badge: discount_badge(input.base_price, amount, input.condition),
    }
}

/// Badge for a resolved price.
///
/// Refurbished configurations always carry the refurbished badge. New ones
/// show the percentage saved against `base_price`, only when the resolved
/// price is strictly lower and the rounded percentage is at least 1.
#[must_use]
pub fn discount_badge(
    base_price: Decimal,
    resolved: Decimal,
    condition: Condition,
) -> Option<PriceBadge> {
    match condition {
        Condition::Refurbished => Some(PriceBadge::Refurbished(REFURBISHED_DISCOUNT_PERCENT)),
        Condition::New => {
            if base_price <= Decimal::ZERO || resolved >= base_price {
                return None;
            }
            let percent = ((base_price - resolved) / base_price * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            percent
                .to_u32()
                .filter(|p| *p > 0)
                .map(PriceBadge::PercentOff)
        }
    }
}

/// Monthly price of the protection plan for a lease price, rounded up.
#[must_use]
pub fn protection_price(monthly: Price) -> Price {
    let amount = monthly.amount * Decimal::from(PROTECTION_PLAN_PERCENT) / Decimal::ONE_HUNDRED;
    Price::new(ceil_whole(amount), monthly.currency_code)
}

/// Monthly totals for a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPricing {
    pub monthly_price: Price,
    pub protection_price: Option<Price>,
    pub monthly_total: Price,
    pub lease_months: u32,
    pub contract_total: Price,
}

impl OrderPricing {
    /// Totals for a frozen configuration with or without protection.
    #[must_use]
    pub fn for_checkout(config: &CheckoutConfig, add_protection: bool) -> Self {
        let monthly_price = config.price;
        let protection = add_protection.then(|| protection_price(monthly_price));
        let monthly_total = Price::new(
            monthly_price.amount + protection.map_or(Decimal::ZERO, |p| p.amount),
            monthly_price.currency_code,
        );
        let lease_months = config.lease_term.months();
        let contract_total = Price::new(
            monthly_total.amount * Decimal::from(lease_months),
            monthly_price.currency_code,
        );
        Self {
            monthly_price,
            protection_price: protection,
            monthly_total,
            lease_months,
            contract_total,
        }
    }
}

fn retained_share(discount_percent: u32) -> Decimal {
    Decimal::from(100 - discount_percent) / Decimal::ONE_HUNDRED
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::TermPrices;
    use crate::catalog::fixtures::*;

    fn input<'a>(
        storage: Option<&'a StorageOption>,
        color: Option<&'a ColorOption>,
        condition: Condition,
        lease_term: LeaseTerm,
    ) -> PricingInput<'a> {
        PricingInput {
            base_price: Decimal::from(300),
            currency_code: CurrencyCode::SAR,
            storage,
            color,
            condition,
            lease_term,
        }
    }

    #[test]
    fn test_refurbished_24_month_scenario() {
        // 300 + 20 storage, 24 months: ceil(320 * 0.75) = 240, refurbished: ceil(240 * 0.8) = 192
        let storage = storage_256();
        let quote = resolve(
            &input(Some(&storage), None, Condition::Refurbished, LeaseTerm::TwentyFourMonths),
            None,
        );
        assert_eq!(quote.monthly.amount, Decimal::from(192));
        assert_eq!(quote.source, PriceSource::ModifiedBasePrice);
        assert_eq!(quote.badge, Some(PriceBadge::Refurbished(20)));
    }

    #[test]
    fn test_authoritative_price_is_used_verbatim() {
        let storage = storage_256();
        let quote = resolve(
            &input(Some(&storage), None, Condition::Refurbished, LeaseTerm::TwentyFourMonths),
            Some(Decimal::new(19950, 2)),
        );
        assert_eq!(quote.monthly.amount, Decimal::new(19950, 2));
        assert_eq!(quote.source, PriceSource::Authoritative);
    }

    #[test]
    fn test_non_positive_authoritative_price_falls_through() {
        let quote = resolve(
            &input(None, None, Condition::New, LeaseTerm::TwelveMonths),
            Some(Decimal::ZERO),
        );
        assert_eq!(quote.source, PriceSource::ModifiedBasePrice);
        assert_eq!(quote.monthly.amount, Decimal::from(300));
    }

    #[test]
    fn test_storage_term_price_wins_over_multiplier() {
        let mut storage = storage_256();
        storage.exact_prices = TermPrices {
            thirty_six_months: Some(Decimal::new(2105, 1)),
            ..TermPrices::default()
        };
        let mut color = graphite();
        color.price_modifier = Decimal::from(5);

        let quote = resolve(
            &input(Some(&storage), Some(&color), Condition::New, LeaseTerm::ThirtySixMonths),
            None,
        );
        // 210.5 + 5 color, no multiplier, rounded up
        assert_eq!(quote.monthly.amount, Decimal::from(216));
        assert_eq!(quote.source, PriceSource::StorageTermPrice);

        // Other terms still use the modified base price.
        let quote = resolve(
            &input(Some(&storage), Some(&color), Condition::New, LeaseTerm::TwentyFourMonths),
            None,
        );
        assert_eq!(quote.monthly.amount, Decimal::new(24375, 2).ceil());
        assert_eq!(quote.source, PriceSource::ModifiedBasePrice);
    }

    #[test]
    fn test_missing_storage_uses_base_price() {
        let figure = FallbackRule::StorageTermPrice
            .term_figure(&input(None, None, Condition::New, LeaseTerm::Monthly));
        assert_eq!(figure, None);

        let (amount, source) =
            fallback_new_price(&input(None, None, Condition::New, LeaseTerm::ThirtySixMonths));
        assert_eq!(amount, Decimal::from(210));
        assert_eq!(source, PriceSource::ModifiedBasePrice);
    }

    #[test]
    fn test_fallback_is_non_increasing_with_term_length() {
        let storage = storage_256();
        let color = graphite();
        for condition in [Condition::New, Condition::Refurbished] {
            let prices: Vec<Decimal> = LeaseTerm::ALL
                .iter()
                .map(|term| {
                    resolve(&input(Some(&storage), Some(&color), condition, *term), None)
                        .monthly
                        .amount
                })
                .collect();
            assert!(
                prices.windows(2).all(|w| w[0] >= w[1]),
                "{condition:?}: {prices:?}"
            );
        }
    }

    #[test]
    fn test_refurbished_is_ceil_of_80_percent_of_new() {
        let storage = storage_128();
        for base in [99, 149, 301, 333, 1000] {
            for term in LeaseTerm::ALL {
                let mut new_input = input(Some(&storage), None, Condition::New, term);
                new_input.base_price = Decimal::from(base);
                let refurbished_input = PricingInput {
                    condition: Condition::Refurbished,
                    ..new_input
                };

                let new_price = resolve(&new_input, None).monthly.amount;
                let refurbished = resolve(&refurbished_input, None).monthly.amount;
                assert_eq!(refurbished, (new_price * Decimal::new(8, 1)).ceil());
            }
        }
    }

    #[test]
    fn test_percent_off_badge_for_new_devices() {
        // 300 base, 36 months: 210, 30% off
        let quote = resolve(&input(None, None, Condition::New, LeaseTerm::ThirtySixMonths), None);
        assert_eq!(quote.badge, Some(PriceBadge::PercentOff(30)));
        assert_eq!(quote.badge.unwrap().label(Locale::En), "30% off");
        assert_eq!(quote.badge.unwrap().label(Locale::Ar), "خصم ٣٠٪");
    }

    #[test]
    fn test_no_badge_when_not_cheaper() {
        assert_eq!(
            discount_badge(Decimal::from(300), Decimal::from(300), Condition::New),
            None
        );
        assert_eq!(
            discount_badge(Decimal::from(300), Decimal::from(320), Condition::New),
            None
        );
        assert_eq!(
            discount_badge(Decimal::ZERO, Decimal::from(10), Condition::New),
            None
        );
    }

    #[test]
    fn test_badge_hidden_below_one_percent() {
        assert_eq!(
            discount_badge(Decimal::from(300), Decimal::from(299), Condition::New),
            None
        );
    }

    #[test]
    fn test_badge_rounds_half_up() {
        // 12.5% off
        assert_eq!(
            discount_badge(Decimal::from(200), Decimal::from(175), Condition::New),
            Some(PriceBadge::PercentOff(13))
        );
    }

    #[test]
    fn test_protection_price_is_ten_percent_rounded_up() {
        let price = protection_price(Price::from_amount(Decimal::from(192)));
        assert_eq!(price.amount, Decimal::from(20));
        let price = protection_price(Price::from_amount(Decimal::from(240)));
        assert_eq!(price.amount, Decimal::from(24));
    }

    #[test]
    fn test_order_pricing_totals() {
        let config = checkout_config();
        let with = OrderPricing::for_checkout(&config, true);
        assert_eq!(with.monthly_price.amount, Decimal::from(240));
        assert_eq!(with.protection_price.unwrap().amount, Decimal::from(24));
        assert_eq!(with.monthly_total.amount, Decimal::from(264));
        assert_eq!(with.lease_months, 24);
        assert_eq!(with.contract_total.amount, Decimal::from(6336));

        let without = OrderPricing::for_checkout(&config, false);
        assert_eq!(without.protection_price, None);
        assert_eq!(without.monthly_total.amount, Decimal::from(240));
    }

    #[test]
    fn test_for_configuration_requires_term() {
        let product = phone_product();
        let config = ProductConfiguration::new(product.id);
        assert!(matches!(
            PricingInput::for_configuration(&product, &config),
            Err(ConfigurationError::Incomplete { .. })
        ));

        let config = complete_configuration(LeaseTerm::TwentyFourMonths, Condition::Refurbished);
        let input = PricingInput::for_configuration(&product, &config).unwrap();
        assert_eq!(resolve(&input, None).monthly.amount, Decimal::from(192));
    }
}
