//! Typed localization for the English and Arabic storefronts.
//!
//! Every user-facing string is a [`Message`] key. Each locale provides an
//! exhaustive `match` over the keys, so adding a key without translating it
//! fails to compile. Strings are resolved once per response through
//! [`Locale::text`] or [`Locale::render`].

mod ar;
mod en;

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Supported storefront locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Locale {
    /// BCP 47 language tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::En => Direction::Ltr,
            Self::Ar => Direction::Rtl,
        }
    }

    /// Parse a language tag such as `ar`, `ar-SA` or `en_US`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    /// Pick the first supported locale from an `Accept-Language` header.
    ///
    /// Entries are considered in descending `q` order; ties keep header order.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, usize, &str)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, entry)| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                let quality = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then_some((quality, position, tag))
            })
            .collect();

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.into_iter().find_map(|(_, _, tag)| Self::from_tag(tag))
    }

    /// Translated text for a key.
    #[must_use]
    pub const fn text(&self, message: Message) -> &'static str {
        match self {
            Self::En => en::text(message),
            Self::Ar => ar::text(message),
        }
    }

    /// Translated text with `{0}`, `{1}`, ... replaced by `args`.
    ///
    /// Digits inside arguments are localized as well.
    #[must_use]
    pub fn render(&self, message: Message, args: &[&str]) -> String {
        let args: Vec<String> = args.iter().map(|arg| self.digits(arg)).collect();
        fill_placeholders(self.text(message), &args)
    }

    /// Convert ASCII digits to the locale's numerals.
    #[must_use]
    pub fn digits(&self, s: &str) -> String {
        match self {
            Self::En => s.to_string(),
            Self::Ar => localize_digits(s),
        }
    }

    /// Format a price for display, e.g. `SAR 192` or `١٩٢ ر.س`.
    #[must_use]
    pub fn format_price(&self, price: &Price) -> String {
        let amount = price.amount.normalize().to_string();
        match self {
            Self::En => format!("{} {amount}", price.currency_code.code()),
            Self::Ar => format!(
                "{} {}",
                localize_digits(&amount),
                price.currency_code.arabic_symbol()
            ),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unsupported locale: {s}"))
    }
}

/// Replace ASCII digits with Arabic-Indic digits and `.` with the Arabic
/// decimal separator.
#[must_use]
pub fn localize_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32(0x0660 + (u32::from(c) - u32::from('0'))).unwrap_or(c),
            '.' => '\u{066B}',
            _ => c,
        })
        .collect()
}

/// Keys for every user-facing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    // Checkout steps
    StepCustomerInfo,
    StepProtectionPlan,
    StepVerificationDocuments,
    StepReview,

    // Lease terms
    TermMonthly,
    TermTwelveMonths,
    TermTwentyFourMonths,
    TermThirtySixMonths,
    TermMonthlyDescription,
    TermTwelveMonthsDescription,
    TermTwentyFourMonthsDescription,
    TermThirtySixMonthsDescription,

    // Conditions
    ConditionNew,
    ConditionRefurbished,

    // Badges and pricing
    BadgePercentOff,
    BadgeRefurbished,
    PerMonth,
    ProtectionPlanName,
    ProtectionPlanDescription,

    // Customer info validation
    NameTooShort,
    EmailRequired,
    EmailInvalid,
    PhoneRequired,
    PhoneInvalid,
    BusinessNameRequired,

    // Protection plan validation
    ProtectionChoiceRequired,

    // Document validation
    DocumentRequired,
    DocumentTooLarge,
    DocumentUnsupportedType,
    DocumentEmpty,

    // Submission
    DocumentUploadFailed,
    OrderSubmissionFailed,
    DocumentsExpired,
    OrderConfirmed,

    // Navigation
    WrongStep,
    CheckoutNotStarted,
    ConfigurationIncomplete,

    // General errors
    ProductNotFound,
    InvalidRequest,
    ServiceUnavailable,
    UnexpectedError,
}

/// Replace each `{n}` in one pass over `template`. Text coming from an
/// argument is never scanned again, and unknown indexes are left as written.
fn fill_placeholders(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((args.get(index)?, close))
        });
        match arg {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction() {
        assert_eq!(Locale::En.direction(), Direction::Ltr);
        assert_eq!(Locale::Ar.direction(), Direction::Rtl);
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("ar-SA"), Some(Locale::Ar));
        assert_eq!(Locale::from_tag("EN_us"), Some(Locale::En));
        assert_eq!(Locale::from_tag("fr"), None);
    }

    #[test]
    fn test_from_accept_language_respects_quality() {
        assert_eq!(
            Locale::from_accept_language("fr-FR,en;q=0.5,ar;q=0.9"),
            Some(Locale::Ar)
        );
        assert_eq!(Locale::from_accept_language("ar;q=0,en"), Some(Locale::En));
        assert_eq!(Locale::from_accept_language("de, fr"), None);
    }

    #[test]
    fn test_localize_digits() {
        assert_eq!(localize_digits("192"), "١٩٢");
        assert_eq!(localize_digits("12.5%"), "١٢٫٥%");
        assert_eq!(localize_digits("abc"), "abc");
    }

    #[test]
    fn test_render_fills_placeholders_with_local_digits() {
        assert_eq!(Locale::En.render(Message::BadgePercentOff, &["25"]), "25% off");
        assert_eq!(Locale::Ar.render(Message::BadgePercentOff, &["25"]), "خصم ٢٥٪");
    }

    #[test]
    fn test_placeholder_text_inside_arguments_is_kept() {
        let args = ["{1}".to_string(), "TJ-7".to_string()];
        assert_eq!(fill_placeholders("{0} then {1}", &args), "{1} then TJ-7");
        assert_eq!(fill_placeholders("{2} {x} {", &args), "{2} {x} {");
        assert_eq!(
            Locale::En.render(Message::OrderConfirmed, &["{0}"]),
            "Thank you! Your order {0} has been received."
        );
    }

    #[test]
    fn test_format_price() {
        let price = Price::from_amount(rust_decimal::Decimal::from(192));
        assert_eq!(Locale::En.format_price(&price), "SAR 192");
        assert_eq!(Locale::Ar.format_price(&price), "١٩٢ ر.س");
    }

    #[test]
    fn test_every_message_is_translated() {
        for message in ALL_MESSAGES {
            assert!(!Locale::En.text(message).is_empty(), "{message:?}");
            assert!(!Locale::Ar.text(message).is_empty(), "{message:?}");
        }
    }

    const ALL_MESSAGES: [Message; 41] = [
        Message::StepCustomerInfo,
        Message::StepProtectionPlan,
        Message::StepVerificationDocuments,
        Message::StepReview,
        Message::TermMonthly,
        Message::TermTwelveMonths,
        Message::TermTwentyFourMonths,
        Message::TermThirtySixMonths,
        Message::TermMonthlyDescription,
        Message::TermTwelveMonthsDescription,
        Message::TermTwentyFourMonthsDescription,
        Message::TermThirtySixMonthsDescription,
        Message::ConditionNew,
        Message::ConditionRefurbished,
        Message::BadgePercentOff,
        Message::BadgeRefurbished,
        Message::PerMonth,
        Message::ProtectionPlanName,
        Message::ProtectionPlanDescription,
        Message::NameTooShort,
        Message::EmailRequired,
        Message::EmailInvalid,
        Message::PhoneRequired,
        Message::PhoneInvalid,
        Message::BusinessNameRequired,
        Message::ProtectionChoiceRequired,
        Message::DocumentRequired,
        Message::DocumentTooLarge,
        Message::DocumentUnsupportedType,
        Message::DocumentEmpty,
        Message::DocumentUploadFailed,
        Message::OrderSubmissionFailed,
        Message::DocumentsExpired,
        Message::OrderConfirmed,
        Message::WrongStep,
        Message::CheckoutNotStarted,
        Message::ConfigurationIncomplete,
        Message::ProductNotFound,
        Message::InvalidRequest,
        Message::ServiceUnavailable,
        Message::UnexpectedError,
    ];
}
