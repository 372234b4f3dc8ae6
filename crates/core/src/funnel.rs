//! Checkout funnel analytics events.
//!
//! Events are recorded fire-and-forget; nothing here performs I/O.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::i18n::Locale;
use crate::types::CheckoutId;

/// Funnel checkpoints, stored by their snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStep {
    CheckoutStarted,
    CustomerInfo,
    ProtectionPlan,
    VerificationDocuments,
    Review,
    OrderSubmitted,
    CheckoutAbandoned,
}

impl FunnelStep {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutStarted => "checkout_started",
            Self::CustomerInfo => "customer_info",
            Self::ProtectionPlan => "protection_plan",
            Self::VerificationDocuments => "verification_documents",
            Self::Review => "review",
            Self::OrderSubmitted => "order_submitted",
            Self::CheckoutAbandoned => "checkout_abandoned",
        }
    }
}

impl fmt::Display for FunnelStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse device class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceKind {
    /// Classify a `User-Agent` header. Unknown agents count as desktop.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let android = ua.contains("android");

        if ua.contains("ipad") || ua.contains("tablet") || (android && !ua.contains("mobile")) {
            Self::Tablet
        } else if android || ua.contains("iphone") || ua.contains("ipod") || ua.contains("mobile")
        {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Where the shopper came from: an explicit `utm_source`, else the referrer
/// host, else unknown.
#[must_use]
pub fn traffic_source(utm_source: Option<&str>, referrer: Option<&str>) -> Option<String> {
    utm_source
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .or_else(|| {
            let url = Url::parse(referrer?.trim()).ok()?;
            let host = url.host_str()?;
            Some(host.strip_prefix("www.").unwrap_or(host).to_ascii_lowercase())
        })
}

/// One funnel checkpoint for one checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelEvent {
    pub session_id: CheckoutId,
    pub step: FunnelStep,
    pub device: DeviceKind,
    pub source: Option<String>,
    pub locale: Locale,
    pub occurred_at: DateTime<Utc>,
}

/// Request metadata attached to every event of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitContext {
    pub device: DeviceKind,
    pub source: Option<String>,
}

impl VisitContext {
    #[must_use]
    pub fn new(user_agent: Option<&str>, utm_source: Option<&str>, referrer: Option<&str>) -> Self {
        Self {
            device: user_agent.map(DeviceKind::from_user_agent).unwrap_or_default(),
            source: traffic_source(utm_source, referrer),
        }
    }

    /// Event for `step`, timestamped now.
    #[must_use]
    pub fn event(&self, session_id: CheckoutId, step: FunnelStep, locale: Locale) -> FunnelEvent {
        FunnelEvent {
            session_id,
            step,
            device: self.device,
            source: self.source.clone(),
            locale,
            occurred_at: Utc::now(),
        }
    }
}
