//! Checkout wizard steps.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::funnel::FunnelStep;
use crate::i18n::Message;

/// The four linear checkout steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    CustomerInfo,
    ProtectionPlan,
    VerificationDocuments,
    Review,
}

impl CheckoutStep {
    pub const FIRST: Self = Self::CustomerInfo;
    pub const LAST: Self = Self::Review;

    /// 1-based position shown in the progress indicator.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::CustomerInfo => 1,
            Self::ProtectionPlan => 2,
            Self::VerificationDocuments => 3,
            Self::Review => 4,
        }
    }

    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::CustomerInfo),
            2 => Some(Self::ProtectionPlan),
            3 => Some(Self::VerificationDocuments),
            4 => Some(Self::Review),
            _ => None,
        }
    }

    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    #[must_use]
    pub const fn previous(&self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// Translation key for the step heading.
    #[must_use]
    pub const fn title(&self) -> Message {
        match self {
            Self::CustomerInfo => Message::StepCustomerInfo,
            Self::ProtectionPlan => Message::StepProtectionPlan,
            Self::VerificationDocuments => Message::StepVerificationDocuments,
            Self::Review => Message::StepReview,
        }
    }

    /// Funnel checkpoint recorded when the shopper lands on this step.
    #[must_use]
    pub const fn funnel_step(&self) -> FunnelStep {
        match self {
            Self::CustomerInfo => FunnelStep::CustomerInfo,
            Self::ProtectionPlan => FunnelStep::ProtectionPlan,
            Self::VerificationDocuments => FunnelStep::VerificationDocuments,
            Self::Review => FunnelStep::Review,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.number())
    }
}
