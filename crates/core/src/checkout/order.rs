//! The order assembled at step 4.

use serde::{Deserialize, Serialize};

use super::customer::CustomerInfo;
use super::documents::{DocumentKind, VerificationDocuments};
use crate::catalog::CheckoutConfig;
use crate::i18n::Locale;
use crate::pricing::OrderPricing;
use crate::types::{CheckoutId, OrderId};

/// Everything captured by the four steps, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub checkout_id: CheckoutId,
    pub locale: Locale,
    pub customer: CustomerInfo,
    pub configuration: CheckoutConfig,
    pub add_protection: bool,
    pub pricing: OrderPricing,
    pub documents: VerificationDocuments,
}

impl OrderDraft {
    /// Object path for one of the draft's documents.
    #[must_use]
    pub fn document_path(&self, kind: DocumentKind) -> String {
        self.documents.get(kind).storage_path(self.checkout_id)
    }
}

/// Storage paths of the uploaded documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPaths {
    pub national_id: String,
    pub salary_certificate: String,
}

/// A draft whose documents have been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub draft: OrderDraft,
    pub document_paths: DocumentPaths,
}

/// What the backend returns for a created order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    /// Human-facing order reference, when the backend assigns one.
    pub order_number: Option<String>,
}

impl OrderReceipt {
    /// Reference shown in the confirmation message.
    #[must_use]
    pub fn reference(&self) -> String {
        self.order_number
            .clone()
            .unwrap_or_else(|| self.order_id.to_string())
    }
}
