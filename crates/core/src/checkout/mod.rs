//! The four-step checkout.
//!
//! [`CheckoutSession`] owns the state machine. Per-step input lives in
//! [`customer`] and [`documents`]; step 4 produces an [`OrderDraft`] that the
//! storefront hands to its submission service.

pub mod customer;
pub mod documents;
pub mod error;
pub mod order;
pub mod session;
pub mod step;

pub use customer::{CustomerInfo, CustomerInfoForm, MIN_NAME_CHARS, OrderType};
pub use documents::{
    DocumentError, DocumentFormat, DocumentKind, DocumentUpload, MAX_DOCUMENT_BYTES,
    MAX_DOCUMENT_MEGABYTES, VerificationDocuments,
};
pub use error::{Field, FieldError, FieldErrors, StepError};
pub use order::{DocumentPaths, NewOrder, OrderDraft, OrderReceipt};
pub use session::CheckoutSession;
pub use step::CheckoutStep;
