//! Unified error handling with Sentry integration.
//!
//! Handlers return [`ApiError`], an [`AppError`] paired with the locale the
//! shopper is browsing in, so every error body carries translated text.
//! Server-side failures are captured to Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tajeer_core::checkout::{Field, StepError};
use tajeer_core::{ConfigurationError, Locale, Message, ProductId};
use thiserror::Error;

use crate::backend::BackendError;
use crate::services::SubmissionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A checkout transition was refused.
    #[error("Checkout error: {0}")]
    Step(#[from] StepError),

    /// Product options do not form a usable configuration.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Document upload or order creation failed.
    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// No checkout is attached to the session.
    #[error("No checkout in progress")]
    NoCheckout,

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Backend service failure outside of submission.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Step(StepError::Invalid(_)) | Self::Configuration(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Step(_) | Self::Submission(SubmissionError::DocumentsExpired) => {
                StatusCode::CONFLICT
            }
            Self::Submission(_) | Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::NoCheckout | Self::ProductNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Step(StepError::Invalid(_)) => "validation_failed",
            Self::Step(StepError::WrongStep { .. }) => "wrong_step",
            Self::Step(StepError::Incomplete(_)) => "step_incomplete",
            Self::Step(StepError::AtFirstStep) => "at_first_step",
            Self::Step(StepError::AtLastStep) => "at_last_step",
            Self::Step(StepError::AlreadySubmitted) => "already_submitted",
            Self::Configuration(_) => "invalid_configuration",
            Self::Submission(SubmissionError::DocumentsExpired) => "documents_expired",
            Self::Submission(SubmissionError::Upload { .. }) => "document_upload_failed",
            Self::Submission(SubmissionError::Order(_)) => "order_submission_failed",
            Self::NoCheckout => "no_checkout",
            Self::ProductNotFound(_) => "product_not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Backend(_) => "backend_unavailable",
            Self::Session(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// Message shown to the shopper. Internal details are never exposed.
    #[must_use]
    pub const fn message(&self) -> Message {
        match self {
            Self::Step(e) => e.message(),
            Self::Configuration(ConfigurationError::Incomplete { .. }) => {
                Message::ConfigurationIncomplete
            }
            Self::Configuration(_) | Self::BadRequest(_) => Message::InvalidRequest,
            Self::Submission(e) => e.message(),
            Self::NoCheckout => Message::CheckoutNotStarted,
            Self::ProductNotFound(_) => Message::ProductNotFound,
            Self::Backend(_) => Message::ServiceUnavailable,
            Self::Session(_) | Self::Internal(_) => Message::UnexpectedError,
        }
    }

    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Submission(SubmissionError::Upload { .. } | SubmissionError::Order(_)) => true,
            Self::Backend(e) => e.is_transient(),
            _ => false,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Submission(SubmissionError::Upload { .. } | SubmissionError::Order(_))
                | Self::Backend(_)
                | Self::Session(_)
                | Self::Internal(_)
        )
    }

    /// Attach the shopper's locale.
    #[must_use]
    pub const fn localized(self, locale: Locale) -> ApiError {
        ApiError {
            error: self,
            locale,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldMessage>,
    pub retryable: bool,
}

/// A translated validation message for one form field.
#[derive(Debug, Serialize)]
pub struct FieldMessage {
    pub field: Field,
    pub message: String,
}

/// An [`AppError`] rendered in a specific locale.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub locale: Locale,
}

impl ApiError {
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        let fields = match &self.error {
            AppError::Step(e) => e
                .field_errors()
                .map(|errors| {
                    errors
                        .iter()
                        .map(|e| FieldMessage {
                            field: e.field,
                            message: e.render(self.locale),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        ErrorBody {
            code: self.error.code(),
            message: self.locale.text(self.error.message()).to_string(),
            fields,
            retryable: self.error.is_retryable(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        error.localized(Locale::default())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_server_error() {
            let event_id = sentry::capture_error(&self.error);
            tracing::error!(
                error = %self.error,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self.error, "Request rejected");
        }

        (self.error.status(), Json(self.body())).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.localized(Locale::default()).into_response()
    }
}

/// Localize the error side of a result.
pub trait Localize<T> {
    /// # Errors
    ///
    /// Passes the original error through, tagged with `locale`.
    fn localize(self, locale: Locale) -> Result<T>;
}

impl<T, E: Into<AppError>> Localize<T> for std::result::Result<T, E> {
    fn localize(self, locale: Locale) -> Result<T> {
        self.map_err(|e| e.into().localized(locale))
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Tag Sentry events with the checkout being worked on.
pub fn set_sentry_checkout(checkout_id: &impl ToString, locale: Locale) {
    sentry::configure_scope(|scope| {
        scope.set_tag("checkout_id", checkout_id.to_string());
        scope.set_tag("locale", locale.tag());
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Moved to step 2", Some(&[("step", "2")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
