//! Checkout validation and transition errors.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CheckoutStep;
use crate::i18n::{Locale, Message};

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Email,
    Phone,
    BusinessName,
    AddProtection,
    NationalId,
    SalaryCertificate,
}

/// A validation message attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: Message,
    /// Values substituted into the message placeholders.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: Field, message: Message) -> Self {
        Self {
            field,
            message,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args(field: Field, message: Message, args: Vec<String>) -> Self {
        Self {
            field,
            message,
            args,
        }
    }

    /// Localized message text.
    #[must_use]
    pub fn render(&self, locale: Locale) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        locale.render(self.message, &args)
    }
}

/// All validation failures for one step submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error for a field, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` when no errors were collected.
    ///
    /// # Errors
    ///
    /// Returns `self` when it holds at least one error.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.0.iter().map(|e| format!("{:?}", e.field)).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Why a checkout operation was refused.
///
/// None of these change the session; the shopper stays on the current step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// Submitted data failed validation.
    #[error("{0}")]
    Invalid(FieldErrors),

    /// The operation belongs to another step.
    #[error("operation for {expected} attempted on {actual}")]
    WrongStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    /// Data required to leave this step has not been captured.
    #[error("{0} has not been completed")]
    Incomplete(CheckoutStep),

    #[error("already on the first step")]
    AtFirstStep,

    #[error("already on the last step")]
    AtLastStep,

    #[error("checkout has already been submitted")]
    AlreadySubmitted,
}

impl StepError {
    /// Top-level message for the shopper.
    #[must_use]
    pub const fn message(&self) -> Message {
        match self {
            Self::Invalid(_) | Self::Incomplete(_) | Self::WrongStep { .. } => Message::WrongStep,
            Self::AtFirstStep | Self::AtLastStep => Message::WrongStep,
            Self::AlreadySubmitted => Message::CheckoutNotStarted,
        }
    }

    /// Field-level errors, empty for navigation errors.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for StepError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(7), Ok(7));

        let errors: FieldErrors =
            FieldError::new(Field::Email, Message::EmailInvalid).into();
        assert!(errors.clone().into_result(7).is_err());
        assert_eq!(errors.len(), 1);
        assert!(errors.get(Field::Email).is_some());
        assert!(errors.get(Field::Phone).is_none());
    }

    #[test]
    fn test_field_error_render() {
        let error = FieldError::with_args(
            Field::NationalId,
            Message::DocumentTooLarge,
            vec!["5".to_string()],
        );
        assert_eq!(error.render(Locale::En), "File must be 5 MB or smaller");
        assert_eq!(
            error.render(Locale::Ar),
            "يجب ألا يتجاوز حجم الملف ٥ ميجابايت"
        );
    }

    #[test]
    fn test_field_errors_serialize_as_list() {
        let errors: FieldErrors = FieldError::new(Field::FullName, Message::NameTooShort).into();
        let json = serde_json::to_value(&errors).unwrap_or_default();
        assert_eq!(json[0]["field"], "full_name");
        assert_eq!(json[0]["message"], "name_too_short");
    }
}
