//! Step 1: customer details.

use serde::{Deserialize, Serialize};

use super::error::{Field, FieldError, FieldErrors};
use crate::i18n::Message;
use crate::types::{Email, EmailError, Phone, PhoneError};

/// Minimum number of characters in a full name, after trimming.
pub const MIN_NAME_CHARS: usize = 2;

/// Who the lease is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Individual,
    Business,
}

/// Raw form input for step 1, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInfoForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub order_type: OrderType,
    pub business_name: Option<String>,
}

/// Validated customer details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: Email,
    pub phone: Phone,
    pub order_type: OrderType,
    /// Present exactly when `order_type` is [`OrderType::Business`].
    pub business_name: Option<String>,
}

impl CustomerInfo {
    #[must_use]
    pub const fn is_business_order(&self) -> bool {
        matches!(self.order_type, OrderType::Business)
    }

    /// Form pre-filled with these details, for going back to step 1.
    #[must_use]
    pub fn to_form(&self) -> CustomerInfoForm {
        CustomerInfoForm {
            full_name: self.full_name.clone(),
            email: self.email.to_string(),
            phone: self.phone.local_format(),
            order_type: self.order_type,
            business_name: self.business_name.clone(),
        }
    }
}

impl CustomerInfoForm {
    /// Validate every field, collecting all failures.
    ///
    /// A business name typed for an individual order is discarded.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per invalid field.
    pub fn validate(&self) -> Result<CustomerInfo, FieldErrors> {
        let mut errors = FieldErrors::new();

        let full_name = self.full_name.trim();
        if full_name.chars().count() < MIN_NAME_CHARS {
            errors.push(FieldError::new(Field::FullName, Message::NameTooShort));
        }

        let email = Email::parse(&self.email)
            .map_err(|e| {
                let message = match e {
                    EmailError::Empty => Message::EmailRequired,
                    _ => Message::EmailInvalid,
                };
                errors.push(FieldError::new(Field::Email, message));
            })
            .ok();

        let phone = Phone::parse(&self.phone)
            .map_err(|e| {
                let message = match e {
                    PhoneError::Empty => Message::PhoneRequired,
                    PhoneError::InvalidCharacters | PhoneError::InvalidFormat => {
                        Message::PhoneInvalid
                    }
                };
                errors.push(FieldError::new(Field::Phone, message));
            })
            .ok();

        let business_name = match self.order_type {
            OrderType::Individual => None,
            OrderType::Business => {
                let name = self
                    .business_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty());
                if name.is_none() {
                    errors.push(FieldError::new(
                        Field::BusinessName,
                        Message::BusinessNameRequired,
                    ));
                }
                name.map(ToString::to_string)
            }
        };

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => Ok(CustomerInfo {
                full_name: full_name.to_string(),
                email,
                phone,
                order_type: self.order_type,
                business_name,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use super::*;

    pub fn valid_form() -> CustomerInfoForm {
        CustomerInfoForm {
            full_name: "Sara Alqahtani".to_string(),
            email: "sara@example.sa".to_string(),
            phone: "0501234567".to_string(),
            order_type: OrderType::Individual,
            business_name: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::valid_form;
    use super::*;

    #[test]
    fn test_valid_individual() {
        let info = valid_form().validate().unwrap();
        assert_eq!(info.full_name, "Sara Alqahtani");
        assert_eq!(info.phone.as_str(), "+966501234567");
        assert!(!info.is_business_order());
        assert_eq!(info.business_name, None);
    }

    #[test]
    fn test_collects_every_invalid_field() {
        let form = CustomerInfoForm {
            full_name: " S ".to_string(),
            email: "not-an-email".to_string(),
            phone: String::new(),
            order_type: OrderType::Business,
            business_name: Some("   ".to_string()),
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(Field::FullName).map(|e| e.message),
            Some(Message::NameTooShort)
        );
        assert_eq!(
            errors.get(Field::Email).map(|e| e.message),
            Some(Message::EmailInvalid)
        );
        assert_eq!(
            errors.get(Field::Phone).map(|e| e.message),
            Some(Message::PhoneRequired)
        );
        assert_eq!(
            errors.get(Field::BusinessName).map(|e| e.message),
            Some(Message::BusinessNameRequired)
        );
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        let form = CustomerInfoForm {
            full_name: "س".to_string(),
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().get(Field::FullName).is_some());

        let form = CustomerInfoForm {
            full_name: "سارة".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_business_name_required_only_for_business() {
        let business = CustomerInfoForm {
            order_type: OrderType::Business,
            business_name: Some(" Tajeer Trading ".to_string()),
            ..valid_form()
        };
        let info = business.validate().unwrap();
        assert!(info.is_business_order());
        assert_eq!(info.business_name.as_deref(), Some("Tajeer Trading"));

        let individual = CustomerInfoForm {
            business_name: Some("Ignored LLC".to_string()),
            ..valid_form()
        };
        assert_eq!(individual.validate().unwrap().business_name, None);
    }

    #[test]
    fn test_invalid_phone() {
        let form = CustomerInfoForm {
            phone: "0112345678".to_string(),
            ..valid_form()
        };
        assert_eq!(
            form.validate().unwrap_err().get(Field::Phone).map(|e| e.message),
            Some(Message::PhoneInvalid)
        );
    }

    #[test]
    fn test_to_form_roundtrip() {
        let info = valid_form().validate().unwrap();
        assert_eq!(info.to_form().validate().unwrap(), info);
    }
}
