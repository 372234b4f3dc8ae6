//! The checkout step controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customer::{CustomerInfo, CustomerInfoForm};
use super::documents::{DocumentKind, DocumentUpload, VerificationDocuments};
use super::error::{Field, FieldError, FieldErrors, StepError};
use super::order::{OrderDraft, OrderReceipt};
use super::step::CheckoutStep;
use crate::catalog::CheckoutConfig;
use crate::i18n::{Locale, Message};
use crate::pricing::OrderPricing;
use crate::types::{CheckoutId, Price};

/// State of one shopper's checkout.
///
/// Every operation either succeeds and returns the step the shopper is now
/// on, or fails with a [`StepError`] and leaves the session untouched.
/// The whole value is serialized into the server-side session after each
/// transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    id: CheckoutId,
    locale: Locale,
    step: CheckoutStep,
    config: CheckoutConfig,
    customer: Option<CustomerInfo>,
    add_protection: Option<bool>,
    documents: Option<VerificationDocuments>,
    receipt: Option<OrderReceipt>,
    started_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CheckoutSession {
    /// Begin checkout for a frozen configuration.
    #[must_use]
    pub fn start(config: CheckoutConfig, locale: Locale) -> Self {
        Self::with_id(CheckoutId::new_random(), config, locale, Utc::now())
    }

    #[must_use]
    pub const fn with_id(
        id: CheckoutId,
        config: CheckoutConfig,
        locale: Locale,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            locale,
            step: CheckoutStep::FIRST,
            config,
            customer: None,
            add_protection: None,
            documents: None,
            receipt: None,
            started_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CheckoutId {
        self.id
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    pub const fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    #[must_use]
    pub const fn customer(&self) -> Option<&CustomerInfo> {
        self.customer.as_ref()
    }

    #[must_use]
    pub const fn add_protection(&self) -> Option<bool> {
        self.add_protection
    }

    #[must_use]
    pub const fn documents(&self) -> Option<&VerificationDocuments> {
        self.documents.as_ref()
    }

    #[must_use]
    pub const fn receipt(&self) -> Option<&OrderReceipt> {
        self.receipt.as_ref()
    }

    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.receipt.is_some()
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Current totals, counting protection only once it has been chosen.
    #[must_use]
    pub fn pricing(&self) -> OrderPricing {
        OrderPricing::for_checkout(&self.config, self.add_protection.unwrap_or(false))
    }

    /// Step 1: validate and store customer details, then move to step 2.
    ///
    /// # Errors
    ///
    /// [`StepError::Invalid`] with every failing field, or a navigation error.
    pub fn submit_customer_info(
        &mut self,
        form: &CustomerInfoForm,
    ) -> Result<CheckoutStep, StepError> {
        self.expect_step(CheckoutStep::CustomerInfo)?;
        let customer = form.validate()?;
        self.customer = Some(customer);
        Ok(self.move_forward())
    }

    /// Step 2: record the protection choice, then move to step 3.
    ///
    /// `None` means the shopper picked neither option.
    ///
    /// # Errors
    ///
    /// [`StepError::Invalid`] when no choice was made, or a navigation error.
    pub fn choose_protection(&mut self, choice: Option<bool>) -> Result<CheckoutStep, StepError> {
        self.expect_step(CheckoutStep::ProtectionPlan)?;
        let choice = choice.ok_or_else(protection_required)?;
        self.add_protection = Some(choice);
        Ok(self.move_forward())
    }

    /// Step 3: record both validated documents, then move to step 4.
    ///
    /// A missing upload falls back to the document captured earlier, so a
    /// shopper returning to this step only has to replace what changed.
    ///
    /// # Errors
    ///
    /// [`StepError::Invalid`] naming each document still missing, or a
    /// navigation error.
    pub fn attach_documents(
        &mut self,
        national_id: Option<DocumentUpload>,
        salary_certificate: Option<DocumentUpload>,
    ) -> Result<CheckoutStep, StepError> {
        self.expect_step(CheckoutStep::VerificationDocuments)?;

        let previous = self.documents.as_ref();
        let national_id = national_id.or_else(|| previous.map(|d| d.national_id.clone()));
        let salary_certificate =
            salary_certificate.or_else(|| previous.map(|d| d.salary_certificate.clone()));

        match (national_id, salary_certificate) {
            (Some(national_id), Some(salary_certificate)) => {
                self.documents = Some(VerificationDocuments {
                    national_id,
                    salary_certificate,
                });
            }
            (national_id, salary_certificate) => {
                let missing = [
                    (DocumentKind::NationalId, national_id.is_none()),
                    (DocumentKind::SalaryCertificate, salary_certificate.is_none()),
                ];
                return Err(StepError::Invalid(
                    missing
                        .into_iter()
                        .filter(|(_, is_missing)| *is_missing)
                        .map(|(kind, _)| FieldError::new(kind.field(), Message::DocumentRequired))
                        .collect(),
                ));
            }
        }
        Ok(self.move_forward())
    }

    /// Move forward using data captured on an earlier visit to this step.
    ///
    /// # Errors
    ///
    /// [`StepError::Incomplete`] or [`StepError::Invalid`] when the current
    /// step has nothing valid captured, [`StepError::AtLastStep`] on step 4.
    pub fn advance(&mut self) -> Result<CheckoutStep, StepError> {
        self.ensure_open()?;
        match self.step {
            CheckoutStep::CustomerInfo => {
                // Re-validate in case rules tightened since capture.
                let form = self
                    .customer
                    .as_ref()
                    .map(CustomerInfo::to_form)
                    .ok_or(StepError::Incomplete(CheckoutStep::CustomerInfo))?;
                self.submit_customer_info(&form)
            }
            CheckoutStep::ProtectionPlan => self.choose_protection(self.add_protection),
            CheckoutStep::VerificationDocuments => {
                if self.documents.is_none() {
                    return Err(StepError::Incomplete(CheckoutStep::VerificationDocuments));
                }
                self.attach_documents(None, None)
            }
            CheckoutStep::Review => Err(StepError::AtLastStep),
        }
    }

    /// Go back one step, keeping everything captured so far.
    ///
    /// # Errors
    ///
    /// [`StepError::AtFirstStep`] on step 1.
    pub fn back(&mut self) -> Result<CheckoutStep, StepError> {
        self.ensure_open()?;
        let previous = self.step.previous().ok_or(StepError::AtFirstStep)?;
        Ok(self.move_to(previous))
    }

    /// Replace the snapshot price, e.g. after an authoritative price arrives.
    ///
    /// # Errors
    ///
    /// [`StepError::AlreadySubmitted`] once the order exists.
    pub fn refresh_price(&mut self, price: Price) -> Result<(), StepError> {
        self.ensure_open()?;
        self.config.price = price;
        self.touch();
        Ok(())
    }

    /// Staged document bytes are gone: drop the metadata and return to step 3.
    ///
    /// # Errors
    ///
    /// [`StepError::AlreadySubmitted`] once the order exists.
    pub fn documents_expired(&mut self) -> Result<CheckoutStep, StepError> {
        self.ensure_open()?;
        self.documents = None;
        let step = self.step.min(CheckoutStep::VerificationDocuments);
        Ok(self.move_to(step))
    }

    /// Assemble the order from the captured data.
    ///
    /// # Errors
    ///
    /// [`StepError::WrongStep`] before step 4, [`StepError::Incomplete`] for
    /// the first step whose data is missing.
    pub fn order_draft(&self) -> Result<OrderDraft, StepError> {
        self.expect_step(CheckoutStep::Review)?;

        let customer = self
            .customer
            .clone()
            .ok_or(StepError::Incomplete(CheckoutStep::CustomerInfo))?;
        let add_protection = self
            .add_protection
            .ok_or(StepError::Incomplete(CheckoutStep::ProtectionPlan))?;
        let documents = self
            .documents
            .clone()
            .ok_or(StepError::Incomplete(CheckoutStep::VerificationDocuments))?;

        Ok(OrderDraft {
            checkout_id: self.id,
            locale: self.locale,
            customer,
            configuration: self.config.clone(),
            add_protection,
            pricing: OrderPricing::for_checkout(&self.config, add_protection),
            documents,
        })
    }

    /// Record the created order. The session is terminal afterwards and keeps
    /// only the receipt and the priced configuration; customer details and
    /// document metadata are dropped.
    ///
    /// # Errors
    ///
    /// [`StepError::WrongStep`] before step 4.
    pub fn mark_submitted(&mut self, receipt: OrderReceipt) -> Result<(), StepError> {
        self.expect_step(CheckoutStep::Review)?;
        self.customer = None;
        self.documents = None;
        self.receipt = Some(receipt);
        self.touch();
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), StepError> {
        if self.is_submitted() {
            Err(StepError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }

    fn expect_step(&self, expected: CheckoutStep) -> Result<(), StepError> {
        self.ensure_open()?;
        if self.step == expected {
            Ok(())
        } else {
            Err(StepError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// Only called after the current step's data was accepted, never on step 4.
    fn move_forward(&mut self) -> CheckoutStep {
        let next = self.step.next().unwrap_or(self.step);
        self.move_to(next)
    }

    fn move_to(&mut self, step: CheckoutStep) -> CheckoutStep {
        self.step = step;
        self.touch();
        step
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn protection_required() -> StepError {
    StepError::Invalid(FieldErrors::from(FieldError::new(
        Field::AddProtection,
        Message::ProtectionChoiceRequired,
    )))
}
