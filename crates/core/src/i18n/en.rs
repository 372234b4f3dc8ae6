//! English strings.

use super::Message;

pub(super) const fn text(message: Message) -> &'static str {
    match message {
        Message::StepCustomerInfo => "Your details",
        Message::StepProtectionPlan => "Device protection",
        Message::StepVerificationDocuments => "Verification documents",
        Message::StepReview => "Review & submit",

        Message::TermMonthly => "Monthly",
        Message::TermTwelveMonths => "12 months",
        Message::TermTwentyFourMonths => "24 months",
        Message::TermThirtySixMonths => "36 months",
        Message::TermMonthlyDescription => "No commitment, cancel any month",
        Message::TermTwelveMonthsDescription => "One-year lease at the standard rate",
        Message::TermTwentyFourMonthsDescription => "Two-year lease, save 25% every month",
        Message::TermThirtySixMonthsDescription => "Three-year lease, our lowest monthly price",

        Message::ConditionNew => "New",
        Message::ConditionRefurbished => "Certified refurbished",

        Message::BadgePercentOff => "{0}% off",
        Message::BadgeRefurbished => "Refurbished: save {0}%",
        Message::PerMonth => "/month",
        Message::ProtectionPlanName => "Device protection plan",
        Message::ProtectionPlanDescription => {
            "Covers accidental damage for {0} per month"
        }

        Message::NameTooShort => "Please enter your full name (at least 2 characters)",
        Message::EmailRequired => "Please enter your email address",
        Message::EmailInvalid => "Please enter a valid email address",
        Message::PhoneRequired => "Please enter your mobile number",
        Message::PhoneInvalid => "Please enter a valid Saudi mobile number (05XXXXXXXX)",
        Message::BusinessNameRequired => "Please enter your business name",

        Message::ProtectionChoiceRequired => "Please choose whether to add device protection",

        Message::DocumentRequired => "Please upload this document",
        Message::DocumentTooLarge => "File must be {0} MB or smaller",
        Message::DocumentUnsupportedType => "Only PDF, JPG and PNG files are accepted",
        Message::DocumentEmpty => "The uploaded file is empty",

        Message::DocumentUploadFailed => "We couldn't upload your documents. Please try again.",
        Message::OrderSubmissionFailed => "We couldn't place your order. Please try again.",
        Message::DocumentsExpired => "Your uploaded documents expired. Please upload them again.",
        Message::OrderConfirmed => "Thank you! Your order {0} has been received.",

        Message::WrongStep => "Please complete the current step first",
        Message::CheckoutNotStarted => "Your checkout session has ended. Please start again.",
        Message::ConfigurationIncomplete => "Please choose storage, color and lease term",

        Message::ProductNotFound => "This device is no longer available",
        Message::InvalidRequest => "Something was wrong with that request. Please try again.",
        Message::ServiceUnavailable => "We're having trouble connecting. Please try again shortly.",
        Message::UnexpectedError => "Something went wrong on our side. Please try again.",
    }
}
