//! Business logic services for storefront.
//!
//! # Services
//!
//! - `pricing` - Product lookup and price quotes with backend fallback
//! - `staging` - Uploaded document bytes awaiting submission
//! - `submission` - Document upload and order creation
//! - `funnel` - Background funnel event recording

pub mod funnel;
pub mod pricing;
pub mod staging;
pub mod submission;

pub use funnel::FunnelService;
pub use pricing::PricingService;
pub use staging::{DocumentStaging, StagedDocuments, StagedFile};
pub use submission::{SubmissionError, SubmissionService};
