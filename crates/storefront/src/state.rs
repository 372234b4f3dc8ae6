//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError, Backends};
use crate::config::StorefrontConfig;
use crate::services::{DocumentStaging, FunnelService, PricingService, SubmissionService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pricing: PricingService,
    submission: SubmissionService,
    funnel: FunnelService,
    staging: DocumentStaging,
}

impl AppState {
    /// Create application state backed by the configured backend service.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, BackendError> {
        let client = Arc::new(BackendClient::new(&config.backend)?);
        Ok(Self::with_backends(config, Backends::uniform(client)))
    }

    /// Create application state over explicit backend implementations.
    #[must_use]
    pub fn with_backends(config: StorefrontConfig, backends: Backends) -> Self {
        let staging = DocumentStaging::new(config.document_staging_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                pricing: PricingService::new(backends.catalog, backends.pricing),
                submission: SubmissionService::new(backends.documents, backends.orders),
                funnel: FunnelService::new(backends.funnel),
                staging,
                config,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pricing(&self) -> &PricingService {
        &self.inner.pricing
    }

    #[must_use]
    pub fn submission(&self) -> &SubmissionService {
        &self.inner.submission
    }

    #[must_use]
    pub fn funnel(&self) -> &FunnelService {
        &self.inner.funnel
    }

    /// Uploaded document bytes awaiting submission.
    #[must_use]
    pub fn staging(&self) -> &DocumentStaging {
        &self.inner.staging
    }
}
