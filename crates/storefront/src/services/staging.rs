//! Uploaded document bytes waiting for order submission.
//!
//! The checkout session only carries document metadata; the files
//! themselves sit here, keyed by checkout, until step 4 uploads them to
//! storage. Entries expire after the configured TTL, after which the
//! shopper is sent back to step 3.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use moka::future::Cache;
use tajeer_core::CheckoutId;
use tajeer_core::checkout::{DocumentKind, DocumentUpload};

const MAX_STAGED_CHECKOUTS: u64 = 10_000;

/// One validated file and its bytes.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub upload: DocumentUpload,
    pub contents: Bytes,
}

/// Files staged for one checkout.
#[derive(Debug, Clone, Default)]
pub struct StagedDocuments {
    pub national_id: Option<StagedFile>,
    pub salary_certificate: Option<StagedFile>,
}

impl StagedDocuments {
    #[must_use]
    pub const fn get(&self, kind: DocumentKind) -> Option<&StagedFile> {
        match kind {
            DocumentKind::NationalId => self.national_id.as_ref(),
            DocumentKind::SalaryCertificate => self.salary_certificate.as_ref(),
        }
    }

    fn set(&mut self, file: StagedFile) {
        match file.upload.kind {
            DocumentKind::NationalId => self.national_id = Some(file),
            DocumentKind::SalaryCertificate => self.salary_certificate = Some(file),
        }
    }

    /// Both files are present and match the metadata the session holds.
    #[must_use]
    pub fn matches(&self, national_id: &DocumentUpload, salary_certificate: &DocumentUpload) -> bool {
        self.national_id.as_ref().is_some_and(|f| &f.upload == national_id)
            && self
                .salary_certificate
                .as_ref()
                .is_some_and(|f| &f.upload == salary_certificate)
    }
}

/// In-memory staging area with a time-to-live.
#[derive(Clone)]
pub struct DocumentStaging {
    cache: Cache<CheckoutId, Arc<StagedDocuments>>,
}

impl DocumentStaging {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_STAGED_CHECKOUTS)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Add or replace files for a checkout, keeping the other kind.
    pub async fn stage(&self, checkout_id: CheckoutId, files: Vec<StagedFile>) {
        let mut staged = self
            .cache
            .get(&checkout_id)
            .await
            .map(|existing| (*existing).clone())
            .unwrap_or_default();
        for file in files {
            staged.set(file);
        }
        self.cache.insert(checkout_id, Arc::new(staged)).await;
    }

    pub async fn get(&self, checkout_id: CheckoutId) -> Option<Arc<StagedDocuments>> {
        self.cache.get(&checkout_id).await
    }

    pub async fn discard(&self, checkout_id: CheckoutId) {
        self.cache.invalidate(&checkout_id).await;
    }
}
