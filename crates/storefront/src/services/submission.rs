//! Step 4 order submission: store both documents, then create the order.

use std::sync::Arc;

use tajeer_core::Message;
use tajeer_core::checkout::{DocumentKind, DocumentPaths, NewOrder, OrderDraft, OrderReceipt};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::staging::StagedDocuments;
use crate::backend::{BackendError, DocumentStorage, OrderCreation};

/// Why an order could not be submitted. The checkout stays on step 4.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Staged bytes expired or no longer match the session.
    #[error("verification documents are no longer available")]
    DocumentsExpired,

    #[error("failed to upload {kind}: {source}")]
    Upload {
        kind: DocumentKind,
        #[source]
        source: BackendError,
    },

    #[error("failed to create order: {0}")]
    Order(#[source] BackendError),
}

impl SubmissionError {
    /// Message shown to the shopper.
    #[must_use]
    pub const fn message(&self) -> Message {
        match self {
            Self::DocumentsExpired => Message::DocumentsExpired,
            Self::Upload { .. } => Message::DocumentUploadFailed,
            Self::Order(_) => Message::OrderSubmissionFailed,
        }
    }
}

/// Uploads verification documents and creates orders.
#[derive(Clone)]
pub struct SubmissionService {
    documents: Arc<dyn DocumentStorage>,
    orders: Arc<dyn OrderCreation>,
}

impl SubmissionService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStorage>, orders: Arc<dyn OrderCreation>) -> Self {
        Self { documents, orders }
    }

    /// Submit a draft.
    ///
    /// The national ID is uploaded first, then the salary certificate, and
    /// only when both are stored is the order created. Nothing is rolled
    /// back on failure: an earlier upload stays in storage and is
    /// overwritten by the next attempt.
    ///
    /// # Errors
    ///
    /// See [`SubmissionError`].
    #[instrument(skip_all, fields(checkout_id = %draft.checkout_id))]
    pub async fn submit(
        &self,
        draft: &OrderDraft,
        staged: &StagedDocuments,
    ) -> Result<OrderReceipt, SubmissionError> {
        if !staged.matches(&draft.documents.national_id, &draft.documents.salary_certificate) {
            return Err(SubmissionError::DocumentsExpired);
        }

        let national_id = self.upload(draft, staged, DocumentKind::NationalId).await?;
        let salary_certificate = match self
            .upload(draft, staged, DocumentKind::SalaryCertificate)
            .await
        {
            Ok(path) => path,
            Err(e) => {
                warn!(orphaned = %national_id, "Second upload failed, first document left in storage");
                return Err(e);
            }
        };

        let order = NewOrder {
            draft: draft.clone(),
            document_paths: DocumentPaths {
                national_id,
                salary_certificate,
            },
        };

        let receipt = self
            .orders
            .create_order(&order)
            .await
            .map_err(SubmissionError::Order)?;

        info!(order_id = %receipt.order_id, "Order created");
        Ok(receipt)
    }

    async fn upload(
        &self,
        draft: &OrderDraft,
        staged: &StagedDocuments,
        kind: DocumentKind,
    ) -> Result<String, SubmissionError> {
        let file = staged.get(kind).ok_or(SubmissionError::DocumentsExpired)?;
        self.documents
            .upload_document(
                &draft.document_path(kind),
                file.upload.format.content_type(),
                file.contents.clone(),
            )
            .await
            .map_err(|source| SubmissionError::Upload { kind, source })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, order_draft, staged_documents};

    fn service(backend: &Arc<FakeBackend>) -> SubmissionService {
        SubmissionService::new(backend.clone(), backend.clone())
    }

    #[tokio::test]
    async fn test_uploads_then_creates_order() {
        let backend = Arc::new(FakeBackend::default());
        let draft = order_draft();

        let receipt = service(&backend)
            .submit(&draft, &staged_documents())
            .await
            .unwrap();

        let uploads = backend.uploaded_paths();
        assert_eq!(
            uploads,
            vec![
                format!("{}/national_id.pdf", draft.checkout_id),
                format!("{}/salary_certificate.jpg", draft.checkout_id),
            ]
        );

        let orders = backend.created_orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].document_paths.national_id, uploads[0]);
        assert_eq!(receipt, backend.last_receipt().unwrap());
    }

    #[tokio::test]
    async fn test_failing_second_upload_creates_no_order() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_uploads_for(DocumentKind::SalaryCertificate);

        let err = service(&backend)
            .submit(&order_draft(), &staged_documents())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubmissionError::Upload {
                kind: DocumentKind::SalaryCertificate,
                ..
            }
        ));
        assert_eq!(err.message(), Message::DocumentUploadFailed);
        assert_eq!(backend.uploaded_paths().len(), 1);
        assert!(backend.created_orders().is_empty());
    }

    #[tokio::test]
    async fn test_order_failure_is_reported() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_orders();

        let err = service(&backend)
            .submit(&order_draft(), &staged_documents())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Order(_)));
        assert_eq!(backend.uploaded_paths().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_staged_files() {
        let backend = Arc::new(FakeBackend::default());
        let err = service(&backend)
            .submit(&order_draft(), &StagedDocuments::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::DocumentsExpired));
        assert!(backend.uploaded_paths().is_empty());
    }
}
