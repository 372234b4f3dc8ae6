//! Step 3: identity verification documents.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::{Field, FieldError};
use crate::i18n::Message;
use crate::types::CheckoutId;

/// Largest accepted upload, in megabytes.
pub const MAX_DOCUMENT_MEGABYTES: u64 = 5;

/// Largest accepted upload, in bytes.
pub const MAX_DOCUMENT_BYTES: u64 = MAX_DOCUMENT_MEGABYTES * 1024 * 1024;

/// The two documents every lease requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    NationalId,
    SalaryCertificate,
}

impl DocumentKind {
    pub const ALL: [Self; 2] = [Self::NationalId, Self::SalaryCertificate];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NationalId => "national_id",
            Self::SalaryCertificate => "salary_certificate",
        }
    }

    /// Form field the document is uploaded through.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::NationalId => Field::NationalId,
            Self::SalaryCertificate => Field::SalaryCertificate,
        }
    }

    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Detect the format from the leading bytes of a file.
    #[must_use]
    pub fn sniff(contents: &[u8]) -> Option<Self> {
        if contents.starts_with(b"%PDF-") {
            Some(Self::Pdf)
        } else if contents.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if contents.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else {
            None
        }
    }
}

/// Why an upload was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("{kind} is empty")]
    Empty { kind: DocumentKind },

    #[error("{kind} is {size} bytes, limit is {max}")]
    TooLarge {
        kind: DocumentKind,
        size: u64,
        max: u64,
    },

    #[error("{kind} must be a PDF, JPG or PNG file")]
    UnsupportedType { kind: DocumentKind },
}

impl DocumentError {
    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        match self {
            Self::Empty { kind } | Self::TooLarge { kind, .. } | Self::UnsupportedType { kind } => {
                *kind
            }
        }
    }

    /// Field error shown next to the upload control.
    #[must_use]
    pub fn field_error(&self) -> FieldError {
        let field = self.kind().field();
        match self {
            Self::Empty { .. } => FieldError::new(field, Message::DocumentEmpty),
            Self::TooLarge { .. } => FieldError::with_args(
                field,
                Message::DocumentTooLarge,
                vec![MAX_DOCUMENT_MEGABYTES.to_string()],
            ),
            Self::UnsupportedType { .. } => {
                FieldError::new(field, Message::DocumentUnsupportedType)
            }
        }
    }
}

/// Metadata of a validated upload. The bytes themselves are staged elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub file_name: String,
    pub format: DocumentFormat,
    pub size_bytes: u64,
}

impl DocumentUpload {
    /// Validate an uploaded file.
    ///
    /// Checks run in order: empty, size, then format. The declared format
    /// comes from the content type, or the file extension when the content
    /// type is missing or generic, and must match the file signature.
    ///
    /// # Errors
    ///
    /// Returns the first check that fails.
    pub fn validate(
        kind: DocumentKind,
        file_name: &str,
        content_type: Option<&str>,
        contents: &[u8],
    ) -> Result<Self, DocumentError> {
        let size = contents.len() as u64;
        if size == 0 {
            return Err(DocumentError::Empty { kind });
        }
        if size > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::TooLarge {
                kind,
                size,
                max: MAX_DOCUMENT_BYTES,
            });
        }

        let declared = content_type
            .and_then(DocumentFormat::from_content_type)
            .or_else(|| DocumentFormat::from_file_name(file_name));
        let format = match (declared, DocumentFormat::sniff(contents)) {
            (Some(declared), Some(actual)) if declared == actual => declared,
            _ => return Err(DocumentError::UnsupportedType { kind }),
        };

        Ok(Self {
            kind,
            file_name: file_name.to_string(),
            format,
            size_bytes: size,
        })
    }

    /// Object path in the documents bucket: `{checkout_id}/{kind}.{ext}`.
    #[must_use]
    pub fn storage_path(&self, checkout_id: CheckoutId) -> String {
        format!(
            "{checkout_id}/{}.{}",
            self.kind.as_str(),
            self.format.extension()
        )
    }
}

/// Both documents, once validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationDocuments {
    pub national_id: DocumentUpload,
    pub salary_certificate: DocumentUpload,
}

impl VerificationDocuments {
    #[must_use]
    pub const fn get(&self, kind: DocumentKind) -> &DocumentUpload {
        match kind {
            DocumentKind::NationalId => &self.national_id,
            DocumentKind::SalaryCertificate => &self.salary_certificate,
        }
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uuid::Uuid;

    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_accepts_supported_formats() {
        let pdf =
            DocumentUpload::validate(DocumentKind::NationalId, "id.pdf", Some("application/pdf"), PDF)
                .unwrap();
        assert_eq!(pdf.format, DocumentFormat::Pdf);
        assert_eq!(pdf.size_bytes, PDF.len() as u64);

        let png = DocumentUpload::validate(DocumentKind::NationalId, "scan.PNG", None, PNG).unwrap();
        assert_eq!(png.format, DocumentFormat::Png);

        let jpeg = DocumentUpload::validate(
            DocumentKind::SalaryCertificate,
            "letter.jpeg",
            Some("application/octet-stream"),
            JPEG,
        )
        .unwrap();
        assert_eq!(jpeg.format, DocumentFormat::Jpeg);
    }

    #[test]
    fn test_rejects_six_megabyte_pdf() {
        let contents = pdf_of_size(6 * 1024 * 1024);
        let err = DocumentUpload::validate(
            DocumentKind::NationalId,
            "id.pdf",
            Some("application/pdf"),
            &contents,
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::TooLarge { size, .. } if size == 6 * 1024 * 1024));
        assert_eq!(err.field_error().message, Message::DocumentTooLarge);
        assert_eq!(err.field_error().field, Field::NationalId);
    }

    #[test]
    fn test_limit_is_inclusive() {
        let contents = pdf_of_size(usize::try_from(MAX_DOCUMENT_BYTES).unwrap());
        assert!(
            DocumentUpload::validate(DocumentKind::NationalId, "id.pdf", None, &contents).is_ok()
        );
    }

    #[test]
    fn test_rejects_unsupported_or_mismatched() {
        let gif = b"GIF89a....";
        assert_eq!(
            DocumentUpload::validate(DocumentKind::NationalId, "id.gif", Some("image/gif"), gif),
            Err(DocumentError::UnsupportedType {
                kind: DocumentKind::NationalId
            })
        );

        // Renamed executable
        assert!(matches!(
            DocumentUpload::validate(DocumentKind::NationalId, "id.pdf", None, b"MZ\x90\x00"),
            Err(DocumentError::UnsupportedType { .. })
        ));

        // PNG bytes declared as PDF
        assert!(matches!(
            DocumentUpload::validate(DocumentKind::NationalId, "id.pdf", None, PNG),
            Err(DocumentError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            DocumentUpload::validate(DocumentKind::SalaryCertificate, "a.pdf", None, &[]),
            Err(DocumentError::Empty {
                kind: DocumentKind::SalaryCertificate
            })
        );
    }

    #[test]
    fn test_storage_path() {
        let upload =
            DocumentUpload::validate(DocumentKind::SalaryCertificate, "Salary.JPEG", None, JPEG)
                .unwrap();
        let checkout_id = CheckoutId::from_uuid(Uuid::from_u128(7));
        assert_eq!(
            upload.storage_path(checkout_id),
            "00000000-0000-0000-0000-000000000007/salary_certificate.jpg"
        );
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        assert_eq!(
            DocumentFormat::from_content_type("Application/PDF; charset=binary"),
            Some(DocumentFormat::Pdf)
        );
    }
}
