//! The boundary to the PDF library that actually reads and draws on documents.

use crate::appearance::{AppearancePlan, PageSize};
use crate::error::SigningError;

/// Magic bytes every PDF file starts with.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// Reads page geometry and draws planned signature boxes.
///
/// Implementations wrap a real PDF library. Errors should be reported as
/// [`SigningError::Stamp`].
pub trait PdfStamper: Send + Sync {
    /// Sizes of all pages, in document order.
    ///
    /// # Errors
    /// Returns [`SigningError::Stamp`] if the document cannot be parsed.
    fn page_sizes(&self, pdf: &[u8]) -> Result<Vec<PageSize>, SigningError>;

    /// Draws `plan` onto a copy of `pdf` and returns the new document.
    ///
    /// # Errors
    /// Returns [`SigningError::Stamp`] if drawing or saving fails.
    fn stamp(&self, pdf: &[u8], plan: &AppearancePlan) -> Result<Vec<u8>, SigningError>;
}

impl<S: PdfStamper + ?Sized> PdfStamper for std::sync::Arc<S> {
    fn page_sizes(&self, pdf: &[u8]) -> Result<Vec<PageSize>, SigningError> {
        (**self).page_sizes(pdf)
    }

    fn stamp(&self, pdf: &[u8], plan: &AppearancePlan) -> Result<Vec<u8>, SigningError> {
        (**self).stamp(pdf, plan)
    }
}

/// Rejects input that cannot be a PDF before anything else looks at it.
///
/// # Errors
/// [`SigningError::EmptyDocument`] for empty input, [`SigningError::NotPdf`] when the header
/// is missing.
pub fn ensure_pdf(bytes: &[u8]) -> Result<(), SigningError> {
    if bytes.is_empty() {
        return Err(SigningError::EmptyDocument { context: None });
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(SigningError::NotPdf { context: None });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_required() {
        assert!(matches!(ensure_pdf(b""), Err(SigningError::EmptyDocument { .. })));
        assert!(matches!(ensure_pdf(b"PK\x03\x04"), Err(SigningError::NotPdf { .. })));
        assert!(matches!(ensure_pdf(b"%PDF"), Err(SigningError::NotPdf { .. })));
        assert!(ensure_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").is_ok());
    }
}
