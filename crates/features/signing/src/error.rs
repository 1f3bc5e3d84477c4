use penmark_licensing::LicenseError;
use std::borrow::Cow;

/// Error types specific to the signing feature.
#[penmark_derive::penmark_error]
pub enum SigningError {
    /// The uploaded document has no content.
    #[error("Document is empty{}", format_context(.context))]
    EmptyDocument { context: Option<Cow<'static, str>> },

    /// The uploaded document does not start with the PDF header.
    #[error("Document is not a PDF{}", format_context(.context))]
    NotPdf { context: Option<Cow<'static, str>> },

    /// The request cannot be fulfilled as given.
    #[error("Invalid signing request{}: {message}", format_context(.context))]
    InvalidRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The license refused the signature or its spend could not be recorded.
    #[error("License check failed{}: {source}", format_context(.context))]
    License { source: LicenseError, context: Option<Cow<'static, str>> },

    /// The PDF collaborator failed to read or stamp the document.
    #[error("PDF stamping failed{}: {message}", format_context(.context))]
    Stamp { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl SigningError {
    /// The license refusal behind this error, if that is what it is.
    #[must_use]
    pub const fn refusal(&self) -> Option<penmark_licensing::GateRefusal> {
        match self {
            Self::License { source: LicenseError::Refused { source, .. }, .. } => Some(*source),
            _ => None,
        }
    }
}
