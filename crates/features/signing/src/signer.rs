//! # Signing Workflow
//!
//! [`Signer`] validates the upload, asks the injected [`SigningGate`] for permission (which
//! spends one document of quota), plans the signature boxes and hands them to the
//! [`PdfStamper`]. A refused gate ends the workflow before the stamper sees the document.

use crate::appearance::{SignatureOptions, SignaturePosition, plan_appearance};
use crate::error::{SigningError, SigningErrorExt};
use crate::stamper::{PdfStamper, ensure_pdf};
use penmark_kernel::clock::{Clock, SystemClock};
use penmark_kernel::domain::constants::DOCUMENT_ID_PREFIX;
use penmark_kernel::safe_nanoid;
use penmark_licensing::SigningGate;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A document to sign and where to put the signature.
#[derive(Debug, Clone)]
pub struct SignRequest {
    pub document: Vec<u8>,
    pub positions: Vec<SignaturePosition>,
    pub options: SignatureOptions,
}

impl SignRequest {
    /// One default-placed signature with default options.
    #[must_use]
    pub fn new(document: Vec<u8>) -> Self {
        Self {
            document,
            positions: vec![SignaturePosition::default()],
            options: SignatureOptions::default(),
        }
    }

    #[must_use]
    pub fn positions(mut self, positions: Vec<SignaturePosition>) -> Self {
        self.positions = positions;
        self
    }

    #[must_use]
    pub fn options(mut self, options: SignatureOptions) -> Self {
        self.options = options;
        self
    }
}

/// A stamped document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDocument {
    /// `DOC-` followed by an unambiguous random id.
    pub document_id: String,
    pub bytes: Vec<u8>,
    /// Number of boxes actually drawn; positions on missing pages are skipped.
    pub stamped_boxes: usize,
}

impl SignedDocument {
    /// Suggested file name for downloads.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("signed_document_{}.pdf", self.document_id)
    }
}

/// License-gated signing workflow.
#[derive(Debug)]
pub struct Signer<G, S> {
    gate: G,
    stamper: S,
    clock: Arc<dyn Clock>,
}

impl<G: SigningGate, S: PdfStamper> Signer<G, S> {
    pub fn new(gate: G, stamper: S) -> Self {
        Self { gate, stamper, clock: Arc::new(SystemClock) }
    }

    /// Replaces the clock used for the date printed in signature boxes.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub const fn gate(&self) -> &G {
        &self.gate
    }

    pub const fn stamper(&self) -> &S {
        &self.stamper
    }

    /// Signs `request.document`.
    ///
    /// # Errors
    /// * [`SigningError::EmptyDocument`] / [`SigningError::NotPdf`] for unusable input.
    /// * [`SigningError::InvalidRequest`] when no position is given.
    /// * [`SigningError::License`] when the gate refuses or cannot record the spend.
    /// * [`SigningError::Stamp`] when the PDF collaborator fails. The quota is already spent
    ///   at that point.
    #[instrument(level = "debug", skip_all, fields(size = request.document.len()))]
    pub fn sign(&self, request: &SignRequest) -> Result<SignedDocument, SigningError> {
        ensure_pdf(&request.document)?;

        if request.positions.is_empty() {
            return Err(SigningError::InvalidRequest {
                message: "at least one signature position is required".into(),
                context: None,
            });
        }

        self.gate
            .authorize()
            .inspect_err(|err| warn!(error = %err, "Signing blocked by license"))
            .context("Authorizing signature")?;

        let page_sizes =
            self.stamper.page_sizes(&request.document).context("Reading page geometry")?;
        let plan = plan_appearance(
            &page_sizes,
            &request.positions,
            &request.options,
            self.clock.now().date_naive(),
        );
        let bytes = self.stamper.stamp(&request.document, &plan).context("Stamping signature")?;

        let document = SignedDocument {
            document_id: format!("{DOCUMENT_ID_PREFIX}{}", safe_nanoid!()),
            bytes,
            stamped_boxes: plan.len(),
        };

        info!(
            document_id = %document.document_id,
            boxes = document.stamped_boxes,
            pages = page_sizes.len(),
            "Document signed"
        );
        Ok(document)
    }
}
