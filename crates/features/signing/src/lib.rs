//! # Signing
//!
//! License-gated document signing. The workflow never decides on its own whether signing is
//! allowed: it receives a [`SigningGate`] (in production the `Licensing` handle) and a
//! [`PdfStamper`] wrapping the PDF library.
//!
//! Real certificate handling (PKCS#12, HSM) and CMS embedding live outside this crate; what is
//! produced here is the visible signature appearance.
//!
//! ## Example
//!
//! ```rust,ignore
//! use penmark_signing::{SignRequest, Signer};
//!
//! let signer = Signer::new(licensing.clone(), my_stamper);
//! let signed = signer.sign(&SignRequest::new(std::fs::read("contract.pdf")?))?;
//! std::fs::write(signed.file_name(), &signed.bytes)?;
//! ```

pub mod appearance;
mod error;
pub mod signer;
pub mod stamper;

pub use crate::appearance::{
    AppearanceBox, AppearancePlan, PageSize, SignatureOptions, SignaturePosition, SignatureSource,
    TextLine, plan_appearance,
};
pub use crate::error::{SigningError, SigningErrorExt};
pub use crate::signer::{SignRequest, SignedDocument, Signer};
pub use crate::stamper::{PDF_MAGIC, PdfStamper, ensure_pdf};
pub use penmark_licensing::{GateRefusal, SigningGate};
