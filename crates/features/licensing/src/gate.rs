//! The seam between licensing and anything that spends the document quota.

use serde::Serialize;
use strum_macros::AsRefStr;

/// Reason a gated operation was not allowed.
///
/// The messages are shown to end users verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, thiserror::Error)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GateRefusal {
    #[error("No active license. Please activate a license to sign documents.")]
    NoActiveLicense,
    #[error("Your license has expired. Please activate a new license.")]
    Expired,
    #[error("You have reached the maximum number of documents allowed by your license.")]
    QuotaExhausted,
}

/// Decides whether one more document may be signed and records the spend.
///
/// A successful call consumes one unit of quota. Implementations must make the check and the
/// spend atomic with respect to concurrent callers.
pub trait SigningGate: Send + Sync {
    /// # Errors
    /// [`crate::LicenseError::Refused`] carries the [`GateRefusal`] when the license does not
    /// allow signing. Any other variant means the spend could not be recorded.
    fn authorize(&self) -> Result<(), crate::LicenseError>;
}

impl<G: SigningGate + ?Sized> SigningGate for std::sync::Arc<G> {
    fn authorize(&self) -> Result<(), crate::LicenseError> {
        (**self).authorize()
    }
}

impl<G: SigningGate + ?Sized> SigningGate for &G {
    fn authorize(&self) -> Result<(), crate::LicenseError> {
        (**self).authorize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_messages_are_user_facing() {
        assert_eq!(
            GateRefusal::QuotaExhausted.to_string(),
            "You have reached the maximum number of documents allowed by your license."
        );
        assert_eq!(GateRefusal::NoActiveLicense.as_ref(), "no_active_license");
    }
}
