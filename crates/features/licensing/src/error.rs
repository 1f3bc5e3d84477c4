use crate::gate::GateRefusal;
use std::borrow::Cow;

/// Error types specific to the licensing feature.
///
/// Key verdicts are not errors; these cover storage, serialization and gate refusals.
#[penmark_derive::penmark_error]
pub enum LicenseError {
    /// The license record could not be read or written.
    #[error("License storage error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The license record could not be (de)serialized.
    #[error("License record serialization error{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The license does not permit the requested operation.
    #[error("License refused{}: {source}", format_context(.context))]
    Refused { source: GateRefusal, context: Option<Cow<'static, str>> },

    /// An issuance request failed validation.
    #[error("Invalid license request{}: {message}", format_context(.context))]
    InvalidRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_convert_and_keep_the_user_message() {
        let err = LicenseError::from(GateRefusal::Expired);
        assert!(matches!(err, LicenseError::Refused { context: None, .. }));
        assert_eq!(
            err.to_string(),
            "License refused: Your license has expired. Please activate a new license."
        );
    }

    #[test]
    fn invalid_requests_render_their_message() {
        let err: Result<(), _> =
            Err(LicenseError::InvalidRequest { message: "quota is zero".into(), context: None });
        let err = err.context("Issuing key").unwrap_err();
        assert_eq!(err.to_string(), "Invalid license request (Issuing key): quota is zero");
    }
}
