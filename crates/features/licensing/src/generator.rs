//! # Key Issuance
//!
//! Vendor-side helper that turns an order (organization, validity, quota) into a license key.
//! Gated behind the `issuance` feature so client builds only carry the decoder.

use crate::codec::{FIELD_SEPARATOR, LicenseKey, LicensePayload};
use crate::error::LicenseError;
use chrono::{DateTime, Duration};
use penmark_kernel::clock::Clock;
use tracing::info;

/// Longest validity accepted, roughly a century.
pub const MAX_DAYS: u32 = 36_525;

/// An order for a new license key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub organization_id: String,
    /// Validity in days, counted from the moment of issuance.
    pub days: u32,
    pub document_quota: u64,
}

/// A freshly issued key together with what it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedKey {
    pub key: LicenseKey,
    pub payload: LicensePayload,
}

impl IssueRequest {
    pub fn new(organization_id: impl Into<String>, days: u32, document_quota: u64) -> Self {
        Self { organization_id: organization_id.into(), days, document_quota }
    }

    fn validate(&self) -> Result<&str, LicenseError> {
        let organization = self.organization_id.trim();

        if organization.is_empty() {
            return Err(LicenseError::InvalidRequest {
                message: "organization id must not be empty".into(),
                context: None,
            });
        }
        if organization.contains(FIELD_SEPARATOR) {
            return Err(LicenseError::InvalidRequest {
                message: format!("organization id must not contain '{FIELD_SEPARATOR}'").into(),
                context: None,
            });
        }
        if organization.starts_with('.')
            || organization.contains(['/', '\\'])
            || organization.chars().any(char::is_control)
        {
            return Err(LicenseError::InvalidRequest {
                message: "organization id must be usable as a file name: no '/', '\\', \
                          control characters or leading '.'"
                    .into(),
                context: None,
            });
        }
        if self.days > MAX_DAYS {
            return Err(LicenseError::InvalidRequest {
                message: format!("validity of {} days exceeds {MAX_DAYS}", self.days).into(),
                context: None,
            });
        }

        Ok(organization)
    }
}

/// Issues a key that expires `request.days` after `clock.now()`.
///
/// # Errors
/// Returns [`LicenseError::InvalidRequest`] when the organization id is empty, contains the
/// field separator, cannot serve as a file name, or when the validity is out of range.
pub fn issue_key(request: &IssueRequest, clock: &dyn Clock) -> Result<IssuedKey, LicenseError> {
    let organization_id = request.validate()?;
    let expiry = clock.now() + Duration::days(i64::from(request.days));
    // Keys carry millisecond precision.
    let expiry = DateTime::from_timestamp_millis(expiry.timestamp_millis()).unwrap_or(expiry);

    let payload = LicensePayload::new(organization_id, expiry, request.document_quota);
    let key = payload.encode();

    info!(
        organization = organization_id,
        %expiry,
        quota = request.document_quota,
        "License key issued"
    );

    Ok(IssuedKey { key, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Verdict, decode_at};
    use chrono::{TimeZone, Utc};
    use penmark_kernel::clock::FixedClock;

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap())
    }

    #[test]
    fn issued_key_decodes_to_the_order() {
        let clock = clock();
        let issued = issue_key(&IssueRequest::new("  acme-corp ", 365, 500), &clock).unwrap();
        let check = decode_at(issued.key.as_str(), clock.now());

        assert_eq!(check.verdict, Verdict::Valid);
        assert_eq!(check.payload.as_ref(), Some(&issued.payload));
        assert_eq!(issued.payload.organization_id, "acme-corp");
        assert_eq!(issued.payload.expiry, Utc.with_ymd_and_hms(2027, 10, 18, 12, 0, 0).unwrap());
    }

    #[test]
    fn organization_with_separator_is_rejected() {
        let err = issue_key(&IssueRequest::new("acme:corp", 1, 1), &clock()).unwrap_err();
        assert!(matches!(err, LicenseError::InvalidRequest { .. }));
    }

    #[test]
    fn path_like_organizations_are_rejected() {
        for organization in ["../evil", "acme/corp", "acme\\corp", ".hidden", "ac\nme"] {
            let err = issue_key(&IssueRequest::new(organization, 1, 1), &clock()).unwrap_err();
            assert!(err.to_string().contains("usable as a file name"), "{organization:?}");
        }
        assert!(issue_key(&IssueRequest::new("Acme Corp. GmbH", 1, 1), &clock()).is_ok());
    }

    #[test]
    fn blank_organization_is_rejected() {
        let err = issue_key(&IssueRequest::new("   ", 1, 1), &clock()).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn absurd_validity_is_rejected() {
        assert!(issue_key(&IssueRequest::new("acme", MAX_DAYS + 1, 1), &clock()).is_err());
    }
}
