//! The persisted organization license and the figures derived from it.

use crate::codec::LicensePayload;
use crate::gate::GateRefusal;
use chrono::{DateTime, Utc};
use penmark_kernel::domain::features::FeatureSet;
use serde::{Deserialize, Serialize};

/// The organization's current license and its usage counter.
///
/// Serialized as the camelCase JSON document kept under the license storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationLicense {
    /// The key as the user entered it, trimmed.
    pub license_key: String,
    pub issued_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub total_documents: u64,
    pub used_documents: u64,
    pub is_active: bool,
    /// Feature labels granted at activation, kept verbatim.
    #[serde(default)]
    pub features: Vec<String>,
}

impl OrganizationLicense {
    /// The record of an organization that never activated a key.
    #[must_use]
    pub fn inactive(now: DateTime<Utc>) -> Self {
        Self {
            license_key: String::new(),
            issued_date: now,
            expiry_date: now,
            total_documents: 0,
            used_documents: 0,
            is_active: false,
            features: Vec::new(),
        }
    }

    /// A fresh record for a key that decoded as valid.
    #[must_use]
    pub fn activated(
        license_key: &str,
        payload: &LicensePayload,
        now: DateTime<Utc>,
        features: &[String],
    ) -> Self {
        Self {
            license_key: license_key.trim().to_owned(),
            issued_date: now,
            expiry_date: payload.expiry,
            total_documents: payload.document_quota,
            used_documents: 0,
            is_active: true,
            features: features.to_vec(),
        }
    }

    /// The granted features this build can gate.
    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        FeatureSet::from_labels(&self.features)
    }

    #[must_use]
    pub const fn remaining_documents(&self) -> u64 {
        self.total_documents.saturating_sub(self.used_documents)
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }

    /// Why one more document could not be signed right now, if anything.
    #[must_use]
    pub fn refusal_at(&self, now: DateTime<Utc>) -> Option<GateRefusal> {
        if !self.is_active {
            Some(GateRefusal::NoActiveLicense)
        } else if self.is_expired_at(now) {
            Some(GateRefusal::Expired)
        } else if self.used_documents >= self.total_documents {
            Some(GateRefusal::QuotaExhausted)
        } else {
            None
        }
    }

    #[must_use]
    pub fn summary_at(&self, now: DateTime<Utc>) -> LicenseSummary {
        let total_days = (self.expiry_date - self.issued_date).num_days();
        let elapsed_days = (now - self.issued_date).num_days();

        LicenseSummary {
            organization_active: self.is_active,
            total_documents: self.total_documents,
            used_documents: self.used_documents,
            remaining_documents: self.remaining_documents(),
            usage_percent: capped_percent(
                i128::from(self.used_documents),
                i128::from(self.total_documents),
            ),
            remaining_days: (self.expiry_date - now).num_days(),
            time_percent: capped_percent(i128::from(elapsed_days), i128::from(total_days)),
            is_expired: self.is_expired_at(now),
            expiry_date: self.expiry_date,
        }
    }
}

/// Usage figures shown next to the license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    pub organization_active: bool,
    pub total_documents: u64,
    pub used_documents: u64,
    pub remaining_documents: u64,
    /// `round(used / total * 100)`, at most 100, zero without a quota.
    pub usage_percent: u8,
    /// Whole days until expiry, negative once expired.
    pub remaining_days: i64,
    /// Share of the validity period already elapsed, 0..=100.
    pub time_percent: u8,
    pub is_expired: bool,
    pub expiry_date: DateTime<Utc>,
}

/// Rounds half up and clamps into `0..=100`; a non-positive whole yields zero.
fn capped_percent(part: i128, whole: i128) -> u8 {
    if whole <= 0 || part <= 0 {
        return 0;
    }
    let rounded = (part * 200 + whole) / (whole * 2);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
