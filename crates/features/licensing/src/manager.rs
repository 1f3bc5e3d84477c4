//! # License Manager
//!
//! Owns the organization's [`OrganizationLicense`] and is the only place that mutates it.
//!
//! ## Workflow
//! 1. [`Licensing::activate`] decodes a key. A valid key replaces the record wholesale with a
//!    fresh one (`usedDocuments = 0`); any other verdict leaves state untouched.
//! 2. [`Licensing::consume_one_document`] checks the record and spends one unit of quota. The
//!    check and the increment happen under one lock, so concurrent signers sharing a handle
//!    can never exceed the quota.
//!
//! The store is written before the in-memory record is updated; a failed write leaves both
//! unchanged.

use crate::codec::{self, LicenseCheck};
use crate::error::LicenseError;
use crate::gate::{GateRefusal, SigningGate};
use crate::record::{LicenseSummary, OrganizationLicense};
use crate::store::{FileLicenseStore, LicenseStore};
use parking_lot::Mutex;
use penmark_kernel::clock::{Clock, SystemClock};
use penmark_kernel::domain::config::LicensingConfig;
use penmark_kernel::domain::features::FeatureSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Shared handle to the organization license.
#[penmark_derive::penmark_slice]
pub struct Licensing {
    state: Mutex<OrganizationLicense>,
    store: Arc<dyn LicenseStore>,
    clock: Arc<dyn Clock>,
    /// Labels copied into every new activation.
    features: Vec<String>,
}

/// Result of [`Licensing::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The key was valid and the new record is now current.
    Activated(OrganizationLicense),
    /// The key was not valid; nothing changed.
    Rejected(LicenseCheck),
}

impl ActivationOutcome {
    #[must_use]
    pub const fn is_activated(&self) -> bool {
        matches!(self, Self::Activated(_))
    }
}

/// Result of [`Licensing::consume_one_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    Consumed { used_documents: u64, remaining_documents: u64 },
    Refused(GateRefusal),
}

impl Licensing {
    /// Loads the stored record, falling back to an inactive one.
    ///
    /// `features` is what a future activation will unlock.
    ///
    /// # Errors
    /// Returns [`LicenseError::Io`] if the store cannot be read.
    pub fn open(
        store: Arc<dyn LicenseStore>,
        clock: Arc<dyn Clock>,
        features: FeatureSet,
    ) -> Result<Self, LicenseError> {
        let labels = features.labels().into_iter().map(str::to_owned).collect();
        Self::open_granting(store, clock, labels)
    }

    /// Like [`Licensing::open`], granting feature labels as given.
    ///
    /// Labels this build does not recognize are logged and still granted, so
    /// they reach the stored record unchanged.
    ///
    /// # Errors
    /// Returns [`LicenseError::Io`] if the store cannot be read.
    pub fn open_granting(
        store: Arc<dyn LicenseStore>,
        clock: Arc<dyn Clock>,
        features: Vec<String>,
    ) -> Result<Self, LicenseError> {
        for label in FeatureSet::unknown_labels(&features) {
            warn!(label, "Granting an unrecognized feature label");
        }

        let record = match store.load()? {
            Some(record) => {
                info!(
                    active = record.is_active,
                    used = record.used_documents,
                    total = record.total_documents,
                    "License record loaded"
                );
                record
            },
            None => OrganizationLicense::inactive(clock.now()),
        };

        Ok(Self::new(LicensingInner { state: Mutex::new(record), store, clock, features }))
    }

    /// File-backed manager on the system clock, as configured.
    ///
    /// # Errors
    /// Returns [`LicenseError::Io`] if the configured record exists but cannot be read.
    pub fn from_config(config: &LicensingConfig) -> Result<Self, LicenseError> {
        Self::open_granting(
            Arc::new(FileLicenseStore::new(&config.store_path)),
            Arc::new(SystemClock),
            config.features.clone(),
        )
    }

    /// Decodes a key against this manager's clock without touching state.
    #[must_use]
    pub fn check(&self, key: &str) -> LicenseCheck {
        codec::decode_at(key, self.clock.now())
    }

    /// Activates `key`, replacing the current record if the key is valid.
    ///
    /// # Errors
    /// Returns a storage error if the new record cannot be persisted; the previous record
    /// stays current in that case.
    #[instrument(level = "debug", skip_all)]
    pub fn activate(&self, key: &str) -> Result<ActivationOutcome, LicenseError> {
        let now = self.clock.now();
        let check = codec::decode_at(key, now);

        let Some(payload) = check.payload.as_ref().filter(|_| check.is_valid()) else {
            warn!(verdict = %check.verdict, "License key rejected");
            return Ok(ActivationOutcome::Rejected(check));
        };

        let record = OrganizationLicense::activated(key, payload, now, &self.features);

        let mut state = self.state.lock();
        self.store.save(&record)?;
        *state = record.clone();
        drop(state);

        info!(
            organization = %payload.organization_id,
            expiry = %payload.expiry,
            quota = payload.document_quota,
            "License activated"
        );
        Ok(ActivationOutcome::Activated(record))
    }

    /// Spends one document of quota if the license allows it.
    ///
    /// # Errors
    /// Returns a storage error if the incremented record cannot be persisted; the counter is
    /// not advanced in that case.
    pub fn consume_one_document(&self) -> Result<ConsumeOutcome, LicenseError> {
        let mut state = self.state.lock();

        if let Some(refusal) = state.refusal_at(self.clock.now()) {
            warn!(reason = refusal.as_ref(), "Document signing refused by license");
            return Ok(ConsumeOutcome::Refused(refusal));
        }

        let mut next = state.clone();
        next.used_documents += 1;
        self.store.save(&next)?;
        *state = next;

        let (used_documents, remaining_documents) =
            (state.used_documents, state.remaining_documents());
        drop(state);

        info!(used = used_documents, remaining = remaining_documents, "Document quota consumed");
        Ok(ConsumeOutcome::Consumed { used_documents, remaining_documents })
    }

    /// Snapshot of the current record.
    #[must_use]
    pub fn current(&self) -> OrganizationLicense {
        self.state.lock().clone()
    }

    #[must_use]
    pub fn summary(&self) -> LicenseSummary {
        let now = self.clock.now();
        self.state.lock().summary_at(now)
    }

    /// Recognized features granted to the next activation.
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        FeatureSet::from_labels(&self.features)
    }

    /// Every label granted to the next activation, recognized or not.
    #[must_use]
    pub fn feature_labels(&self) -> &[String] {
        &self.features
    }
}

impl SigningGate for Licensing {
    fn authorize(&self) -> Result<(), LicenseError> {
        match self.consume_one_document()? {
            ConsumeOutcome::Consumed { .. } => Ok(()),
            ConsumeOutcome::Refused(source) => {
                Err(LicenseError::Refused { source, context: Some("Authorizing signature".into()) })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLicenseStore;
    use chrono::{Duration, TimeZone, Utc};
    use penmark_kernel::clock::FixedClock;

    fn manager() -> (Licensing, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap()));
        let licensing =
            Licensing::open(Arc::new(MemoryLicenseStore::new()), clock.clone(), FeatureSet::ALL)
                .unwrap();
        (licensing, clock)
    }

    #[test]
    fn starts_inactive_without_a_stored_record() {
        let (licensing, _) = manager();
        assert!(!licensing.current().is_active);
        assert_eq!(
            licensing.consume_one_document().unwrap(),
            ConsumeOutcome::Refused(GateRefusal::NoActiveLicense)
        );
    }

    #[test]
    fn rejected_key_keeps_previous_record() {
        let (licensing, clock) = manager();
        let key = codec::encode("acme-corp", clock.now() + Duration::days(30), 5);
        assert!(licensing.activate(key.as_str()).unwrap().is_activated());
        let before = licensing.current();

        let outcome = licensing.activate("not a key at all").unwrap();
        assert!(!outcome.is_activated());
        assert_eq!(licensing.current(), before);
    }

    #[test]
    fn gate_refusal_maps_to_refused_error() {
        let (licensing, _) = manager();
        let err = licensing.authorize().unwrap_err();
        assert!(matches!(
            err,
            LicenseError::Refused { source: GateRefusal::NoActiveLicense, .. }
        ));
    }

    #[test]
    fn clones_share_state() {
        let (licensing, clock) = manager();
        let other = licensing.clone();
        let key = codec::encode("acme-corp", clock.now() + Duration::days(1), 3);
        licensing.activate(key.as_str()).unwrap();

        other.consume_one_document().unwrap();
        assert_eq!(licensing.current().used_documents, 1);
        assert_eq!(licensing.handle_count(), 2);
    }
}
