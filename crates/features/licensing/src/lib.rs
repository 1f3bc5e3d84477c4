//! # Licensing
//!
//! Organization licenses for document signing: a human-typable key that packs an
//! organization id, an expiry instant and a document quota, plus the record that tracks how
//! much of that quota has been spent.
//!
//! ## Architecture
//!
//! 1.  **Codec ([`codec`]):** encodes keys and classifies any input as `Valid`, `Expired` or
//!     `Malformed`. Pure and infallible.
//! 2.  **Record ([`record`]):** the persisted [`OrganizationLicense`] and its derived
//!     [`LicenseSummary`].
//! 3.  **Store ([`store`]):** where the record lives ([`MemoryLicenseStore`],
//!     [`FileLicenseStore`]).
//! 4.  **Manager ([`manager`]):** [`Licensing`], the handle that activates keys and spends
//!     quota. It implements [`SigningGate`], the seam the signing workflow depends on.
//! 5.  **Issuance (`generator`):** vendor-side key issuance. Gated behind the `issuance`
//!     feature.
//!
//! ## Wire Format
//!
//! Keys are the record `<organization_id>:<expiry unix millis>:<document quota>` encoded as
//! unpadded RFC 4648 **base32**, grouped in fives and upper-cased. Earlier key generations used
//! standard base64; upper-casing base64 changes the bytes it decodes to, so those keys could
//! not be typed case-insensitively. Switching the canonical alphabet is a deliberate format
//! change. Base64 keys issued before it still decode; nothing here produces them anymore.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use penmark_licensing::codec;
//!
//! let expiry = Utc.with_ymd_and_hms(2030, 12, 31, 23, 59, 59).unwrap();
//! let key = codec::encode("acme", expiry, 5);
//! let base32 = |c: char| c.is_ascii_uppercase() || ('2'..='7').contains(&c);
//! assert!(key.as_str().split('-').all(|group| group.chars().all(base32)));
//! ```
//!
//! ## Trust Model
//!
//! Keys are encoded, not signed. Anyone who knows the format can mint a key, and anyone who
//! can edit the stored record can reset the counter. Enforcement here is only as strong as the
//! boundary around the process that owns the record; an authoritative quota must be kept
//! behind a server the signing client cannot modify.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::{Duration, Utc};
//! use penmark_kernel::clock::SystemClock;
//! use penmark_kernel::domain::features::FeatureSet;
//! use penmark_licensing::{ActivationOutcome, ConsumeOutcome, Licensing, MemoryLicenseStore, codec};
//!
//! let licensing = Licensing::open(
//!     Arc::new(MemoryLicenseStore::new()),
//!     Arc::new(SystemClock),
//!     FeatureSet::ALL,
//! )
//! .unwrap();
//!
//! let key = codec::encode("acme-corp", Utc::now() + Duration::days(30), 2);
//! assert!(matches!(licensing.activate(key.as_str()).unwrap(), ActivationOutcome::Activated(_)));
//! assert!(matches!(licensing.consume_one_document().unwrap(), ConsumeOutcome::Consumed { .. }));
//! ```

pub mod codec;
mod error;
pub mod gate;
#[cfg(feature = "issuance")]
pub mod generator;
pub mod manager;
pub mod record;
pub mod store;

pub use crate::codec::{LicenseCheck, LicenseKey, LicensePayload, MalformedReason, Verdict};
pub use crate::error::{LicenseError, LicenseErrorExt};
pub use crate::gate::{GateRefusal, SigningGate};
pub use crate::manager::{ActivationOutcome, ConsumeOutcome, Licensing, LicensingInner};
pub use crate::record::{LicenseSummary, OrganizationLicense};
pub use crate::store::{FileLicenseStore, LicenseStore, MemoryLicenseStore};
