//! # License Key Codec
//!
//! Converts a [`LicensePayload`] into the dash-grouped key customers type in, and back.
//!
//! ## Key Format
//!
//! ```text
//! <organization_id>:<expiry unix millis>:<document quota>      plaintext record
//! MFRW2-ZJNMN-XXE4B-2GE4D-SMZUG-U3DAM-BQGAY-DAORV-GAYA        presented key
//! ```
//!
//! The record is encoded with the RFC 4648 base32 alphabet (`A-Z`, `2-7`), grouped in runs of
//! five and upper-cased. Base32 is single-case, so upper-casing the key and letting users type
//! it in any case loses nothing.
//!
//! This is a deliberate change from the base64 keys of earlier releases, which did not survive
//! upper-casing. Older keys are still accepted: when the canonical alphabet does not yield a
//! well-formed record, decoding retries with base64 as typed and then with base64 of the
//! lower-cased input.
//!
//! ## Decoding Outcome
//!
//! Decoding never fails with an error. Every input ends in one [`Verdict`]:
//!
//! 1. `Malformed` when the key is too short, undecodable, or the record is not
//!    `text:integer:integer`.
//! 2. `Expired` when the record is well-formed but its expiry lies before "now". The payload is
//!    still returned for diagnostics.
//! 3. `Valid` otherwise.
//!
//! There is no fallback to a demo license for malformed input.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};
use tracing::debug;

/// Separator between the three plaintext fields.
pub const FIELD_SEPARATOR: char = ':';

/// Characters per dash-separated group.
pub const GROUP_LEN: usize = 5;

/// Normalized keys shorter than this are rejected without decoding.
pub const MIN_KEY_LEN: usize = 10;

/// Lenient base64 matching what browsers accept in `atob`: padding optional, loose trailing bits.
const LEGACY_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// The logical content of a license key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicensePayload {
    /// Licensed customer. Never empty and never contains `:`.
    pub organization_id: String,
    /// Instant after which the license stops working, millisecond precision.
    pub expiry: DateTime<Utc>,
    /// Maximum number of documents that may be signed.
    pub document_quota: u64,
}

impl LicensePayload {
    pub fn new(organization_id: impl Into<String>, expiry: DateTime<Utc>, document_quota: u64) -> Self {
        Self { organization_id: organization_id.into(), expiry, document_quota }
    }

    /// Encodes this payload into a presentable key.
    #[must_use]
    pub fn encode(&self) -> LicenseKey {
        encode(&self.organization_id, self.expiry, self.document_quota)
    }
}

/// A formatted license key, e.g. `MFRW2-ZJNMN-...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseKey(String);

impl LicenseKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for LicenseKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a key was classified as malformed.
///
/// Variants are ordered by how far decoding progressed, so the most informative reason wins
/// when several decoding attempts fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MalformedReason {
    TooShort,
    Undecodable,
    FieldCount,
    EmptyField,
    InvalidTimestamp,
    InvalidQuota,
}

/// Classification of a decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Valid,
    Expired,
    #[strum(to_string = "MALFORMED")]
    Malformed(MalformedReason),
}

/// Result of decoding and validating a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseCheck {
    pub verdict: Verdict,
    /// Present for `Valid` and `Expired`, absent for `Malformed`.
    pub payload: Option<LicensePayload>,
}

impl LicenseCheck {
    const fn malformed(reason: MalformedReason) -> Self {
        Self { verdict: Verdict::Malformed(reason), payload: None }
    }

    /// `true` only for [`Verdict::Valid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self.verdict, Verdict::Valid)
    }

    #[must_use]
    pub fn organization_id(&self) -> Option<&str> {
        self.payload.as_ref().map(|p| p.organization_id.as_str())
    }

    #[must_use]
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.payload.as_ref().map(|p| p.expiry)
    }

    #[must_use]
    pub fn total_documents(&self) -> Option<u64> {
        self.payload.as_ref().map(|p| p.document_quota)
    }
}

/// Alphabets tried while decoding, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
enum KeyEncoding {
    Base32,
    LegacyBase64,
    LegacyBase64Lowercase,
}

impl KeyEncoding {
    fn decode(self, normalized: &str) -> Option<Vec<u8>> {
        match self {
            Self::Base32 => {
                let upper = normalized.trim_end_matches('=').to_ascii_uppercase();
                BASE32_NOPAD.decode(upper.as_bytes()).ok()
            },
            Self::LegacyBase64 => LEGACY_BASE64.decode(normalized).ok(),
            Self::LegacyBase64Lowercase => {
                LEGACY_BASE64.decode(normalized.to_ascii_lowercase()).ok()
            },
        }
    }
}

/// Encodes a license into its presentable key.
///
/// `organization_id` must be non-empty and free of `:`; callers validate this (see the
/// `issuance` feature). The expiry is truncated to milliseconds.
///
/// # Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use penmark_licensing::codec::encode;
///
/// let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
/// let key = encode("acme-corp", expiry, 500);
/// assert_eq!(key.as_str(), "MFRW2-ZJNMN-XXE4B-2GE4D-SMZUG-U3DAM-BQGAY-DAORV-GAYA");
/// ```
#[must_use]
pub fn encode(organization_id: &str, expiry: DateTime<Utc>, document_quota: u64) -> LicenseKey {
    let record = format!(
        "{organization_id}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{document_quota}",
        expiry.timestamp_millis()
    );
    let encoded = BASE32_NOPAD.encode(record.as_bytes());

    let mut key = String::with_capacity(encoded.len() + encoded.len() / GROUP_LEN);
    for (i, ch) in encoded.chars().enumerate() {
        if i > 0 && i % GROUP_LEN == 0 {
            key.push('-');
        }
        key.push(ch);
    }

    LicenseKey(key.to_ascii_uppercase())
}

/// Decodes and validates a key against the system clock.
#[must_use]
pub fn decode(key: &str) -> LicenseCheck {
    decode_at(key, Utc::now())
}

/// Decodes and validates a key against an explicit instant.
#[must_use]
pub fn decode_at(key: &str, now: DateTime<Utc>) -> LicenseCheck {
    let normalized = normalize(key);

    if normalized.chars().count() < MIN_KEY_LEN {
        debug!(len = normalized.len(), "License key too short or empty");
        return LicenseCheck::malformed(MalformedReason::TooShort);
    }

    let mut worst = MalformedReason::Undecodable;
    let mut parsed = None;

    for encoding in KeyEncoding::iter() {
        let Some(bytes) = encoding.decode(&normalized) else {
            continue;
        };
        match parse_record(&bytes) {
            Ok(payload) => {
                debug!(%encoding, "License key decoded");
                parsed = Some(payload);
                break;
            },
            Err(reason) => worst = worst.max(reason),
        }
    }

    let Some(payload) = parsed else {
        debug!(reason = %worst, "License key is malformed");
        return LicenseCheck::malformed(worst);
    };

    if payload.expiry < now {
        debug!(organization = %payload.organization_id, expiry = %payload.expiry, "License key has expired");
        return LicenseCheck { verdict: Verdict::Expired, payload: Some(payload) };
    }

    LicenseCheck { verdict: Verdict::Valid, payload: Some(payload) }
}

/// Drops dashes and whitespace; case is left to the individual alphabets.
fn normalize(key: &str) -> String {
    key.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}

fn parse_record(bytes: &[u8]) -> Result<LicensePayload, MalformedReason> {
    let text = std::str::from_utf8(bytes).map_err(|_| MalformedReason::Undecodable)?;

    let parts: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    let [organization_id, expiry_ms, quota] = parts.as_slice() else {
        return Err(MalformedReason::FieldCount);
    };

    if organization_id.is_empty() || expiry_ms.is_empty() || quota.is_empty() {
        return Err(MalformedReason::EmptyField);
    }

    let expiry = expiry_ms
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .ok_or(MalformedReason::InvalidTimestamp)?;

    let document_quota = quota.parse::<u64>().map_err(|_| MalformedReason::InvalidQuota)?;

    Ok(LicensePayload { organization_id: (*organization_id).to_owned(), expiry, document_quota })
}
