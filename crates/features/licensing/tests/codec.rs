use chrono::{DateTime, Duration, TimeZone, Utc};
use data_encoding::BASE32_NOPAD;
use penmark_licensing::codec::{decode_at, encode};
use penmark_licensing::{LicensePayload, MalformedReason, Verdict};
use proptest::prelude::*;

const ACME_KEY: &str = "MFRW2-ZJNMN-XXE4B-2GE4D-SMZUG-U3DAM-BQGAY-DAORV-GAYA";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

fn acme_expiry() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
}

/// Encodes arbitrary plaintext the way keys are encoded, bypassing payload validation.
fn raw_key(record: &str) -> String {
    BASE32_NOPAD.encode(record.as_bytes())
}

#[test]
fn acme_scenario_matches_known_key() {
    let key = encode("acme-corp", acme_expiry(), 500);
    assert_eq!(key.as_str(), ACME_KEY);

    let check = decode_at(ACME_KEY, now());
    assert_eq!(check.verdict, Verdict::Valid);
    assert!(check.is_valid());
    assert_eq!(check.organization_id(), Some("acme-corp"));
    assert_eq!(check.expiry(), Some(acme_expiry()));
    assert_eq!(check.total_documents(), Some(500));
}

#[test]
fn acme_key_expires_after_2030() {
    let check = decode_at(ACME_KEY, acme_expiry() + Duration::milliseconds(1));
    assert_eq!(check.verdict, Verdict::Expired);
    assert!(!check.is_valid());
    assert_eq!(check.total_documents(), Some(500));
}

#[test]
fn expiry_boundary_is_millisecond_exact() {
    let past = encode("acme", now() - Duration::milliseconds(1), 10);
    let future = encode("acme", now() + Duration::milliseconds(1), 10);

    assert_eq!(decode_at(past.as_str(), now()).verdict, Verdict::Expired);
    assert_eq!(decode_at(future.as_str(), now()).verdict, Verdict::Valid);
}

#[test]
fn case_dashes_and_whitespace_are_insignificant() {
    let compact = ACME_KEY.replace('-', "");
    let variants = [
        ACME_KEY.to_ascii_lowercase(),
        compact.clone(),
        compact.to_ascii_lowercase(),
        format!("  {ACME_KEY}\n"),
        ACME_KEY.replace('-', " - "),
        "mFrW2-zJnMn-xXe4B-2gE4d-sMzUg-u3DaM-bQgAy-dAoRv-gAyA".to_owned(),
    ];

    let expected = decode_at(ACME_KEY, now());
    for variant in variants {
        assert_eq!(decode_at(&variant, now()), expected, "variant {variant:?}");
    }
}

#[test]
fn short_input_is_malformed() {
    for input in ["", "   ", "-----", "ABC", "MFRW2-ZJNM"] {
        let check = decode_at(input, now());
        assert_eq!(check.verdict, Verdict::Malformed(MalformedReason::TooShort), "{input:?}");
        assert!(check.payload.is_none());
    }
}

#[test]
fn garbage_and_mutated_keys_are_malformed() {
    let inputs = [
        "!!!!!-!!!!!-!!!!!",
        "HELLO-WORLD-THIS-IS-NOT-A-KEY",
        "MFRW2-ZJNMN-XXE4B-2GE4D",
        "MFRW2-ZJNMN-XXE4B-2GE4D-SMZUG-U3DAM-BQGAY-DAORV-GAY",
        "MFRW2-ZJNMN-XXE4B-2GE41-SMZUG-U3DAM-BQGAY-DAORV-GAYA",
        "MFRW2-ZJNMN-XXE4B-2GE4D-SMZUG-U3DAM-BQGAY-DAORV-GAY!",
    ];

    for input in inputs {
        let check = decode_at(input, now());
        assert!(matches!(check.verdict, Verdict::Malformed(_)), "{input:?} -> {check:?}");
        assert!(!check.is_valid());
        assert!(check.payload.is_none());
    }
}

#[test]
fn malformed_records_report_the_failing_field() {
    let cases = [
        ("acme-corp:1893456000000", MalformedReason::FieldCount),
        ("acme-corp:1893456000000:500:extra", MalformedReason::FieldCount),
        ("acme-corp::500", MalformedReason::EmptyField),
        ("acme-corp:soon:500", MalformedReason::InvalidTimestamp),
        ("acme-corp:1893456000000:-1", MalformedReason::InvalidQuota),
    ];

    for (record, reason) in cases {
        let check = decode_at(&raw_key(record), now());
        assert_eq!(check.verdict, Verdict::Malformed(reason), "{record:?}");
        assert!(check.payload.is_none());
    }
}

#[test]
fn legacy_base64_keys_still_decode() {
    let acme = decode_at("YWNtZS1jb3JwOjE4OTM0NTYwMDAwMDA6NTAw", now());
    assert_eq!(acme.verdict, Verdict::Valid);
    assert_eq!(
        acme.payload,
        Some(LicensePayload::new("acme-corp", acme_expiry(), 500))
    );

    let grouped = decode_at("bGVnY-WN5LW-9yZzo-0MTAy-NDQ0O-DAwMD-AwOjI1", now());
    assert_eq!(grouped.verdict, Verdict::Valid);
    assert_eq!(grouped.organization_id(), Some("legacy-org"));
    assert_eq!(grouped.total_documents(), Some(25));
    assert_eq!(grouped.expiry(), Some(Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap()));
}

#[test]
fn payload_encode_matches_free_function() {
    let payload = LicensePayload::new("acme-corp", acme_expiry(), 500);
    assert_eq!(payload.encode().as_str(), ACME_KEY);
}

proptest! {
    #[test]
    fn round_trip_recovers_payload(
        organization in "[^:]{1,40}",
        offset_ms in 0i64..3_153_600_000_000,
        quota in any::<u64>(),
    ) {
        let expiry = now() + Duration::milliseconds(offset_ms);
        let key = encode(&organization, expiry, quota);
        let check = decode_at(key.as_str(), now());

        prop_assert_eq!(check.verdict, Verdict::Valid);
        prop_assert_eq!(check.payload, Some(LicensePayload::new(organization, expiry, quota)));
    }

    #[test]
    fn keys_are_grouped_upper_case(
        organization in "[a-z0-9-]{1,24}",
        quota in 0u64..100_000,
    ) {
        let key = encode(&organization, now(), quota);
        let text = key.as_str();

        prop_assert_eq!(text, text.to_ascii_uppercase());
        prop_assert!(!text.ends_with('-'));
        prop_assert!(text.split('-').all(|group| !group.is_empty() && group.len() <= 5));
    }

    #[test]
    fn decoding_never_panics(input in "\\PC{0,80}") {
        let check = decode_at(&input, now());
        prop_assert_eq!(check.payload.is_some(), !matches!(check.verdict, Verdict::Malformed(_)));
    }
}
