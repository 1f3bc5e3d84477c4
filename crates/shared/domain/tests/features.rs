use penmark_domain::features::FeatureSet;

#[test]
fn labels_follow_declaration_order() {
    assert_eq!(
        FeatureSet::ALL.labels(),
        vec!["Digital Signatures", "Certificate Management", "Audit Logs"]
    );
    assert!(FeatureSet::empty().labels().is_empty());
}

#[test]
fn unrecognized_labels_stay_out_of_the_set() {
    let set = FeatureSet::from_labels(["Audit Logs", "Teleportation", " Digital Signatures "]);
    assert_eq!(set, FeatureSet::AUDIT_LOGS | FeatureSet::DIGITAL_SIGNATURES);
}

#[test]
fn unrecognized_labels_are_reported() {
    let labels = vec![
        "Digital Signatures".to_owned(),
        "Bulk Signing".to_owned(),
        "*".to_owned(),
        "Teleportation".to_owned(),
    ];

    let unknown: Vec<&str> = FeatureSet::unknown_labels(&labels).collect();
    assert_eq!(unknown, ["Bulk Signing", "Teleportation"]);
}

#[test]
fn wildcard_selects_everything() {
    assert_eq!(FeatureSet::from_label("*"), Some(FeatureSet::ALL));
    assert_eq!(FeatureSet::from_label(" all "), Some(FeatureSet::ALL));
    assert_eq!(FeatureSet::from_label("Bulk Signing"), None);
}
