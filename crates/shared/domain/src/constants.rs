//! Stable string constants shared by the licensing and signing crates.

/// Storage key (file stem) of the persisted organization license record.
pub const LICENSE_STORAGE_KEY: &str = "org_license_data";

/// Environment prefix for configuration overrides (`PENMARK__LICENSING__STORE_PATH`).
pub const ENV_PREFIX: &str = "PENMARK";

/// Default configuration file stem, resolved by the `config` crate (`penmark.toml`, ...).
pub const DEFAULT_CONFIG_FILE: &str = "penmark";

// Feature labels as persisted in the license record.
pub const DIGITAL_SIGNATURES: &str = "Digital Signatures";
pub const CERTIFICATE_MANAGEMENT: &str = "Certificate Management";
pub const AUDIT_LOGS: &str = "Audit Logs";

/// Prefix of generated document identifiers.
pub const DOCUMENT_ID_PREFIX: &str = "DOC-";

/// Default reason printed inside signature boxes.
pub const DEFAULT_SIGNATURE_REASON: &str = "I approve this document";
