use crate::constants::{
    AUDIT_LOGS, CERTIFICATE_MANAGEMENT, DEFAULT_SIGNATURE_REASON, DIGITAL_SIGNATURES,
    LICENSE_STORAGE_KEY,
};
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared across the licensing and signing slices.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub licensing: LicensingConfig,
    pub signing: SigningConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Where the organization license record lives and what a fresh activation unlocks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LicensingConfig {
    /// JSON document holding the persisted record.
    pub store_path: PathBuf,
    /// Feature labels granted on activation.
    pub features: Vec<String>,
}

/// Defaults applied to signature boxes when a request leaves them unset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    pub reason: String,
    pub location: Option<String>,
}

/// Logging knobs for the binaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Optional `EnvFilter` directives, e.g. `penmark_licensing=debug`.
    pub filter: Option<String>,
    /// Directory for rolling log files; console only when unset.
    pub directory: Option<PathBuf>,
    /// Emit file logs as JSON lines.
    pub json: bool,
}

// --- Default ---

impl Default for LicensingConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(format!("{LICENSE_STORAGE_KEY}.json")),
            features: vec![
                DIGITAL_SIGNATURES.to_owned(),
                CERTIFICATE_MANAGEMENT.to_owned(),
                AUDIT_LOGS.to_owned(),
            ],
        }
    }
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self { reason: DEFAULT_SIGNATURE_REASON.to_owned(), location: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, directory: None, json: false }
    }
}
