//! Persistence for the organization license record.
//!
//! The record is a single JSON document under one key. Two backends are provided:
//! [`MemoryLicenseStore`] for tests and embedding, and [`FileLicenseStore`] which writes the
//! document atomically to disk.

use crate::error::{LicenseError, LicenseErrorExt};
use crate::record::OrganizationLicense;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Key-value slot holding the serialized [`OrganizationLicense`].
pub trait LicenseStore: Debug + Send + Sync {
    /// Returns the stored record, or `None` if nothing usable is stored.
    ///
    /// # Errors
    /// Returns [`LicenseError::Io`] when the backing medium cannot be read.
    fn load(&self) -> Result<Option<OrganizationLicense>, LicenseError>;

    /// Replaces the stored record.
    ///
    /// # Errors
    /// Returns [`LicenseError::Io`] or [`LicenseError::Serialize`] when the record cannot be
    /// written.
    fn save(&self, license: &OrganizationLicense) -> Result<(), LicenseError>;
}

/// In-process store. Keeps the serialized form so a load never aliases live state.
#[derive(Debug, Default)]
pub struct MemoryLicenseStore {
    slot: Mutex<Option<String>>,
}

impl MemoryLicenseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw document text, valid or not.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(raw.into())) }
    }

    /// The raw document currently stored.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl LicenseStore for MemoryLicenseStore {
    fn load(&self) -> Result<Option<OrganizationLicense>, LicenseError> {
        Ok(self.slot.lock().as_deref().and_then(|raw| parse_document(raw, "memory")))
    }

    fn save(&self, license: &OrganizationLicense) -> Result<(), LicenseError> {
        let raw = serde_json::to_string(license).context("Serializing license record")?;
        *self.slot.lock() = Some(raw);
        Ok(())
    }
}

/// Store backed by one JSON file.
///
/// Writes go to a sibling temp file which is synced and then renamed over the target, so a
/// crash leaves either the old or the new document.
#[derive(Debug)]
pub struct FileLicenseStore {
    path: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileLicenseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), tmp_counter: AtomicU64::new(0) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let mut name = self.path.file_name().map(|f| f.to_os_string()).unwrap_or_default();
        name.push(format!(".{}.{n}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

impl LicenseStore for FileLicenseStore {
    fn load(&self) -> Result<Option<OrganizationLicense>, LicenseError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored license record");
                return Ok(None);
            },
            Err(err) => {
                return Err(LicenseError::Io {
                    source: err,
                    context: Some(format!("Reading {}", self.path.display()).into()),
                });
            },
        };

        Ok(parse_document(&raw, &self.path.display().to_string()))
    }

    fn save(&self, license: &OrganizationLicense) -> Result<(), LicenseError> {
        let data = serde_json::to_vec_pretty(license).context("Serializing license record")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))?;
        }

        let temp = self.tmp_path();
        let written = (|| {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&data).context("Write failed")?;
            file.sync_all().context("Hardware sync failed")
        })();

        if let Err(err) = written.and_then(|()| {
            fs::rename(&temp, &self.path).context(format!(
                "Atomic swap failed: {} -> {}",
                temp.display(),
                self.path.display()
            ))
        }) {
            let _ = fs::remove_file(&temp);
            return Err(err);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            sync_dir(parent);
        }

        debug!(path = %self.path.display(), "License record saved");
        Ok(())
    }
}

fn parse_document(raw: &str, origin: &str) -> Option<OrganizationLicense> {
    match serde_json::from_str(raw) {
        Ok(license) => Some(license),
        Err(err) => {
            warn!(%origin, error = %err, "Stored license record is corrupt; ignoring it");
            None
        },
    }
}

fn sync_dir(path: &Path) {
    match fs::File::open(path) {
        Ok(dir) => {
            if let Err(err) = dir.sync_all() {
                debug!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => debug!(path = %path.display(), error = %err, "Directory open failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> OrganizationLicense {
        let mut license =
            OrganizationLicense::inactive(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
        license.license_key = "MFRW2-ZJNMN".to_owned();
        license.total_documents = 9;
        license.is_active = true;
        license
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryLicenseStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn memory_store_ignores_garbage() {
        let store = MemoryLicenseStore::with_raw("{not json");
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLicenseStore::new(dir.path().join("nested/license.json"));

        store.save(&sample()).unwrap();
        store.save(&sample()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path().join("nested")).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(store.load().unwrap(), Some(sample()));
    }
}
