//! Facade crate for Penmark features and shared modules.
//! Re-exports domain/kernel primitives and wires the licensing and signing slices from one
//! [`AppConfig`](domain::config::AppConfig).
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `penmark` with the desired feature flags (`signing`, `issuance`).
//! - Call [`init`] once at startup and hand the returned [`Platform`] to the rest of the app.

pub use penmark_domain as domain;
pub use penmark_kernel as kernel;
pub use penmark_licensing as licensing;
#[cfg(feature = "signing")]
pub use penmark_signing as signing;

use penmark_domain::config::AppConfig;
use penmark_licensing::{LicenseError, Licensing};

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "licensing",
        #[cfg(feature = "signing")]
        "signing",
        #[cfg(feature = "issuance")]
        "issuance",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialized slices sharing one configuration.
#[derive(Debug, Clone)]
pub struct Platform {
    pub config: AppConfig,
    pub licensing: Licensing,
}

impl Platform {
    /// Signing workflow gated by this platform's license.
    #[cfg(feature = "signing")]
    pub fn signer<S: signing::PdfStamper>(&self, stamper: S) -> signing::Signer<Licensing, S> {
        signing::Signer::new(self.licensing.clone(), stamper)
    }

    /// Signature options seeded from the `[signing]` config section.
    #[cfg(feature = "signing")]
    #[must_use]
    pub fn signature_options(&self) -> signing::SignatureOptions {
        signing::SignatureOptions::from_config(&self.config.signing)
    }
}

/// Initialize all enabled features.
///
/// # Errors
/// Returns an error if the stored license record cannot be read.
pub fn init(config: &AppConfig) -> Result<Platform, LicenseError> {
    let licensing = Licensing::from_config(&config.licensing)?;

    tracing::info!(
        store = %config.licensing.store_path.display(),
        features = ?features::ENABLED,
        "Penmark initialized"
    );

    Ok(Platform { config: config.clone(), licensing })
}
