use config::{Config, Environment, File};
use penmark_domain::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Custom error type for config loading.
#[penmark_derive::penmark_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: An explicit `path` must exist. Without one, the optional `penmark`
///    file (`penmark.toml`, `penmark.json`, ...) in the working directory is used when present.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `PENMARK__`.
///    Nested structures are accessed using double underscores
///    (e.g., `PENMARK__LICENSING__STORE_PATH` maps to `licensing.store_path`).
///
/// Fields missing from every layer fall back to the target type's serde defaults.
///
/// # Errors
/// This function will return an error if:
/// * An explicitly specified configuration file cannot be found or parsed.
/// * The merged content does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use penmark_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match &path {
        Some(p) => {
            info!("Loading config from {}", p.as_ref().display());
            File::from(p.as_ref()).required(true)
        },
        None => {
            debug!("Looking for optional config file '{DEFAULT_CONFIG_FILE}'");
            File::with_name(DEFAULT_CONFIG_FILE).required(false)
        },
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
