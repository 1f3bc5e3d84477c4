//! # Logger
//!
//! Installs the global `tracing` subscriber for Penmark binaries.
//!
//! Diagnostics go to stderr so that command output on stdout stays clean for
//! scripts. A rolling log directory can be added on top; it is written through
//! a non-blocking worker whose guard lives in the returned [`Logger`].
//!
//! Binaries usually start from their [`LoggingConfig`] section:
//!
//! ```rust,no_run
//! # use penmark_domain::config::LoggingConfig;
//! # use penmark_logger::Logger;
//! let config = LoggingConfig::default();
//! let _logger = Logger::from_config("penmark", &config, 0)?;
//! # Ok::<(), penmark_logger::LoggerError>(())
//! ```
//!
//! `RUST_LOG` is honoured when no explicit directives are configured.

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use penmark_domain::config::LoggingConfig;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const LOG_FILE_SUFFIX: &str = "log";
const RETAINED_FILES: usize = 7;

/// Rolling file output settings.
#[derive(Debug)]
struct FileSink {
    directory: PathBuf,
    rotation: Rotation,
    retained: usize,
    json: bool,
}

/// Collects subscriber settings; nothing is installed until [`LoggerBuilder::init`].
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    directives: Option<String>,
    console: bool,
    file: Option<FileSink>,
}

impl LoggerBuilder {
    /// Minimum level used when no directive matches.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Lowers the threshold by `-v` count: one step to DEBUG, two or more to TRACE.
    #[must_use]
    pub const fn verbosity(self, count: u8) -> Self {
        match count {
            0 => self,
            1 => self.level(LevelFilter::DEBUG),
            _ => self.level(LevelFilter::TRACE),
        }
    }

    /// `EnvFilter` directives such as `penmark_licensing=debug`. Replaces `RUST_LOG`.
    #[must_use]
    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Also writes to daily-rotated files named `<name>.<date>.log` under `directory`.
    #[must_use]
    pub fn file(mut self, directory: impl Into<PathBuf>) -> Self {
        self.file = Some(FileSink {
            directory: directory.into(),
            rotation: Rotation::DAILY,
            retained: RETAINED_FILES,
            json: false,
        });
        self
    }

    /// Rotation period of the log files. No effect without [`LoggerBuilder::file`].
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(sink) = &mut self.file {
            sink.rotation = rotation;
        }
        self
    }

    /// How many rotated files to keep. No effect without [`LoggerBuilder::file`].
    #[must_use]
    pub const fn retained(mut self, count: usize) -> Self {
        if let Some(sink) = &mut self.file {
            sink.retained = count;
        }
        self
    }

    /// JSON lines instead of plain text in the log files.
    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        if let Some(sink) = &mut self.file {
            sink.json = enabled;
        }
        self
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown; dropping it flushes
    /// and stops the file writer.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an empty name, zero retained
    /// files, bad directives or no enabled output. [`LoggerError::Io`] and
    /// [`LoggerError::Appender`] when the log directory cannot be used.
    /// [`LoggerError::Subscriber`] when a global subscriber is already set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let filter = self.env_filter()?;

        let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
        if self.console {
            layers.push(console_layer());
        }

        let guard = match &self.file {
            Some(sink) => {
                let (file_layer, guard) = file_layer(&self.name, sink)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()
            .context("Installing the global subscriber")?;

        tracing::debug!(name = %self.name, file = guard.is_some(), "Logger initialized");
        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        let problem = if self.name.trim().is_empty() {
            Some("logger name is empty")
        } else if self.file.as_ref().is_some_and(|sink| sink.retained == 0) {
            Some("at least one rotated file must be retained")
        } else if !self.console && self.file.is_none() {
            Some("neither console nor file output is enabled")
        } else {
            None
        };

        problem.map_or(Ok(()), |message| {
            Err(LoggerError::InvalidConfiguration { message: message.into(), context: None })
        })
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.directives {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("directives '{directives}': {e}").into(),
                    context: None,
                })
            },
        }
    }
}

fn console_layer() -> BoxedLayer {
    layer()
        .compact()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .boxed()
}

fn file_layer(name: &str, sink: &FileSink) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    std::fs::create_dir_all(&sink.directory)
        .context(format!("Creating {}", sink.directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(sink.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(sink.retained)
        .build(&sink.directory)
        .context(format!("Opening log files in {}", sink.directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let plain = layer().with_writer(writer).with_ansi(false);
    let boxed = if sink.json { plain.json().boxed() } else { plain.boxed() };
    Ok((boxed, guard))
}

/// Keeps the file writer running. Drop on shutdown.
#[must_use = "dropping the logger stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts a builder; `name` prefixes rolling log files.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            level: LevelFilter::INFO,
            directives: None,
            console: true,
            file: None,
        }
    }

    /// Builds and installs a subscriber from the `[logging]` section.
    ///
    /// `verbosity` is the CLI `-v` count and overrides the configured level.
    ///
    /// # Errors
    /// [`LoggerError::Level`] when `config.level` is not a level name, plus
    /// everything [`LoggerBuilder::init`] reports.
    pub fn from_config(
        name: &str,
        config: &LoggingConfig,
        verbosity: u8,
    ) -> Result<Self, LoggerError> {
        Self::configure(name, config, verbosity)?.init()
    }

    fn configure(
        name: &str,
        config: &LoggingConfig,
        verbosity: u8,
    ) -> Result<LoggerBuilder, LoggerError> {
        let level = LevelFilter::from_str(config.level.trim())
            .context(format!("Log level '{}'", config.level))?;

        let mut builder = Self::builder(name).level(level).verbosity(verbosity);
        if let Some(directives) = &config.filter {
            builder = builder.directives(directives);
        }
        if let Some(directory) = &config.directory {
            builder = builder.file(directory).json(config.json);
        }
        Ok(builder)
    }

    /// Whether log files are being written.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}
