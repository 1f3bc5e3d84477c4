use std::borrow::Cow;

/// Reasons the global subscriber could not be installed.
#[penmark_derive::penmark_error]
pub enum LoggerError {
    #[error("Log level error{}: {source}", format_context(context))]
    Level {
        source: tracing::level_filters::ParseLevelFilterError,
        context: Option<Cow<'static, str>>,
    },

    /// The rolling appender rejected its directory or file name.
    #[error("Log file appender error{}: {source}", format_context(context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// A global subscriber is already installed in this process.
    #[error("Tracing subscriber error{}: {source}", format_context(context))]
    Subscriber {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Log directory error{}: {source}", format_context(context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid logger configuration{}: {message}", format_context(context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
