//! Logging utilities
//!
//! Provides logging configuration and helpers.

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Filter directive for a configured level: a bare level applies to this
/// crate only, anything else is passed through as an `EnvFilter` directive
pub fn filter_directive(level: &str) -> String {
    match LogLevel::from_str(level) {
        Some(level) => format!("runtests={}", level.to_tracing_level()),
        None => level.to_string(),
    }
}

/// Plain-text subscriber writing to `writer`; no colour codes so log lines
/// stay readable next to the report
pub fn build_subscriber<W>(level: &str, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(filter_directive(level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directive("warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .finish()
}

/// Initialize the logger; output goes to stderr next to the report
pub fn init_logger(level: &str) {
    let _ = tracing::subscriber::set_global_default(build_subscriber(level, std::io::stderr));
}
