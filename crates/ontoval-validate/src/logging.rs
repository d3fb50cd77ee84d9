//! Routing of engine events through `tracing-subscriber`.
//!
//! The library only emits `tracing` events. An application embedding the
//! engine calls [`init_logging`] once to send them to stderr.
//!
//! # What is logged where
//!
//! - `error`: a validation worker thread died and its chunk was re-run
//! - `warn`: a rule failed on a subject
//! - `info`: pass summaries
//! - `debug`: registrations, engine construction, snapshot loading
//! - [`DISPATCH_TARGET`] at `debug`: one event per (subject, rule) pair.
//!   These are off unless [`LogConfig::dispatch_events`] is set, since a
//!   pass over a large batch emits one per pair.
//!
//! # Usage
//!
//! ```no_run
//! use ontoval_validate::logging::{init_logging, LogConfig};
//!
//! // -vv: debug plus per-rule dispatch events
//! init_logging(&LogConfig::from_verbosity(2))?;
//! # Ok::<(), ontoval_validate::logging::LoggingError>(())
//! ```

use std::io;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Target of the per-(subject, rule) dispatch events.
pub const DISPATCH_TARGET: &str = "ontoval_validate::dispatch";

/// Crates that log at the configured level; everything else logs at warn.
const OWN_CRATES: &[&str] = &["ontoval_model", "ontoval_ontology", "ontoval_validate"];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("Logging already initialised: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// How validation events are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event.
    #[default]
    Text,
    /// One JSON object per event, with the enclosing `validate` span.
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Colour text output. Ignored for JSON.
    pub ansi: bool,
    pub timestamps: bool,
    /// Emit the per-(subject, rule) dispatch events.
    pub dispatch_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::default(),
            ansi: true,
            timestamps: true,
            dispatch_events: false,
        }
    }
}

impl LogConfig {
    /// Map a `-v` count to a configuration.
    ///
    /// - 0: pass summaries and rule failures
    /// - 1: plus registrations and engine setup
    /// - 2+: plus one event per dispatched rule
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = if verbosity == 0 { Level::INFO } else { Level::DEBUG };
        Self {
            level,
            dispatch_events: verbosity >= 2,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.ansi = enable;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.timestamps = enable;
        self
    }

    #[must_use]
    pub fn with_dispatch_events(mut self, enable: bool) -> Self {
        self.dispatch_events = enable;
        self
    }

    /// Filter directives used when `RUST_LOG` is unset.
    fn directives(&self) -> String {
        let level = self.level.as_str().to_lowercase();
        let dispatch = if self.dispatch_events { "debug" } else { "off" };

        let mut directives = vec!["warn".to_string()];
        directives.extend(OWN_CRATES.iter().map(|name| format!("{name}={level}")));
        directives.push(format!("{DISPATCH_TARGET}={dispatch}"));
        directives.join(",")
    }
}

/// Install the global subscriber, writing to stderr.
///
/// # Errors
///
/// Returns [`LoggingError::AlreadyInitialized`] if a subscriber is already
/// installed.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    init_logging_with_writer(config, io::stderr)
}

/// Install the global subscriber with a custom writer.
///
/// # Errors
///
/// Returns [`LoggingError::AlreadyInitialized`] if a subscriber is already
/// installed.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> Result<(), LoggingError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directives()));

    tracing_subscriber::registry()
        .with(event_layer(config, writer).with_filter(filter))
        .try_init()?;
    Ok(())
}

fn event_layer<W>(config: &LogConfig, writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    match (config.format, config.timestamps) {
        (LogFormat::Json, _) => fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(writer)
            .boxed(),
        (LogFormat::Text, true) => fmt::layer()
            .compact()
            .with_ansi(config.ansi)
            .with_writer(writer)
            .boxed(),
        (LogFormat::Text, false) => fmt::layer()
            .compact()
            .without_time()
            .with_ansi(config.ansi)
            .with_writer(writer)
            .boxed(),
    }
}
