//! Tracing setup for the pinnacle CLI.
//!
//! A [`PinnacleTracer`] collects one layer per output (stdout, an optional rolling log file and
//! optional journald), each with its own format and filter, and installs them as the global
//! subscriber.
//!
//! ```no_run
//! use pinnacle_tracing::{LayerInfo, LogFormat, PinnacleTracer, Tracer};
//!
//! let stdout = LayerInfo::new(LogFormat::Terminal, "info".to_string(), String::new(), None);
//! let _guard = PinnacleTracer::new().with_stdout(stdout).init()?;
//! # Ok::<(), eyre::Report>(())
//! ```

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};

mod formatter;
mod layers;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::layers::Layers;

/// Configures and installs the global subscriber.
#[derive(Debug, Clone)]
pub struct PinnacleTracer {
    stdout: LayerInfo,
    journald: Option<String>,
    file: Option<(LayerInfo, FileInfo)>,
}

impl PinnacleTracer {
    /// A tracer logging to stdout in terminal format at `INFO`.
    pub fn new() -> Self {
        Self { stdout: LayerInfo::default(), journald: None, file: None }
    }

    /// Replaces the stdout layer configuration.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Also logs to journald, filtered by `filter`.
    pub fn with_journald(mut self, filter: String) -> Self {
        self.journald = Some(filter);
        self
    }

    /// Also logs to a rolling file.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Default for PinnacleTracer {
    fn default() -> Self {
        Self::new()
    }
}

/// Format, filters and color of one layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Creates a new [`LayerInfo`].
    ///
    /// `default_directive` applies when `RUST_LOG` is unset; `filters` is a comma separated list
    /// of extra directives.
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// Something that can install a global subscriber.
pub trait Tracer {
    /// Installs the subscriber. The returned guard, if any, must be held for file logs to be
    /// flushed.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

impl Tracer for PinnacleTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse()?,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        if let Some(filter) = self.journald {
            layers.journald(&filter)?;
        }

        let file_guard = match self.file {
            Some((config, file_info)) => Some(layers.file(config.format, &config.filters, file_info)?),
            None => None,
        };

        // only fails when a global subscriber is already set
        let _ = tracing_subscriber::registry().with(layers.into_inner()).try_init();
        Ok(file_guard)
    }
}
