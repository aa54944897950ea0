use std::path::{Path, PathBuf};

use rolling_file::{RollingConditionBasic, RollingFileAppender};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Directive, EnvFilter, Layer, Registry};

use crate::formatter::LogFormat;

/// Guard of the non-blocking file writer. Logs are flushed when it is dropped, so it must live
/// until the program exits.
pub type FileWorkerGuard = WorkerGuard;

/// A boxed tracing [Layer].
pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Directives added to every filter to silence chatty dependencies.
const DEFAULT_ENV_FILTER_DIRECTIVES: [&str; 3] = ["hyper::proto::h1=off", "hyper_util=off", "reqwest=warn"];

/// The layers of the global subscriber, built one output at a time.
#[derive(Default)]
pub(crate) struct Layers {
    inner: Vec<BoxedLayer<Registry>>,
}

impl Layers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_inner(self) -> Vec<BoxedLayer<Registry>> {
        self.inner
    }

    /// Adds a journald layer.
    pub(crate) fn journald(&mut self, filter: &str) -> eyre::Result<()> {
        let journald_filter = build_env_filter(None, filter)?;
        let layer = tracing_journald::layer()?.with_filter(journald_filter).boxed();
        self.inner.push(layer);
        Ok(())
    }

    /// Adds a stdout layer.
    pub(crate) fn stdout(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        color: Option<String>,
    ) -> eyre::Result<()> {
        let filter = build_env_filter(Some(default_directive), filters)?;
        let layer = format.apply(filter, color, None);
        self.inner.push(layer);
        Ok(())
    }

    /// Adds a rolling file layer, returning the writer's guard.
    pub(crate) fn file(
        &mut self,
        format: LogFormat,
        filter: &str,
        file_info: FileInfo,
    ) -> eyre::Result<FileWorkerGuard> {
        let (writer, guard) = file_info.create_log_writer()?;
        let file_filter = build_env_filter(None, filter)?;
        let layer = format.apply(file_filter, None, Some(writer));
        self.inner.push(layer);
        Ok(guard)
    }
}

/// Where and how much to log to disk.
#[derive(Debug, Clone)]
pub struct FileInfo {
    dir: PathBuf,
    file_name: String,
    max_size_bytes: u64,
    max_files: usize,
}

impl FileInfo {
    /// Creates a new [`FileInfo`]
    pub fn new(dir: PathBuf, file_name: String, max_size_bytes: u64, max_files: usize) -> Self {
        Self { dir, file_name, max_size_bytes, max_files }
    }

    /// Path of the active log file.
    pub fn log_file(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn create_log_dir(&self) -> eyre::Result<&Path> {
        let log_dir: &Path = self.dir.as_ref();
        if !log_dir.exists() {
            std::fs::create_dir_all(log_dir)
                .map_err(|e| eyre::eyre!("Could not create log directory {}: {}", log_dir.display(), e))?;
        }
        Ok(log_dir)
    }

    fn create_log_writer(&self) -> eyre::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
        let log_dir = self.create_log_dir()?;
        let appender = RollingFileAppender::new(
            log_dir.join(&self.file_name),
            RollingConditionBasic::new().max_size(self.max_size_bytes),
            self.max_files,
        )
        .map_err(|e| eyre::eyre!("Could not initialize file logging: {}", e))?;

        Ok(tracing_appender::non_blocking(appender))
    }
}

/// Builds an [`EnvFilter`] from `RUST_LOG`, the default directive and a comma separated list of
/// extra directives.
pub(crate) fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = match default_directive {
        Some(default_directive) => {
            EnvFilter::builder().with_default_directive(default_directive).from_env_lossy()
        }
        None => EnvFilter::builder().from_env_lossy(),
    };

    DEFAULT_ENV_FILTER_DIRECTIVES
        .into_iter()
        .chain(directives.split(',').filter(|directive| !directive.is_empty()))
        .try_fold(env_filter, |env_filter, directive| -> eyre::Result<EnvFilter> {
            Ok(env_filter.add_directive(directive.parse()?))
        })
}
