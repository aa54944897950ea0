use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

/// Name of the dotenv file consulted before the process environment.
pub const DOTENV_FILE_NAME: &str = ".env";

/// A key-value lookup over some environment.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` if this source does not define it.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// A `.env`-style file.
#[derive(Debug, Clone)]
pub struct DotEnvFile {
    path: PathBuf,
}

impl DotEnvFile {
    /// Creates a lookup over the dotenv file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The dotenv file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DotEnvFile {
    /// `.env` in the current working directory
    fn default() -> Self {
        Self::new(DOTENV_FILE_NAME)
    }
}

impl EnvSource for DotEnvFile {
    fn lookup(&self, key: &str) -> Option<String> {
        let entries = match dotenvy::from_path_iter(&self.path) {
            Ok(entries) => entries,
            Err(e) => {
                trace!("no usable dotenv file at {}: {}", self.path.display(), e);
                return None;
            }
        };

        for entry in entries {
            match entry {
                Ok((name, value)) if name == key => return Some(value),
                Ok(_) => {}
                Err(dotenvy::Error::LineParse(line, index)) => {
                    warn!("skipping malformed line in {} at {}: {}", self.path.display(), index, line);
                }
                Err(e) => {
                    debug!("stopped reading {}: {}", self.path.display(), e);
                    return None;
                }
            }
        }

        None
    }
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<K, V> EnvSource for std::collections::HashMap<K, V>
where
    K: std::borrow::Borrow<str> + std::hash::Hash + Eq,
    V: AsRef<str>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.as_ref().to_string())
    }
}
