use clap::Parser;
use eyre::{bail, Result};

use crate::constants::CONFIG_KEYS;

/// Arguments for the `config` subcommand
///
/// With no arguments the merged configuration is printed. `<KEY> <VALUE>` validates and saves a
/// single value, `--interactive` walks through every key and `--path` prints where the
/// configuration file lives.
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display or edit your pinnacle configuration.",
    override_usage = "pinnacle config [OPTIONS] [KEY] [VALUE]"
)]
pub struct ConfigArgs {
    /// The key to update: backend, token_env_key, gateway, gateway_style or local_api_url.
    pub key: Option<String>,

    /// The value to set the key to.
    #[clap(requires = "key")]
    pub value: Option<String>,

    /// Whether to enter interactive mode.
    #[clap(long, short, conflicts_with_all = ["key", "path"])]
    pub interactive: bool,

    /// Print the path of the configuration file and exit.
    #[clap(long, conflicts_with = "key")]
    pub path: bool,
}

/// What a `config` invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the merged configuration.
    Show,
    /// Print the configuration file path.
    Path,
    /// Run the configuration wizard.
    Interactive,
    /// Validate and save one value.
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
}

impl ConfigArgs {
    /// Resolves the flags into a single action. A key without a value is an error.
    pub fn action(&self) -> Result<ConfigAction> {
        if self.interactive {
            return Ok(ConfigAction::Interactive);
        }
        if self.path {
            return Ok(ConfigAction::Path);
        }

        match (&self.key, &self.value) {
            (None, _) => Ok(ConfigAction::Show),
            (Some(key), Some(value)) => {
                Ok(ConfigAction::Set { key: key.clone(), value: value.clone() })
            }
            (Some(key), None) => {
                bail!("missing a value for '{}', expected `pinnacle config {} <VALUE>`", key, key)
            }
        }
    }

    /// One line describing how to change the configuration.
    pub fn usage_hint() -> String {
        format!(
            "use `pinnacle config <KEY> <VALUE>` with a key of {:?}, or `pinnacle config --interactive`.",
            CONFIG_KEYS
        )
    }
}
