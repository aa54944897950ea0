#![allow(deprecated)]
use std::{
    env::home_dir,
    io::Write,
    path::{Path, PathBuf},
};

use eyre::{eyre, OptionExt, Result};
use pinnacle_common::{Gateway, GatewayStyle, GATEWAY_NAMES};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    BACKEND_NAMES, CONFIG_DIR, CONFIG_FILE, CONFIG_KEYS, ENV_PREFIX, GREEN_ANSI_COLOR,
    PURPLE_ANSI_COLOR, RESET_ANSI_COLOR,
};

/// The [`Configuration`] struct represents the configuration of the CLI.
///
/// Every value is optional; command-line flags win over it, and `PINNACLE_*` environment
/// variables win over the file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    /// The backend to pin to: `local`, `pinata`, `nft-storage` or `web3-storage`.
    pub backend: Option<String>,

    /// The `.env` or environment key holding the backend's bearer token.
    pub token_env_key: Option<String>,

    /// The registry gateway used to print URLs.
    pub gateway: Option<String>,

    /// The gateway URL style, `path` or `subdomain`.
    pub gateway_style: Option<String>,

    /// The RPC API URL of the local IPFS daemon.
    pub local_api_url: Option<String>,
}

impl Configuration {
    /// Path of the configuration file, `~/.pinnacle/config.json`.
    pub fn path() -> Result<PathBuf> {
        let mut config_path = home_dir().ok_or_eyre("failed to get home directory")?;
        config_path.push(CONFIG_DIR);
        config_path.push(CONFIG_FILE);
        Ok(config_path)
    }

    /// Returns the current configuration: the file if it exists, overridden by the environment.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::path()?)?;

        // env should override config values
        Ok(config.overridden_by(Self::load_from_env()?))
    }

    /// Reads the configuration file at `path`. A missing file is an empty configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config = std::fs::read_to_string(path)?;
        serde_json::from_str(&config).map_err(|e| eyre!("invalid configuration at {}: {}", path.display(), e))
    }

    /// Loads configuration from `PINNACLE_*` env with envy
    fn load_from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX).from_env::<Configuration>().map_err(Into::into)
    }

    /// Field-wise merge where values present in `other` win.
    pub fn overridden_by(self, other: Self) -> Self {
        Self {
            backend: other.backend.or(self.backend),
            token_env_key: other.token_env_key.or(self.token_env_key),
            gateway: other.gateway.or(self.gateway),
            gateway_style: other.gateway_style.or(self.gateway_style),
            local_api_url: other.local_api_url.or(self.local_api_url),
        }
    }

    /// Saves the configuration to disk.
    fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Saves the configuration to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // build the directory if it doesn't exist
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let config = serde_json::to_string_pretty(self)?;
        std::fs::write(path, config)?;

        Ok(())
    }

    /// Set a value and save the configuration
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(key, value)?;
        self.save()
    }

    /// Validates and sets a value in memory.
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim().to_string();
        match key {
            "backend" => {
                if !BACKEND_NAMES.contains(&value.as_str()) {
                    return Err(eyre!("invalid backend '{}', expected one of {:?}", value, BACKEND_NAMES));
                }
                self.backend = Some(value)
            }
            "token_env_key" => self.token_env_key = Some(value),
            "gateway" => {
                Gateway::named(&value)?;
                self.gateway = Some(value)
            }
            "gateway_style" => {
                value.parse::<GatewayStyle>()?;
                self.gateway_style = Some(value)
            }
            "local_api_url" => self.local_api_url = Some(value),
            _ => return Err(eyre!("invalid key '{}', expected one of {:?}", key, CONFIG_KEYS)),
        };

        Ok(())
    }

    /// Starts blocking interactive mode for configuration.
    pub fn from_interactive() -> Result<Self> {
        let mut config = Configuration::load().unwrap_or_default();

        println!(
            "{PURPLE_ANSI_COLOR}Welcome to the pinnacle configuration wizard!{RESET_ANSI_COLOR}\n\nI'll help walk you through configuring the CLI. If you wish to use an existing configuration value, just press enter.\nYou can exit this wizard at any time by pressing `Ctrl+C`.\n",
        );

        let prompts = [
            ("backend", format!("Set the default backend {:?}", BACKEND_NAMES), &config.backend),
            ("token_env_key", "Set the env key holding your token".to_string(), &config.token_env_key),
            ("gateway", format!("Set the default gateway {:?}", GATEWAY_NAMES), &config.gateway),
            ("gateway_style", "Set the gateway style [path, subdomain]".to_string(), &config.gateway_style),
            ("local_api_url", "Set the local daemon API URL".to_string(), &config.local_api_url),
        ]
        .map(|(key, label, current)| (key, label, current.clone()));

        for (step, (key, label, current)) in prompts.into_iter().enumerate() {
            print!("{GREEN_ANSI_COLOR}{}.{RESET_ANSI_COLOR} {} (default: {:?}): ", step + 1, label, current);
            std::io::stdout().flush()?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            if !input.trim().is_empty() {
                config.update(key, &input)?;
            }
        }

        println!(
            "\n{GREEN_ANSI_COLOR}Configuration set!{RESET_ANSI_COLOR}\n{}",
            serde_json::to_string_pretty(&config)?
        );

        config.save()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new("pinnacle-config").unwrap();

        assert_eq!(Configuration::load_from(&dir.path().join("config.json")).unwrap(), Configuration::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new("pinnacle-config").unwrap();
        let path = dir.path().join(".pinnacle").join("config.json");
        let mut config = Configuration::default();
        config.update("backend", "pinata").unwrap();
        config.update("gateway", "pinata").unwrap();

        config.save_to(&path).unwrap();
        assert_eq!(Configuration::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new("pinnacle-config").unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Configuration::load_from(&path).is_err());
    }

    #[test]
    fn test_update_validates() {
        let mut config = Configuration::default();

        assert!(config.update("backend", "ipfs").is_err());
        assert!(config.update("gateway", "ipfss").is_err());
        assert!(config.update("gateway_style", "query").is_err());
        assert!(config.update("rpc_url", "http://localhost").is_err());
        assert_eq!(config, Configuration::default());

        config.update("gateway_style", "subdomain\n").unwrap();
        assert_eq!(config.gateway_style.as_deref(), Some("subdomain"));
    }

    #[test]
    fn test_environment_wins() {
        let file = Configuration {
            backend: Some("local".into()),
            gateway: Some("local".into()),
            ..Default::default()
        };
        let env = Configuration { backend: Some("pinata".into()), ..Default::default() };

        let merged = file.overridden_by(env);
        assert_eq!(merged.backend.as_deref(), Some("pinata"));
        assert_eq!(merged.gateway.as_deref(), Some("local"));
    }
}
