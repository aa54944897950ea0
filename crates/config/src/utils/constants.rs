/// ANSI color for purple
pub(crate) const PURPLE_ANSI_COLOR: &str = "\x1b[35m";
/// ANSI color for red
pub(crate) const RED_ANSI_COLOR: &str = "\x1b[31m";
/// ANSI color for green
pub(crate) const GREEN_ANSI_COLOR: &str = "\x1b[32m";
/// Reset the ANSI color to the default
pub(crate) const RESET_ANSI_COLOR: &str = "\x1b[0m";

/// Directory under the home directory holding the configuration
pub(crate) const CONFIG_DIR: &str = ".pinnacle";
/// Name of the configuration file
pub(crate) const CONFIG_FILE: &str = "config.json";
/// Prefix of environment variables overriding configuration values
pub(crate) const ENV_PREFIX: &str = "PINNACLE_";

/// Names accepted for the `backend` key
pub(crate) const BACKEND_NAMES: [&str; 4] = ["local", "pinata", "nft-storage", "web3-storage"];
/// Keys accepted by `pinnacle config <KEY> <VALUE>`
pub(crate) const CONFIG_KEYS: [&str; 5] =
    ["backend", "token_env_key", "gateway", "gateway_style", "local_api_url"];
