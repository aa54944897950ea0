use std::path::PathBuf;

use clap::Parser;
use pinnacle_common::GatewayStyle;

use crate::{BackendKind, DEFAULT_CID_VERSION};

/// Arguments for the `pin` subcommand
#[derive(Debug, Clone, Parser)]
#[clap(about = "Pin local files to IPFS", override_usage = "pinnacle pin [OPTIONS] <PATH>...")]
pub struct PinArgs {
    /// Files or directories to pin. Directories are pinned file by file.
    #[clap(required = true)]
    pub paths: Vec<PathBuf>,

    /// The backend to pin to. Defaults to the local IPFS daemon.
    #[clap(long, short)]
    pub backend: Option<BackendKind>,

    /// A bearer token for the backend.
    #[clap(long, conflicts_with = "token_env_key")]
    pub token: Option<String>,

    /// The `.env` or environment key holding the backend's bearer token.
    #[clap(long)]
    pub token_env_key: Option<String>,

    /// The CID version to request.
    #[clap(long, default_value_t = DEFAULT_CID_VERSION)]
    pub cid_version: u32,

    /// Overrides the MIME type guessed from each file's extension.
    #[clap(long)]
    pub mimetype: Option<String>,

    /// The registry gateway used to print URLs. Defaults to the backend's own gateway.
    #[clap(long, short)]
    pub gateway: Option<String>,

    /// The gateway URL style.
    #[clap(long)]
    pub gateway_style: Option<GatewayStyle>,

    /// The RPC API URL of the local IPFS daemon.
    #[clap(long)]
    pub local_api_url: Option<String>,

    /// Request timeout in seconds.
    #[clap(long)]
    pub timeout: Option<u64>,
}
