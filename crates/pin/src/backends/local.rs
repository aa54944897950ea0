use pinnacle_common::{BackendConfig, Content, DaemonProbe, Pin, PinError, Result, SystemProbe};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Backend;
use crate::{
    request::{build_post, opt_u64_from_number_or_string, require_cid, require_positive, u64_from_number_or_string},
    HttpRequest, HttpResponse, RequestBody,
};

const NAME: &str = "local";
const ADD_ENDPOINT: &str = "add";

/// Body returned by the daemon's `add` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalAddResponse {
    /// Name of the added file
    pub name: String,
    /// CID of the added file
    pub hash: String,
    /// Size of the DAG in bytes
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub size: u64,
    /// Bytes processed, only reported with progress enabled
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_u64_from_number_or_string")]
    pub bytes: Option<u64>,
}

/// Pins to a local IPFS daemon through its RPC API.
///
/// The daemon never takes credentials, and the process table is probed before every upload so
/// a missing daemon fails fast instead of as a connection error.
#[derive(Debug, Clone)]
pub struct LocalPin<P = SystemProbe> {
    config: BackendConfig,
    probe: P,
}

impl LocalPin {
    /// Creates a [`LocalPin`] against the default daemon address.
    pub fn new() -> Self {
        Self::with_config(BackendConfig::local())
    }

    /// Creates a [`LocalPin`] with a custom configuration.
    pub fn with_config(config: BackendConfig) -> Self {
        if !config.is_authless() {
            warn!("local daemon config at {} is not authless", config.base_url);
        }
        Self { config, probe: SystemProbe }
    }

    /// Creates a [`LocalPin`] against a daemon API at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_config(BackendConfig::authless(base_url))
    }
}

impl Default for LocalPin {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> LocalPin<P> {
    /// Replaces the daemon probe.
    pub fn with_probe<Q: DaemonProbe>(self, probe: Q) -> LocalPin<Q> {
        LocalPin { config: self.config, probe }
    }
}

impl<P: DaemonProbe> Backend for LocalPin<P> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut BackendConfig {
        &mut self.config
    }

    fn precondition(&self) -> Result<()> {
        if !self.probe.is_local_daemon_active() {
            return Err(PinError::DaemonNotRunning);
        }
        Ok(())
    }

    fn request(&self, content: &Content, cid_version: u32) -> Result<HttpRequest> {
        let body = RequestBody::Multipart { file: content.prepare_multipart(false)?, fields: Vec::new() };
        Ok(build_post(&self.config, ADD_ENDPOINT, body)?.with_query("cid-version", cid_version))
    }

    fn parse(&self, content: &mut Content, response: HttpResponse) -> Result<Pin> {
        let response: LocalAddResponse = response.json(NAME)?;
        require_cid(NAME, &response.hash)?;
        require_positive(NAME, "Size", response.size)?;

        content.mark_pinned(&response.hash);
        Ok(Pin::new(&response.hash, Some(response.name.clone())).with_meta_from(&response, &["Hash"]))
    }
}
