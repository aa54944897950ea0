use chrono::{DateTime, Utc};
use pinnacle_common::{BackendConfig, Content, Pin, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Backend;
use crate::{
    request::{build_post, require_cid, require_positive},
    HttpRequest, HttpResponse, RequestBody,
};

const NAME: &str = "pinata";
const PIN_FILE_ENDPOINT: &str = "pinning/pinFileToIPFS";
const OPTIONS_FIELD: &str = "pinataOptions";

/// Body returned by `pinning/pinFileToIPFS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinataAddResponse {
    /// CID of the pinned file
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    /// Size of the pinned DAG in bytes
    #[serde(rename = "PinSize")]
    pub pin_size: i64,
    /// When the pin was created
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Set when the same content was already pinned on the account
    #[serde(rename = "isDuplicate", default, skip_serializing_if = "Option::is_none")]
    pub is_duplicate: Option<bool>,
}

/// Pins through Pinata's `pinFileToIPFS` endpoint using a JWT bearer token.
#[derive(Debug, Clone)]
pub struct Pinata {
    config: BackendConfig,
}

impl Pinata {
    /// Creates a [`Pinata`] backend against the public API.
    pub fn new() -> Self {
        Self::with_config(BackendConfig::pinata())
    }

    /// Creates a [`Pinata`] backend with a custom configuration.
    pub fn with_config(config: BackendConfig) -> Self {
        Self { config }
    }
}

impl Default for Pinata {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Pinata {
    fn name(&self) -> &'static str {
        NAME
    }

    fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut BackendConfig {
        &mut self.config
    }

    fn request(&self, content: &Content, cid_version: u32) -> Result<HttpRequest> {
        let options = json!({ "cidVersion": cid_version }).to_string();
        let body = RequestBody::Multipart {
            file: content.prepare_multipart(false)?,
            fields: vec![(OPTIONS_FIELD.to_string(), options)],
        };
        build_post(&self.config, PIN_FILE_ENDPOINT, body)
    }

    fn parse(&self, content: &mut Content, response: HttpResponse) -> Result<Pin> {
        let response: PinataAddResponse = response.json(NAME)?;
        require_cid(NAME, &response.ipfs_hash)?;
        require_positive(NAME, "PinSize", response.pin_size)?;

        content.mark_pinned(&response.ipfs_hash);
        Ok(Pin::new(&response.ipfs_hash, Some(content.basename())).with_meta_from(&response, &["IpfsHash"]))
    }
}
