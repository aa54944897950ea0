use pinnacle_common::{BackendConfig, Content, Pin, Result};
use serde::{Deserialize, Serialize};

use super::Backend;
use crate::{
    request::{build_post, require_cid},
    HttpRequest, HttpResponse, RequestBody,
};

const NAME: &str = "web3.storage";
const UPLOAD_ENDPOINT: &str = "upload";

/// Body returned by Web3.Storage's `upload` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Web3StorageAddResponse {
    /// Root CID of the upload
    pub cid: String,
    /// CID of the CAR the upload was packed into
    pub car_cid: String,
}

/// Pins through Web3.Storage's `upload` endpoint.
#[derive(Debug, Clone)]
pub struct Web3Storage {
    config: BackendConfig,
}

impl Web3Storage {
    /// Creates a [`Web3Storage`] backend against the public API.
    pub fn new() -> Self {
        Self::with_config(BackendConfig::web3_storage())
    }

    /// Creates a [`Web3Storage`] backend with a custom configuration.
    pub fn with_config(config: BackendConfig) -> Self {
        Self { config }
    }
}

impl Default for Web3Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Web3Storage {
    fn name(&self) -> &'static str {
        NAME
    }

    fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut BackendConfig {
        &mut self.config
    }

    fn request(&self, content: &Content, _cid_version: u32) -> Result<HttpRequest> {
        let body = RequestBody::Multipart { file: content.prepare_multipart(false)?, fields: Vec::new() };
        build_post(&self.config, UPLOAD_ENDPOINT, body)
    }

    fn parse(&self, content: &mut Content, response: HttpResponse) -> Result<Pin> {
        let response: Web3StorageAddResponse = response.json(NAME)?;
        require_cid(NAME, &response.cid)?;

        content.mark_pinned(&response.cid);
        Ok(Pin::new(&response.cid, Some(content.basename())).with_meta_from(&response, &["cid"]))
    }
}
