use chrono::{DateTime, Utc};
use pinnacle_common::{BackendConfig, Content, Pin, PinError, PinMeta, Result};
use serde::{Deserialize, Serialize};

use super::Backend;
use crate::{
    request::{build_post, require_cid, require_positive},
    HttpRequest, HttpResponse, RequestBody,
};

const NAME: &str = "nft.storage";
const UPLOAD_ENDPOINT: &str = "upload";

/// Body returned by NFT.Storage's `upload` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftStorageAddResponse {
    /// Whether the upload succeeded
    pub ok: bool,
    /// The stored object
    pub value: Nft,
}

/// An object stored on NFT.Storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    /// Root CID
    pub cid: String,
    /// Size in bytes, if already known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Type of the stored object, e.g. `image/png`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Name of the API key scope the upload was made with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Pinning status of the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<NftPinInfo>,
    /// Fields without a typed counterpart, such as `files` and `deals`
    #[serde(flatten)]
    pub extra: PinMeta,
}

/// The `pin` object nested in an [`Nft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftPinInfo {
    /// Pinned CID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    /// Name the object was pinned under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pin status, e.g. `pinned` or `queued`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Creation time of the pin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

/// Pins through NFT.Storage's `upload` endpoint, which takes the file as the raw request body.
#[derive(Debug, Clone)]
pub struct NftStorage {
    config: BackendConfig,
}

impl NftStorage {
    /// Creates a [`NftStorage`] backend against the public API.
    pub fn new() -> Self {
        Self::with_config(BackendConfig::nft_storage())
    }

    /// Creates a [`NftStorage`] backend with a custom configuration.
    pub fn with_config(config: BackendConfig) -> Self {
        Self { config }
    }
}

impl Default for NftStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for NftStorage {
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
        build_post(&self.config, UPLOAD_ENDPOINT, RequestBody::Raw(content.prepare_raw_body()?))
    }

    fn parse(&self, content: &mut Content, response: HttpResponse) -> Result<Pin> {
        let response: NftStorageAddResponse = response.json(NAME)?;
        if !response.ok {
            return Err(PinError::schema(NAME, "upload reported ok=false"));
        }

        let nft = response.value;
        require_cid(NAME, &nft.cid)?;
        if let Some(size) = nft.size {
            require_positive(NAME, "size", size)?;
        }

        content.mark_pinned(&nft.cid);
        let name = nft.pin.as_ref().and_then(|pin| pin.name.clone()).unwrap_or_else(|| content.basename());
        Ok(Pin::new(&nft.cid, Some(name)).with_meta_from(&nft, &["cid"]))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_request_is_raw_with_content_type() {
        let (_dir, content) = opened_content();

        let request = NftStorage::new().request(&content, 1).unwrap();
        assert_eq!(request.url, "https://api.nft.storage/upload");
        match request.body {
            RequestBody::Raw(raw) => {
                assert_eq!(raw.content_type, "image/png");
                assert_eq!(raw.bytes, content.bytes().unwrap());
            }
            other => panic!("expected raw body, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_uses_nested_pin_name() {
        let (_dir, mut content) = opened_content();
        let body = json!({
            "ok": true,
            "value": {
                "cid": CID,
                "size": 132614,
                "created": "2024-05-11T09:30:00Z",
                "type": "image/png",
                "scope": "default",
                "pin": { "cid": CID, "name": "pin name", "status": "queued" },
                "files": [],
                "deals": []
            }
        });

        let pin = NftStorage::new().parse(&mut content, HttpResponse::new(200, body.to_string())).unwrap();
        assert_eq!(pin.cid, CID);
        assert_eq!(pin.name.as_deref(), Some("pin name"));
        assert_eq!(pin.meta.get("type"), Some(&json!("image/png")));
        assert_eq!(pin.meta.get("files"), Some(&json!([])));
        assert!(!pin.meta.contains_key("cid"));
        assert_eq!(content.cid(), Some(CID));
    }

    #[test]
    fn test_parse_falls_back_to_basename() {
        let (_dir, mut content) = opened_content();
        let body = json!({ "ok": true, "value": { "cid": CID } });

        let pin = NftStorage::new().parse(&mut content, HttpResponse::new(200, body.to_string())).unwrap();
        assert_eq!(pin.name.as_deref(), Some("han.png"));
        assert!(pin.meta.is_empty());
    }

    #[test]
    fn test_parse_rejects_failed_upload() {
        for body in [
            json!({ "ok": false, "value": { "cid": CID } }),
            json!({ "ok": true, "value": { "cid": CID, "size": 0 } }),
            json!({ "ok": true }),
        ] {
            let (_dir, mut content) = opened_content();
            let result = NftStorage::new().parse(&mut content, HttpResponse::new(200, body.to_string()));

            assert!(matches!(result, Err(PinError::Schema { backend: "nft.storage", .. })), "{body}");
            assert!(!content.is_pinned());
        }
    }
}
