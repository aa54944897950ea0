use pinnacle_common::{urljoin, BackendConfig, Content, Pin, PinError, Result};
use serde_json::Value;

use super::Backend;
use crate::{
    request::{build_post, require_cid},
    HttpRequest, HttpResponse, RequestBody,
};

const NAME: &str = "custom";
const DEFAULT_CID_POINTER: &str = "/cid";

/// How a [`CustomPin`] sends the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Raw request body with the file's MIME type as `Content-Type`
    Raw,
    /// `multipart/form-data` with a `file` part
    Multipart {
        /// Whether the part carries the file's MIME type
        include_mimetype: bool,
    },
}

impl Default for PayloadShape {
    fn default() -> Self {
        PayloadShape::Multipart { include_mimetype: false }
    }
}

/// Builder of a [`CustomPin`]. There is no default service, so a base URL is required.
#[derive(Debug, Clone, Default)]
pub struct CustomPinBuilder {
    base_url: Option<String>,
    endpoint: String,
    payload: PayloadShape,
    cid_pointer: Option<String>,
    token_key: Option<String>,
    authless: bool,
    cid_version_query: Option<String>,
    headers: Vec<(String, String)>,
}

impl CustomPinBuilder {
    /// Starts a builder uploading to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), ..Default::default() }
    }

    /// Sets the service base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the payload shape. Defaults to multipart without MIME type.
    pub fn payload(mut self, payload: PayloadShape) -> Self {
        self.payload = payload;
        self
    }

    /// Sets the JSON pointer of the CID in the response, `/cid` by default.
    pub fn cid_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.cid_pointer = Some(pointer.into());
        self
    }

    /// Sets the environment key the service's token is stored under.
    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = Some(key.into());
        self
    }

    /// Marks the service as refusing credentials.
    pub fn authless(mut self) -> Self {
        self.authless = true;
        self
    }

    /// Sends the requested CID version as query parameter `name`.
    pub fn cid_version_query(mut self, name: impl Into<String>) -> Self {
        self.cid_version_query = Some(name.into());
        self
    }

    /// Adds a header sent with every upload.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Validates the description and builds the backend.
    pub fn build(self) -> Result<CustomPin> {
        let base_url = self.base_url.ok_or(PinError::MissingConfiguration("base_url"))?;
        // fails early on an endpoint that collapses to nothing
        urljoin(&base_url, &self.endpoint)?;

        let mut config =
            if self.authless { BackendConfig::authless(base_url) } else { BackendConfig::new(base_url) };
        if let Some(key) = self.token_key {
            config = config.with_token_key(key);
        }
        for (name, value) in self.headers {
            config = config.with_header(name, value);
        }

        let cid_pointer = match self.cid_pointer {
            Some(pointer) if pointer.starts_with('/') => pointer,
            Some(pointer) => format!("/{pointer}"),
            None => DEFAULT_CID_POINTER.to_string(),
        };

        Ok(CustomPin {
            config,
            endpoint: self.endpoint,
            payload: self.payload,
            cid_pointer,
            cid_version_query: self.cid_version_query,
        })
    }
}

/// A backend described entirely by its caller: endpoint, payload shape and where the response
/// keeps the CID.
#[derive(Debug, Clone)]
pub struct CustomPin {
    config: BackendConfig,
    endpoint: String,
    payload: PayloadShape,
    cid_pointer: String,
    cid_version_query: Option<String>,
}

impl CustomPin {
    /// Starts a [`CustomPinBuilder`] for `endpoint`.
    pub fn builder(endpoint: impl Into<String>) -> CustomPinBuilder {
        CustomPinBuilder::new(endpoint)
    }

    /// JSON pointer of the CID in the response.
    pub fn cid_pointer(&self) -> &str {
        &self.cid_pointer
    }
}

impl Backend for CustomPin {
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
        let body = match self.payload {
            PayloadShape::Raw => RequestBody::Raw(content.prepare_raw_body()?),
            PayloadShape::Multipart { include_mimetype } => {
                RequestBody::Multipart { file: content.prepare_multipart(include_mimetype)?, fields: Vec::new() }
            }
        };

        let request = build_post(&self.config, &self.endpoint, body)?;
        Ok(match &self.cid_version_query {
            Some(name) => request.with_query(name.clone(), cid_version),
            None => request,
        })
    }

    fn parse(&self, content: &mut Content, response: HttpResponse) -> Result<Pin> {
        let mut response: Value = response.json(NAME)?;
        let cid = match response.pointer(&self.cid_pointer) {
            Some(Value::String(cid)) => cid.clone(),
            Some(other) => {
                return Err(PinError::schema(NAME, format!("{} is not a string: {other}", self.cid_pointer)))
            }
            None => return Err(PinError::schema(NAME, format!("{} is missing", self.cid_pointer))),
        };
        require_cid(NAME, &cid)?;

        remove_pointer(&mut response, &self.cid_pointer);
        content.mark_pinned(&cid);
        Ok(Pin::new(cid, Some(content.basename())).with_meta_from(&response, &[]))
    }
}

/// Removes the object member `pointer` refers to, if its parent is an object.
fn remove_pointer(value: &mut Value, pointer: &str) {
    let Some((parent, leaf)) = pointer.rsplit_once('/') else { return };
    let leaf = leaf.replace("~1", "/").replace("~0", "~");

    if let Some(Value::Object(parent)) = value.pointer_mut(parent) {
        parent.remove(&leaf);
    }
}
