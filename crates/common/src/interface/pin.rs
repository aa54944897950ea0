use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider-specific metadata attached to a [`Pin`], e.g. size, timestamp or duplicate flag.
pub type PinMeta = Map<String, Value>;

/// The normalized result of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// The CID returned by the backend
    pub cid: String,
    /// Display name of the pinned data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Everything else the backend reported about the pin
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: PinMeta,
}

impl Pin {
    /// Creates a new [`Pin`] with no metadata.
    pub fn new(cid: impl Into<String>, name: Option<String>) -> Self {
        Self { cid: cid.into(), name, meta: PinMeta::new() }
    }

    /// Sets the metadata bag to every field of `response` except those in `exclude`.
    ///
    /// `response` must serialize to a JSON object; anything else yields an empty bag.
    pub fn with_meta_from<T: Serialize>(mut self, response: &T, exclude: &[&str]) -> Self {
        if let Ok(Value::Object(mut fields)) = serde_json::to_value(response) {
            fields.retain(|key, value| !exclude.contains(&key.as_str()) && !value.is_null());
            self.meta = fields;
        }
        self
    }
}
