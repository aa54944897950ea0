use pinnacle_common::{BackendConfig, BearerAuth, PinError, Result};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::{HttpRequest, RequestBody};

/// Builds a POST to `endpoint` on the configured backend, applying the config's default query
/// parameters, headers and bearer authentication.
pub(crate) fn build_post(
    config: &BackendConfig,
    endpoint: &str,
    body: RequestBody,
) -> Result<HttpRequest> {
    let mut request = HttpRequest::post(config.endpoint_url(endpoint)?, body);
    for (name, value) in &config.query {
        request = request.with_query(name.clone(), value);
    }
    for (name, value) in &config.headers {
        request = request.with_header(name.clone(), value.clone());
    }
    if let Some(authorization) = config.auth().and_then(BearerAuth::header_value) {
        request = request.with_header("Authorization", authorization);
    }

    debug!("built POST {} ({} query params)", request.url, request.query.len());
    Ok(request)
}

/// Fails unless the CID extracted from a response is non-empty.
pub(crate) fn require_cid(backend: &'static str, cid: &str) -> Result<()> {
    if cid.trim().is_empty() {
        return Err(PinError::schema(backend, "CID is empty"));
    }
    Ok(())
}

/// Fails unless a declared-positive field is positive.
pub(crate) fn require_positive<T>(backend: &'static str, field: &str, value: T) -> Result<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(PinError::schema(backend, format!("{field} must be positive, got {value}")));
    }
    Ok(())
}

/// Deserializes an unsigned integer given either as a JSON number or as a decimal string, as
/// the IPFS RPC API does for sizes.
pub(crate) fn u64_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Optional counterpart of [`u64_from_number_or_string`].
pub(crate) fn opt_u64_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "u64_from_number_or_string")] u64);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(n)| n))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sizes {
        #[serde(deserialize_with = "u64_from_number_or_string")]
        size: u64,
        #[serde(default, deserialize_with = "opt_u64_from_number_or_string")]
        bytes: Option<u64>,
    }

    #[test]
    fn test_build_post_applies_config() {
        let mut config = BackendConfig::pinata()
            .with_header("x-extra", "1")
            .with_query("pinned", "yes");
        config.set_auth(BearerAuth::new("JWT")).unwrap();

        let request = build_post(&config, "pinning/pinFileToIPFS", RequestBody::Empty).unwrap();
        assert_eq!(request.url, "https://api.pinata.cloud/pinning/pinFileToIPFS");
        assert_eq!(request.header("authorization"), Some("Bearer JWT"));
        assert_eq!(request.header("x-extra"), Some("1"));
        assert_eq!(request.query_param("pinned"), Some("yes"));
    }

    #[test]
    fn test_build_post_without_auth() {
        let request = build_post(&BackendConfig::local(), "add", RequestBody::Empty).unwrap();

        assert_eq!(request.header("authorization"), None);
        assert!(matches!(
            build_post(&BackendConfig::local(), "", RequestBody::Empty),
            Err(PinError::EmptyEndpoint)
        ));
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("test", "Size", 311u64).is_ok());
        assert!(require_positive("test", "Size", 0u64).is_err());
        assert!(require_positive("test", "PinSize", -1i64).is_err());
        assert!(require_positive("test", "size", 0.5f64).is_ok());
    }

    #[test]
    fn test_require_cid() {
        assert!(require_cid("test", "bafy").is_ok());
        assert!(require_cid("test", "").is_err());
        assert!(require_cid("test", "  ").is_err());
    }

    #[test]
    fn test_number_or_string() {
        let sized: Sizes = serde_json::from_str(r#"{"size": 311}"#).unwrap();
        assert_eq!(sized.size, 311);
        assert_eq!(sized.bytes, None);

        let sized: Sizes = serde_json::from_str(r#"{"size": "311", "bytes": "12"}"#).unwrap();
        assert_eq!(sized.size, 311);
        assert_eq!(sized.bytes, Some(12));

        assert!(serde_json::from_str::<Sizes>(r#"{"size": "big"}"#).is_err());
        assert!(serde_json::from_str::<Sizes>(r#"{"size": -3}"#).is_err());
    }
}
