use std::path::PathBuf;

use pinnacle_common::{BearerAuth, Content, Pin, PinError, Result};
use tracing::{debug, info};

use crate::{Backend, BlockingTransport, Transport};

/// Drives one [`Backend`] over one transport: attaches authentication, then runs each upload
/// through precondition, request, parse and attach.
///
/// `add` is available when `T` is a [`Transport`] and `add_blocking` when it is a
/// [`BlockingTransport`]; both go through the same backend logic. Nothing is retried.
#[derive(Debug, Clone)]
pub struct Pinner<B, T> {
    backend: B,
    transport: T,
}

impl<B: Backend, T> Pinner<B, T> {
    /// Creates a new [`Pinner`]
    pub fn new(backend: B, transport: T) -> Self {
        Self { backend, transport }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The wrapped transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the backend refuses credentials.
    pub fn is_authless(&self) -> bool {
        self.backend.config().is_authless()
    }

    /// Attaches `token` as bearer authentication.
    pub fn authenticate_with_token(&mut self, token: impl Into<String>) -> Result<()> {
        self.backend.config_mut().set_auth(BearerAuth::new(token))
    }

    /// Resolves the token stored under `key` (`.env` first, then the process environment) and
    /// attaches it. Authless backends are rejected before anything is looked up.
    pub fn authenticate_with_env(&mut self, key: &str) -> Result<()> {
        if self.is_authless() {
            return Err(PinError::AuthlessBackend(self.backend.config().base_url.clone()));
        }

        let auth = BearerAuth::from_env(key)?;
        debug!("resolved {} token from {}", self.backend.name(), key);
        self.backend.config_mut().set_auth(auth)
    }

    /// [`Pinner::authenticate_with_env`] with the backend's conventional key.
    pub fn authenticate_from_default_env(&mut self) -> Result<()> {
        if self.is_authless() {
            return Err(PinError::AuthlessBackend(self.backend.config().base_url.clone()));
        }

        let key = self
            .backend
            .config()
            .token_key()
            .ok_or(PinError::MissingConfiguration("token_key"))?
            .to_string();
        self.authenticate_with_env(&key)
    }

    fn log_pin(&self, content: &Content, pin: &Pin) {
        info!("pinned {} to {} as {}", content.path().display(), self.backend.name(), pin.cid);
    }
}

impl<B: Backend, T: Transport> Pinner<B, T> {
    /// Uploads already-open `content` and marks it pinned.
    pub async fn add(&self, content: &mut Content, cid_version: u32) -> Result<Pin> {
        self.backend.precondition()?;

        let request = self.backend.request(content, cid_version)?;
        debug!("uploading {} to {}", content.basename(), request.url);
        let response = self.transport.send(request).await?;

        let pin = self.backend.parse(content, response)?;
        self.log_pin(content, &pin);
        Ok(pin)
    }

    /// Opens `content`, uploads it, and closes it again whatever the outcome.
    pub async fn pin_content(&self, content: &mut Content, cid_version: u32) -> Result<Pin> {
        let mut guard = content.open_scoped_async().await?;
        self.add(&mut guard, cid_version).await
    }

    /// Pins the file at `path`, returning the closed and pinned [`Content`] with its [`Pin`].
    pub async fn pin_path(&self, path: impl Into<PathBuf>, cid_version: u32) -> Result<(Content, Pin)> {
        let mut content = Content::new(path);
        let pin = self.pin_content(&mut content, cid_version).await?;
        Ok((content, pin))
    }
}

impl<B: Backend, T: BlockingTransport> Pinner<B, T> {
    /// Blocking counterpart of [`Pinner::add`].
    pub fn add_blocking(&self, content: &mut Content, cid_version: u32) -> Result<Pin> {
        self.backend.precondition()?;

        let request = self.backend.request(content, cid_version)?;
        debug!("uploading {} to {}", content.basename(), request.url);
        let response = self.transport.send_blocking(request)?;

        let pin = self.backend.parse(content, response)?;
        self.log_pin(content, &pin);
        Ok(pin)
    }

    /// Blocking counterpart of [`Pinner::pin_content`].
    pub fn pin_content_blocking(&self, content: &mut Content, cid_version: u32) -> Result<Pin> {
        let mut guard = content.open_scoped()?;
        self.add_blocking(&mut guard, cid_version)
    }

    /// Blocking counterpart of [`Pinner::pin_path`].
    pub fn pin_path_blocking(&self, path: impl Into<PathBuf>, cid_version: u32) -> Result<(Content, Pin)> {
        let mut content = Content::new(path);
        let pin = self.pin_content_blocking(&mut content, cid_version)?;
        Ok((content, pin))
    }
}

#[cfg(test)]
mod tests {
    use pinnacle_common::GatewayStyle;
    use serde_json::json;

    use super::*;
    use crate::{test_utils::*, LocalPin, NftStorage, Pinata, RequestBody, Web3Storage, DEFAULT_CID_VERSION};

    fn local_response() -> RecordingTransport {
        RecordingTransport::json(json!({ "Hash": "bafkreiXYZ", "Name": "han.png", "Size": 311 }))
    }

    #[tokio::test]
    async fn test_local_round_trip() {
        let (_dir, path) = fixture("han.png", b"ascii fixture bytes");
        let pinner = Pinner::new(LocalPin::new().with_probe(|| true), local_response());

        let (content, pin) = pinner.pin_path(&path, DEFAULT_CID_VERSION).await.unwrap();
        assert_eq!(pin.cid, "bafkreiXYZ");
        assert_eq!(content.cid(), Some("bafkreiXYZ"));
        assert!(!content.is_open());
        assert_eq!(content.uri().unwrap(), "ipfs://bafkreiXYZ");
        assert_eq!(
            content.gateway_url("local", GatewayStyle::Path).unwrap(),
            "http://127.0.0.1:8080/ipfs/bafkreiXYZ/"
        );

        let requests = pinner.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query_param("cid-version"), Some("1"));
        match &requests[0].body {
            RequestBody::Multipart { file, .. } => assert_eq!(file.bytes, b"ascii fixture bytes"),
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inactive_daemon_sends_nothing() {
        let (_dir, mut content) = opened_content();
        let pinner = Pinner::new(LocalPin::new().with_probe(|| false), local_response());

        assert!(matches!(pinner.add(&mut content, 1).await, Err(PinError::DaemonNotRunning)));
        assert!(pinner.transport().requests().is_empty());
        assert!(!content.is_pinned());
    }

    #[tokio::test]
    async fn test_add_requires_open_content() {
        let (_dir, path) = fixture("han.png", b"fixture");
        let mut content = Content::new(path);
        let pinner = Pinner::new(LocalPin::new().with_probe(|| true), local_response());

        assert!(matches!(pinner.add(&mut content, 1).await, Err(PinError::NotLoaded(_))));
        assert!(pinner.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_still_closes_content() {
        let (_dir, path) = fixture("han.png", b"fixture");
        let mut content = Content::new(path);
        let pinner = Pinner::new(Pinata::new(), RecordingTransport::new(500, "boom"));

        let result = pinner.pin_content(&mut content, 1).await;
        assert!(matches!(result, Err(PinError::Status { status: 500, .. })));
        assert!(!content.is_open());
        assert!(!content.is_pinned());
    }

    #[tokio::test]
    async fn test_every_backend_marks_content_pinned() {
        let pinata = Pinner::new(
            Pinata::new(),
            RecordingTransport::json(
                json!({ "IpfsHash": CID, "PinSize": 12, "Timestamp": "2024-05-11T09:30:00Z" }),
            ),
        );
        let nft = Pinner::new(
            NftStorage::new(),
            RecordingTransport::json(json!({ "ok": true, "value": { "cid": CID } })),
        );
        let web3 = Pinner::new(
            Web3Storage::new(),
            RecordingTransport::json(json!({ "cid": CID, "carCid": "bagbaiera" })),
        );

        let (_dir, path) = fixture("han.png", b"fixture");
        assert_eq!(pinata.pin_path(&path, 1).await.unwrap().0.cid(), Some(CID));
        assert_eq!(nft.pin_path(&path, 1).await.unwrap().0.cid(), Some(CID));
        assert_eq!(web3.pin_path(&path, 1).await.unwrap().0.cid(), Some(CID));
    }

    #[test]
    fn test_blocking_matches_async() {
        let (_dir, path) = fixture("han.png", b"fixture");
        let pinner = Pinner::new(LocalPin::new().with_probe(|| true), local_response());

        let (content, pin) = pinner.pin_path_blocking(&path, 0).unwrap();
        assert_eq!(pin.cid, "bafkreiXYZ");
        assert!(content.is_pinned());
        assert!(!content.is_open());
        assert_eq!(pinner.transport().requests()[0].query_param("cid-version"), Some("0"));
    }

    #[test]
    fn test_authless_rejects_any_authentication() {
        let mut pinner = Pinner::new(LocalPin::new(), local_response());

        assert!(pinner.is_authless());
        assert!(matches!(pinner.authenticate_with_token("JWT"), Err(PinError::AuthlessBackend(_))));
        assert!(matches!(pinner.authenticate_with_token(""), Err(PinError::AuthlessBackend(_))));
        assert!(matches!(pinner.authenticate_with_env("PATH"), Err(PinError::AuthlessBackend(_))));
        assert!(matches!(pinner.authenticate_from_default_env(), Err(PinError::AuthlessBackend(_))));
    }

    #[test]
    fn test_token_reaches_request() {
        let (_dir, mut content) = opened_content();
        let mut pinner = Pinner::new(Pinata::new(), RecordingTransport::new(401, "unauthorized"));
        pinner.authenticate_with_token("JWT").unwrap();

        assert!(pinner.add_blocking(&mut content, 1).is_err());
        assert_eq!(pinner.transport().requests()[0].header("authorization"), Some("Bearer JWT"));
    }

    #[test]
    fn test_authenticate_with_env() {
        std::env::set_var("PINNACLE_PINNER_TEST_JWT", "from-process");
        let mut pinner = Pinner::new(Web3Storage::new(), local_response());

        pinner.authenticate_with_env("PINNACLE_PINNER_TEST_JWT").unwrap();
        assert_eq!(pinner.backend().config().auth().and_then(BearerAuth::token), Some("from-process"));
        assert!(matches!(
            pinner.authenticate_with_env("PINNACLE_PINNER_TEST_MISSING"),
            Err(PinError::AuthKeyNotFound(_))
        ));
    }
}
