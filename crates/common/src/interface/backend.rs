use std::collections::BTreeMap;

use crate::{urljoin, BearerAuth, PinError, Result};

/// Base URL of a local IPFS daemon's RPC API.
pub const LOCAL_SERVICE: &str = "http://127.0.0.1:5001/api/v0";
/// Base URL of the Pinata API.
pub const PINATA_SERVICE: &str = "https://api.pinata.cloud";
/// Base URL of the NFT.Storage API.
pub const NFT_STORAGE_SERVICE: &str = "https://api.nft.storage";
/// Base URL of the Web3.Storage API.
pub const WEB3_STORAGE_SERVICE: &str = "https://api.web3.storage";

/// Conventional environment key holding a Pinata JWT.
pub const PINATA_TOKEN_KEY: &str = "PINATA_JWT";
/// Conventional environment key holding an NFT.Storage token.
pub const NFT_STORAGE_TOKEN_KEY: &str = "NFT_STORAGE_JWT";
/// Conventional environment key holding a Web3.Storage token.
pub const WEB3_STORAGE_TOKEN_KEY: &str = "WEB3_STORAGE_JWT";

/// Static description of how to reach a pinning backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL every endpoint is joined onto
    pub base_url: String,
    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Query parameters sent with every request
    pub query: BTreeMap<String, String>,
    auth: Option<BearerAuth>,
    authless: bool,
    token_key: Option<String>,
}

impl BackendConfig {
    /// Creates a config for a backend that accepts bearer authentication.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            auth: None,
            authless: false,
            token_key: None,
        }
    }

    /// Creates a config for a backend that must never carry credentials.
    pub fn authless(base_url: impl Into<String>) -> Self {
        Self { authless: true, ..Self::new(base_url) }
    }

    /// Default config of a local IPFS daemon.
    pub fn local() -> Self {
        Self::authless(LOCAL_SERVICE)
    }

    /// Default config of Pinata.
    pub fn pinata() -> Self {
        Self::new(PINATA_SERVICE).with_token_key(PINATA_TOKEN_KEY)
    }

    /// Default config of NFT.Storage.
    pub fn nft_storage() -> Self {
        Self::new(NFT_STORAGE_SERVICE).with_token_key(NFT_STORAGE_TOKEN_KEY)
    }

    /// Default config of Web3.Storage.
    pub fn web3_storage() -> Self {
        Self::new(WEB3_STORAGE_SERVICE).with_token_key(WEB3_STORAGE_TOKEN_KEY)
    }

    /// Sets the environment key the backend's token is conventionally stored under.
    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = Some(key.into());
        self
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter sent with every request.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Whether this backend refuses credentials.
    pub fn is_authless(&self) -> bool {
        self.authless
    }

    /// The attached authentication, if any.
    pub fn auth(&self) -> Option<&BearerAuth> {
        self.auth.as_ref()
    }

    /// The conventional environment key of the backend's token.
    pub fn token_key(&self) -> Option<&str> {
        self.token_key.as_deref()
    }

    /// Attaches authentication. Fails on authless backends.
    pub fn set_auth(&mut self, auth: BearerAuth) -> Result<()> {
        if self.authless {
            return Err(PinError::AuthlessBackend(self.base_url.clone()));
        }

        self.auth = Some(auth);
        Ok(())
    }

    /// Full URL of `endpoint` on this backend.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<String> {
        urljoin(&self.base_url, endpoint)
    }
}
