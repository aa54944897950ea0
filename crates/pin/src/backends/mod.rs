//! Pinning backends.
//!
//! Every backend is a strategy object implementing [`Backend`]: it checks its preconditions,
//! describes the upload request, and turns the response into a [`Pin`]. Sending the request is
//! left to a [`crate::Transport`] so the same backend serves async and blocking callers.

use std::fmt;

use clap::ValueEnum;
use pinnacle_common::{BackendConfig, Content, Pin, Result};
use serde::{Deserialize, Serialize};

use crate::{HttpRequest, HttpResponse};

mod custom;
mod local;
mod nft_storage;
mod pinata;
mod web3_storage;

pub use custom::{CustomPin, CustomPinBuilder, PayloadShape};
pub use local::{LocalAddResponse, LocalPin};
pub use nft_storage::{Nft, NftPinInfo, NftStorage, NftStorageAddResponse};
pub use pinata::{Pinata, PinataAddResponse};
pub use web3_storage::{Web3Storage, Web3StorageAddResponse};

/// CID version requested when the caller does not pick one.
pub const DEFAULT_CID_VERSION: u32 = 1;

/// A pinning service.
pub trait Backend {
    /// Short name used in logs and schema errors.
    fn name(&self) -> &'static str;

    /// The backend's configuration.
    fn config(&self) -> &BackendConfig;

    /// Mutable access to the configuration, used to attach authentication.
    fn config_mut(&mut self) -> &mut BackendConfig;

    /// Checks anything that must hold before a request is sent.
    fn precondition(&self) -> Result<()> {
        Ok(())
    }

    /// Describes the upload of `content`, which must be open.
    fn request(&self, content: &Content, cid_version: u32) -> Result<HttpRequest>;

    /// Validates the upload response, marks `content` pinned and returns the normalized pin.
    fn parse(&self, content: &mut Content, response: HttpResponse) -> Result<Pin>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn config(&self) -> &BackendConfig {
        (**self).config()
    }

    fn config_mut(&mut self) -> &mut BackendConfig {
        (**self).config_mut()
    }

    fn precondition(&self) -> Result<()> {
        (**self).precondition()
    }

    fn request(&self, content: &Content, cid_version: u32) -> Result<HttpRequest> {
        (**self).request(content, cid_version)
    }

    fn parse(&self, content: &mut Content, response: HttpResponse) -> Result<Pin> {
        (**self).parse(content, response)
    }
}

/// The built-in backends, for callers that pick one at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// A local IPFS daemon
    Local,
    /// Pinata
    Pinata,
    /// NFT.Storage
    #[value(name = "nft-storage")]
    NftStorage,
    /// Web3.Storage
    #[value(name = "web3-storage")]
    Web3Storage,
}

impl BackendKind {
    /// Builds the backend with its default configuration.
    pub fn build(self) -> Box<dyn Backend + Send + Sync> {
        match self {
            BackendKind::Local => Box::new(LocalPin::new()),
            BackendKind::Pinata => Box::new(Pinata::new()),
            BackendKind::NftStorage => Box::new(NftStorage::new()),
            BackendKind::Web3Storage => Box::new(Web3Storage::new()),
        }
    }

    /// Builds the backend with `config` instead of its default.
    pub fn build_with_config(self, config: BackendConfig) -> Box<dyn Backend + Send + Sync> {
        match self {
            BackendKind::Local => Box::new(LocalPin::with_config(config)),
            BackendKind::Pinata => Box::new(Pinata::with_config(config)),
            BackendKind::NftStorage => Box::new(NftStorage::with_config(config)),
            BackendKind::Web3Storage => Box::new(Web3Storage::with_config(config)),
        }
    }

    /// The default configuration of this backend.
    pub fn default_config(self) -> BackendConfig {
        match self {
            BackendKind::Local => BackendConfig::local(),
            BackendKind::Pinata => BackendConfig::pinata(),
            BackendKind::NftStorage => BackendConfig::nft_storage(),
            BackendKind::Web3Storage => BackendConfig::web3_storage(),
        }
    }

    /// The registry gateway that serves this backend's content best.
    pub fn default_gateway(self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Pinata => "pinata",
            BackendKind::NftStorage => "nftstorage",
            BackendKind::Web3Storage => "w3s",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Pinata => write!(f, "pinata"),
            BackendKind::NftStorage => write!(f, "nft-storage"),
            BackendKind::Web3Storage => write!(f, "web3-storage"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_builds_matching_backend() {
        assert_eq!(BackendKind::Local.build().name(), "local");
        assert_eq!(BackendKind::Pinata.build().name(), "pinata");
        assert_eq!(BackendKind::NftStorage.build().name(), "nft.storage");
        assert_eq!(BackendKind::Web3Storage.build().name(), "web3.storage");

        assert!(BackendKind::Local.build().config().is_authless());
        assert!(!BackendKind::Pinata.build().config().is_authless());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(BackendKind::from_str("nft-storage", true).unwrap(), BackendKind::NftStorage);
        assert_eq!(BackendKind::from_str("Pinata", true).unwrap(), BackendKind::Pinata);
        assert!(BackendKind::from_str("ipfs", true).is_err());
    }

    #[test]
    fn test_display_round_trips_through_value_enum() {
        for kind in BackendKind::value_variants() {
            assert_eq!(BackendKind::from_str(&kind.to_string(), false).unwrap(), *kind);
        }
    }
}
