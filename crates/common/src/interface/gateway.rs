use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{PinError, Result};

/// Gateway names known to [`Gateway::named`], in display order.
pub const GATEWAY_NAMES: [&str; 6] = ["local", "localhost", "ipfs", "nftstorage", "w3s", "pinata"];

/// URL scheme used by a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain http
    Http,
    /// TLS
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// How the CID is placed in a gateway URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStyle {
    /// `scheme://host/ipfs/<cid>/`
    #[default]
    Path,
    /// `scheme://<cid>.ipfs.host/`
    Subdomain,
}

impl fmt::Display for GatewayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayStyle::Path => write!(f, "path"),
            GatewayStyle::Subdomain => write!(f, "subdomain"),
        }
    }
}

impl FromStr for GatewayStyle {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "path" => Ok(GatewayStyle::Path),
            "subdomain" => Ok(GatewayStyle::Subdomain),
            _ => Err(PinError::InvalidGatewayStyle(s.to_string())),
        }
    }
}

/// An HTTP gateway able to serve IPFS content by CID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    /// Host (and optional port) of the gateway, without scheme
    pub host: String,
    /// Whether `<cid>.ipfs.<host>` addressing is supported
    pub subdomain_supported: bool,
    /// Scheme used to reach the gateway
    pub scheme: Scheme,
}

impl Gateway {
    /// Creates a new [`Gateway`]
    pub fn new(host: impl Into<String>, subdomain_supported: bool, scheme: Scheme) -> Self {
        Self { host: host.into(), subdomain_supported, scheme }
    }

    /// Looks up a gateway from the built-in registry.
    pub fn named(name: &str) -> Result<Self> {
        let gateway = match name {
            "local" | "local_ip" => Self::new("127.0.0.1:8080", false, Scheme::Http),
            "localhost" => Self::new("localhost:8080", true, Scheme::Http),
            "ipfs" => Self::new("ipfs.io", true, Scheme::Https),
            "nftstorage" => Self::new("nftstorage.link", true, Scheme::Https),
            "w3s" => Self::new("w3s.link", true, Scheme::Https),
            "pinata" => Self::new("gateway.pinata.cloud", false, Scheme::Https),
            _ => {
                return Err(PinError::UnknownGateway {
                    name: name.to_string(),
                    suggestion: closest_gateway_name(name),
                })
            }
        };

        Ok(gateway)
    }

    /// `scheme://host/ipfs/<cid>/`
    pub fn path_url(&self, cid: &str) -> String {
        format!("{}://{}/ipfs/{}/", self.scheme, self.host, cid)
    }

    /// `scheme://<cid>.ipfs.host/`, if the gateway supports it.
    pub fn subdomain_url(&self, cid: &str) -> Result<String> {
        if !self.subdomain_supported {
            return Err(PinError::UnsupportedSubdomain(self.host.clone()));
        }

        Ok(format!("{}://{}.ipfs.{}/", self.scheme, cid, self.host))
    }

    /// Renders the URL for `cid` in the requested style.
    pub fn url(&self, cid: &str, style: GatewayStyle) -> Result<String> {
        match style {
            GatewayStyle::Path => Ok(self.path_url(cid)),
            GatewayStyle::Subdomain => self.subdomain_url(cid),
        }
    }
}

/// Finds the registered gateway name closest to `name`, if it is a plausible typo.
fn closest_gateway_name(name: &str) -> Option<String> {
    GATEWAY_NAMES
        .iter()
        .map(|candidate| (candidate, strsim::normalized_levenshtein(name, candidate)))
        .filter(|(_, score)| *score >= 0.5)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID: &str = "bafkreifjjcie6lypi6ny7amxnfftagclbuxndqonfipmb64f2km2devei4";

    #[test]
    fn test_path_url() {
        let http = Gateway::new("test", true, Scheme::Http);
        let https = Gateway::new("test", true, Scheme::Https);

        assert_eq!(http.path_url(CID), format!("http://test/ipfs/{CID}/"));
        assert_eq!(https.path_url(CID), format!("https://test/ipfs/{CID}/"));
    }

    #[test]
    fn test_subdomain_url() {
        let http = Gateway::new("test", true, Scheme::Http);
        let https = Gateway::new("test", true, Scheme::Https);

        assert_eq!(http.subdomain_url(CID).unwrap(), format!("http://{CID}.ipfs.test/"));
        assert_eq!(https.subdomain_url(CID).unwrap(), format!("https://{CID}.ipfs.test/"));
    }

    #[test]
    fn test_subdomain_unsupported() {
        let gateway = Gateway::new("test", false, Scheme::Http);

        assert!(matches!(
            gateway.url(CID, GatewayStyle::Subdomain),
            Err(PinError::UnsupportedSubdomain(host)) if host == "test"
        ));
        assert_eq!(gateway.url(CID, GatewayStyle::Path).unwrap(), format!("http://test/ipfs/{CID}/"));
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("path".parse::<GatewayStyle>().unwrap(), GatewayStyle::Path);
        assert_eq!("subdomain".parse::<GatewayStyle>().unwrap(), GatewayStyle::Subdomain);
        assert!(matches!(
            "none".parse::<GatewayStyle>(),
            Err(PinError::InvalidGatewayStyle(s)) if s == "none"
        ));
    }

    #[test]
    fn test_registry() {
        assert_eq!(Gateway::named("local").unwrap().path_url("x"), "http://127.0.0.1:8080/ipfs/x/");
        assert_eq!(Gateway::named("local_ip").unwrap(), Gateway::named("local").unwrap());
        assert_eq!(
            Gateway::named("localhost").unwrap().subdomain_url("x").unwrap(),
            "http://x.ipfs.localhost:8080/"
        );
        assert!(Gateway::named("pinata").unwrap().subdomain_url("x").is_err());

        for name in GATEWAY_NAMES {
            assert!(Gateway::named(name).is_ok(), "{name} should be registered");
        }
    }

    #[test]
    fn test_unknown_gateway_suggests_closest() {
        match Gateway::named("pinta") {
            Err(PinError::UnknownGateway { name, suggestion }) => {
                assert_eq!(name, "pinta");
                assert_eq!(suggestion.as_deref(), Some("pinata"));
            }
            other => panic!("expected unknown gateway, got {other:?}"),
        }

        assert!(matches!(
            Gateway::named("zzzzzzzzzzzz"),
            Err(PinError::UnknownGateway { suggestion: None, .. })
        ));
    }
}
