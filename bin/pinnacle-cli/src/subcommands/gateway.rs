use clap::Parser;
use eyre::{eyre, Result};
use pinnacle_common::{Gateway, GatewayStyle, GATEWAY_NAMES};

/// Gateway used when neither the flag nor the configuration names one.
pub(crate) const DEFAULT_GATEWAY: &str = "ipfs";

/// Arguments for the `gateway` subcommand
#[derive(Debug, Clone, Parser)]
#[clap(about = "Print the gateway URL of a CID", override_usage = "pinnacle gateway [OPTIONS] <CID>")]
pub(crate) struct GatewayArgs {
    /// The CID to resolve.
    #[clap(required_unless_present = "list")]
    pub(crate) cid: Option<String>,

    /// The registry gateway to use.
    #[clap(long, short)]
    pub(crate) name: Option<String>,

    /// The URL style.
    #[clap(long, short)]
    pub(crate) style: Option<GatewayStyle>,

    /// List the registry gateways instead.
    #[clap(long, short)]
    pub(crate) list: bool,
}

/// The `gateway` subcommand. Prints the URL of a CID on a registry gateway.
pub(crate) fn gateway(args: GatewayArgs) -> Result<()> {
    if args.list {
        for name in GATEWAY_NAMES {
            let gateway = Gateway::named(name)?;
            let subdomain = if gateway.subdomain_supported { "path, subdomain" } else { "path" };
            println!("{name:<12}{}://{:<24}{subdomain}", gateway.scheme, gateway.host);
        }
        return Ok(());
    }

    println!("{}", resolve(&args)?);
    Ok(())
}

fn resolve(args: &GatewayArgs) -> Result<String> {
    let cid = args.cid.as_deref().map(str::trim).unwrap_or_default();
    if cid.is_empty() {
        return Err(eyre!("a CID is required"));
    }

    let name = args.name.as_deref().unwrap_or(DEFAULT_GATEWAY);
    let gateway = Gateway::named(name).map_err(|e| eyre!("Invalid gateway: {}", e))?;
    gateway.url(cid, args.style.unwrap_or_default()).map_err(|e| eyre!("Failed to build URL: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let args = GatewayArgs::parse_from(["gateway", "bafyXYZ"]);
        assert_eq!(resolve(&args).unwrap(), "https://ipfs.io/ipfs/bafyXYZ/");

        let args = GatewayArgs::parse_from(["gateway", "bafyXYZ", "--name", "w3s", "--style", "subdomain"]);
        assert_eq!(resolve(&args).unwrap(), "https://bafyXYZ.ipfs.w3s.link/");
    }

    #[test]
    fn test_resolve_failures() {
        let args = GatewayArgs::parse_from(["gateway", "bafyXYZ", "--name", "pinata", "--style", "subdomain"]);
        assert!(resolve(&args).is_err());

        let args = GatewayArgs::parse_from(["gateway", "bafyXYZ", "--name", "nowhere"]);
        assert!(resolve(&args).is_err());

        assert!(GatewayArgs::try_parse_from(["gateway"]).is_err());
        assert!(GatewayArgs::try_parse_from(["gateway", "--list"]).is_ok());
    }
}
