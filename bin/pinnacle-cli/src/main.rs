//! Pinnacle: pin local files to IPFS through a local daemon or a hosted pinning service.

pub(crate) mod args;
pub(crate) mod subcommands;

use args::{Arguments, Subcommands};
use clap::{Parser, ValueEnum};
use eyre::{eyre, Result};
use pinnacle_common::GatewayStyle;
use pinnacle_config::Configuration;
use pinnacle_pin::{BackendKind, PinArgs};
use subcommands::GatewayArgs;

#[tokio::main]
async fn main() -> Result<()> {
    // parse command line arguments
    let args = Arguments::parse();

    // init tracing, keeping the file writer alive until exit
    let _guard = args.logs.init_tracing()?;

    // load config
    let config = Configuration::load()?;

    match args.sub {
        Subcommands::Config(subargs) => pinnacle_config::config(subargs)?,
        Subcommands::Pin(mut subargs) => {
            apply_pin_config(&mut subargs, config)?;
            pinnacle_pin::pin(subargs).await?
        }
        Subcommands::Gateway(mut subargs) => {
            apply_gateway_config(&mut subargs, config)?;
            subcommands::gateway(subargs)?
        }
    };

    Ok(())
}

/// Fills the `pin` flags that were not given from the configuration.
fn apply_pin_config(args: &mut PinArgs, config: Configuration) -> Result<()> {
    if args.backend.is_none() {
        if let Some(backend) = config.backend {
            args.backend = Some(
                BackendKind::from_str(&backend, true)
                    .map_err(|e| eyre!("Invalid backend in configuration: {}", e))?,
            );
        }
    }
    // an explicit token always beats a configured key
    if args.token.is_none() && args.token_env_key.is_none() {
        args.token_env_key = config.token_env_key;
    }
    if args.gateway.is_none() {
        args.gateway = config.gateway;
    }
    if args.gateway_style.is_none() {
        args.gateway_style = parse_style(config.gateway_style)?;
    }
    if args.local_api_url.is_none() {
        args.local_api_url = config.local_api_url;
    }

    Ok(())
}

/// Fills the `gateway` flags that were not given from the configuration.
fn apply_gateway_config(args: &mut GatewayArgs, config: Configuration) -> Result<()> {
    if args.name.is_none() {
        args.name = config.gateway;
    }
    if args.style.is_none() {
        args.style = parse_style(config.gateway_style)?;
    }

    Ok(())
}

fn parse_style(style: Option<String>) -> Result<Option<GatewayStyle>> {
    style
        .map(|style| style.parse::<GatewayStyle>())
        .transpose()
        .map_err(|e| eyre!("Invalid gateway style in configuration: {}", e))
}
