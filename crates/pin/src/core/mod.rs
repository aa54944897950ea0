use std::{path::PathBuf, time::Duration};

use eyre::{bail, eyre, Result};
use futures::future::try_join_all;
use pinnacle_common::{ipfs_installed, Content, Gateway, PinError};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::{Backend, BackendKind, PinArgs, ReqwestTransport};

mod pinner;

pub use pinner::*;

/// The `pin` subcommand. Uploads every file under the given paths to the selected backend and
/// prints a gateway URL for each.
pub async fn pin(args: PinArgs) -> Result<()> {
    let kind = args.backend.unwrap_or(BackendKind::Local);
    let files = collect_files(&args.paths)?;
    if files.is_empty() {
        bail!("no files found under {:?}", args.paths);
    }

    // resolve the gateway before uploading anything, so a typo doesn't waste an upload
    let gateway_name = args.gateway.clone().unwrap_or_else(|| kind.default_gateway().to_string());
    Gateway::named(&gateway_name).map_err(|e| eyre!("Invalid gateway: {}", e))?;
    let style = args.gateway_style.unwrap_or_default();

    let mut config = kind.default_config();
    if let Some(local_api_url) = &args.local_api_url {
        if kind == BackendKind::Local {
            config.base_url = local_api_url.clone();
        } else {
            warn!("ignoring --local-api-url for the {} backend", kind);
        }
    }

    let transport = match args.timeout {
        Some(secs) => ReqwestTransport::with_timeout(Duration::from_secs(secs))
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?,
        None => ReqwestTransport::new(),
    };

    let mut pinner = Pinner::new(kind.build_with_config(config), transport);
    authenticate(&mut pinner, &args).map_err(|e| eyre!("Failed to authenticate with {}: {}", kind, e))?;

    info!("pinning {} file(s) to {}", files.len(), pinner.backend().name());
    let cid_version = args.cid_version;
    let uploads = files.into_iter().map(|path| {
        let pinner = &pinner;
        let mimetype = args.mimetype.clone();
        async move {
            let mut content = Content::new(path);
            if let Some(mimetype) = mimetype {
                content.set_mimetype(mimetype);
            }
            let pin = pinner.pin_content(&mut content, cid_version).await?;
            Ok::<_, PinError>((content, pin))
        }
    });

    let pinned = try_join_all(uploads).await.map_err(|e| {
        if matches!(e, PinError::DaemonNotRunning) {
            daemon_hint();
        }
        eyre!("Failed to pin: {}", e)
    })?;

    for (content, pin) in pinned {
        match content.gateway_url(&gateway_name, style) {
            Ok(url) => info!("{} -> {}", content.basename(), url),
            Err(e) => {
                warn!("no {} URL for {} via {}: {}", style, content.basename(), gateway_name, e);
                info!("{} -> ipfs://{}", content.basename(), pin.cid);
            }
        }
        if !pin.meta.is_empty() {
            debug!("{} metadata: {}", pin.cid, serde_json::Value::Object(pin.meta));
        }
    }

    Ok(())
}

/// Applies the authentication flags: an explicit token or key is always attempted (so authless
/// backends reject it), otherwise non-authless backends read their conventional key.
fn authenticate<B: Backend, T>(pinner: &mut Pinner<B, T>, args: &PinArgs) -> pinnacle_common::Result<()> {
    if let Some(token) = &args.token {
        return pinner.authenticate_with_token(token.clone());
    }
    if let Some(key) = &args.token_env_key {
        return pinner.authenticate_with_env(key);
    }
    if !pinner.is_authless() {
        return pinner.authenticate_from_default_env();
    }

    Ok(())
}

/// Expands directories into the files below them, in file name order.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            bail!("{} does not exist", path.display());
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| eyre!("Failed to walk {}: {}", path.display(), e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

fn daemon_hint() {
    if ipfs_installed() {
        error!("the local IPFS daemon is not running. Start it with `ipfs daemon` and try again.");
    } else {
        error!("no `ipfs` binary was found. Install kubo from https://docs.ipfs.tech/install/ and run `ipfs daemon`.");
    }
}
