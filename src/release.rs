//! Prebuilt release resolution and download (binary flow)
//!
//! This module handles:
//! - Querying the latest-release metadata endpoint
//! - Selecting the asset matching the detected architecture
//! - Downloading the archive into the run's workspace
//!
//! Selection never falls back to another architecture's asset, and nothing is
//! downloaded unless a matching asset exists. Downloads are one-shot; a failed
//! transfer is fatal and the operator re-runs the installer.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::environment::Architecture;
use crate::error::{FerretError, Result};
use crate::ui;

const USER_AGENT: &str = concat!("ferret-install/", env!("CARGO_PKG_VERSION"));

/// Latest published release, as served by the metadata endpoint
#[derive(Debug, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable archive attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// An asset resolved for this host and downloaded into the workspace
#[derive(Debug)]
pub struct DownloadedAsset {
    pub name: String,
    pub archive_path: PathBuf,
}

/// HTTP client for the release endpoints
fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(300))
        .build()
        .map_err(|e| FerretError::DownloadFailure {
            url: "(client setup)".to_string(),
            reason: e.to_string(),
        })
}

/// Fetch the latest-release metadata document
pub fn fetch_latest(releases_url: &str) -> Result<Release> {
    let response = client()?
        .get(releases_url)
        .send()
        .map_err(|e| FerretError::DownloadFailure {
            url: releases_url.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(FerretError::DownloadFailure {
            url: releases_url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    response
        .json::<Release>()
        .map_err(|e| FerretError::DownloadFailure {
            url: releases_url.to_string(),
            reason: format!("invalid release metadata: {e}"),
        })
}

/// Select the asset named for the detected architecture.
///
/// Assets encode their target as `linux-<arch>` in the file name and one
/// asset per architecture is published. No match means Ferret does not ship
/// prebuilt binaries for this host; that is terminal, never a fallback.
pub fn select_asset(release: &Release, architecture: Architecture) -> Result<&ReleaseAsset> {
    let pattern = format!("linux-{}", architecture.asset_token());
    release
        .assets
        .iter()
        .find(|asset| asset.name.contains(&pattern))
        .ok_or(FerretError::ReleaseNotFound {
            architecture: architecture.asset_token().to_string(),
        })
}

/// Download `asset` into `workspace_dir`, returning the archive path
pub fn download(asset: &ReleaseAsset, workspace_dir: &Path) -> Result<DownloadedAsset> {
    ui::info(&format!("Downloading {}", asset.name));

    let bytes = client()?
        .get(&asset.browser_download_url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(|r| r.bytes())
        .map_err(|e| FerretError::DownloadFailure {
            url: asset.browser_download_url.clone(),
            reason: e.to_string(),
        })?;

    let archive_path = workspace_dir.join(&asset.name);
    fs::write(&archive_path, &bytes)?;

    ui::info(&format!(
        "Fetched {} ({} bytes)",
        asset.name,
        bytes.len()
    ));
    Ok(DownloadedAsset {
        name: asset.name.clone(),
        archive_path,
    })
}

/// Resolve and download the release archive for `architecture`
pub fn resolve_and_download(
    releases_url: &str,
    architecture: Architecture,
    workspace_dir: &Path,
) -> Result<DownloadedAsset> {
    let release = fetch_latest(releases_url)?;
    ui::info(&format!("Latest release: {}", release.tag_name));
    let asset = select_asset(&release, architecture)?;
    download(asset, workspace_dir)
}
