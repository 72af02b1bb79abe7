//! Release metadata and asset download.

use crate::error::ProvisionError;
use crate::provision::ProvisionConfig;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

/// One downloadable file of a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// File name, e.g. `golangci-lint-1.55.2-linux-amd64.tar.gz`.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Direct download URL (redirects to storage).
    pub browser_download_url: String,
}

/// A published release, as returned by the GitHub releases API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseDescriptor {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Git tag, e.g. `v1.55.2`.
    pub tag_name: String,
    /// Attached files.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseDescriptor {
    /// The tag with its leading character (`v`) stripped; `None` if nothing remains.
    pub fn version(&self) -> Option<&str> {
        let mut chars = self.tag_name.chars();
        chars.next()?;
        Some(chars.as_str()).filter(|version| !version.is_empty())
    }

    /// The single asset called `expected`.
    ///
    /// Zero or several matches mean the release does not fit this platform; the first match
    /// is never picked silently.
    pub fn select_asset(&self, expected: &str) -> Result<&ReleaseAsset, ProvisionError> {
        let mut matches = self.assets.iter().filter(|asset| asset.name == expected);
        match (matches.next(), matches.count()) {
            (Some(asset), 0) => Ok(asset),
            (first, rest) => Err(ProvisionError::AssetMismatch {
                expected: expected.to_string(),
                matches: usize::from(first.is_some()) + rest,
            }),
        }
    }
}

/// Source of release metadata and asset bytes.
pub trait ReleaseClient {
    /// Fetch the latest release.
    fn latest_release(&self) -> Result<ReleaseDescriptor, ProvisionError>;

    /// Open a byte stream for `asset`.
    fn open_asset(&self, asset: &ReleaseAsset) -> Result<Box<dyn Read + '_>, ProvisionError>;
}

/// [`ReleaseClient`] over the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubReleaseClient {
    client: Client,
    release_url: String,
}

impl GithubReleaseClient {
    /// Build a client for `config.release_url`, sending `config.user_agent`.
    pub fn new(config: &ProvisionConfig) -> Result<Self, ProvisionError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(30))
            .timeout(None)
            .build()?;
        Ok(Self {
            client,
            release_url: config.release_url.clone(),
        })
    }
}

impl ReleaseClient for GithubReleaseClient {
    fn latest_release(&self) -> Result<ReleaseDescriptor, ProvisionError> {
        tracing::debug!(url = %self.release_url, "fetching release metadata");
        let release = self
            .client
            .get(&self.release_url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()?
            .error_for_status()?
            .json::<ReleaseDescriptor>()?;
        Ok(release)
    }

    fn open_asset(&self, asset: &ReleaseAsset) -> Result<Box<dyn Read + '_>, ProvisionError> {
        tracing::debug!(url = %asset.browser_download_url, size = asset.size, "downloading asset");
        let response = self
            .client
            .get(&asset.browser_download_url)
            .send()?
            .error_for_status()?;
        Ok(Box::new(response))
    }
}
