//! Download-and-install state machine for the analyzer executable.
//!
//! [`Provisioner::fetch_latest`] walks `ResolvingPlatform → FetchingMetadata → Downloading →
//! Decompressing → SettingPermissions → Ready`, reporting each transition to a
//! [`ProvisionListener`] along with status text and overall progress. Metadata takes the first
//! 20% of the progress range, the download 20–80% and extraction 80–100%.
//!
//! Cancellation is cooperative: [`ProvisionListener::is_cancelled`] is polled before every
//! chunk read, so the worst-case latency is one chunk. A cancelled run is not an error; it
//! returns [`ProvisionOutcome::Cancelled`] and leaves the partial archive for the caller.
//!
//! Detecting an existing installation is the caller's job ([`Platform::can_execute`]).

use crate::archive::{create_target, extract_executable};
use crate::error::ProvisionError;
use crate::platform::Platform;
use crate::release::ReleaseClient;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// GitHub API endpoint for the latest golangci-lint release.
pub const DEFAULT_RELEASE_URL: &str =
    "https://api.github.com/repos/golangci/golangci-lint/releases/latest";

/// Default download chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 20 * 1024;

const METADATA_FRACTION: f64 = 0.2;
const DOWNLOAD_FRACTION: f64 = 0.6;
const EXTRACT_START: f64 = METADATA_FRACTION + DOWNLOAD_FRACTION;

/// States of a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisionState {
    /// Nothing started.
    Idle,
    /// Mapping the host onto release coordinates.
    ResolvingPlatform,
    /// Reading release metadata.
    FetchingMetadata,
    /// Streaming the archive to the temp directory.
    Downloading,
    /// Extracting the executable.
    Decompressing,
    /// Marking the executable runnable.
    SettingPermissions,
    /// Installed.
    Ready,
    /// Stopped by the listener.
    Cancelled,
    /// Stopped by an error.
    Failed,
}

/// Progress sink and cancellation source for a provisioning run.
///
/// Callbacks run on the provisioning thread and should return quickly.
pub trait ProvisionListener {
    /// A state transition.
    fn on_state(&mut self, _state: ProvisionState) {}

    /// Human-readable status text.
    fn on_text(&mut self, _text: &str) {}

    /// Overall progress in `0.0..=1.0`.
    fn on_fraction(&mut self, _fraction: f64) {}

    /// Polled before every chunk read.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A listener that ignores everything and never cancels.
impl ProvisionListener for () {}

/// Forwards to another listener, mapping `0.0..=1.0` onto `start..=start + width`.
pub struct ScaledProgress<'l> {
    inner: &'l mut dyn ProvisionListener,
    start: f64,
    width: f64,
}

impl<'l> ScaledProgress<'l> {
    /// Wrap `inner`.
    pub fn new(inner: &'l mut dyn ProvisionListener, start: f64, width: f64) -> Self {
        Self {
            inner,
            start,
            width,
        }
    }
}

impl ProvisionListener for ScaledProgress<'_> {
    fn on_state(&mut self, state: ProvisionState) {
        self.inner.on_state(state);
    }

    fn on_text(&mut self, text: &str) {
        self.inner.on_text(text);
    }

    fn on_fraction(&mut self, fraction: f64) {
        self.inner
            .on_fraction(self.start + self.width * fraction.clamp(0.0, 1.0));
    }

    fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

/// Result of [`copy_with_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The reader was drained; total bytes written.
    Completed(u64),
    /// Cancelled before a read; bytes written so far.
    Cancelled(u64),
}

/// Copy `reader` into `writer` in chunks of at most `chunk_size` bytes.
///
/// Cancellation is checked before every read, so every chunk that was read is written in
/// full. After each chunk `listener` receives `written / total` (capped at 1; not reported
/// when `total` is 0).
pub fn copy_with_progress<R, W>(
    reader: &mut R,
    writer: &mut W,
    total: u64,
    chunk_size: usize,
    listener: &mut dyn ProvisionListener,
) -> io::Result<CopyOutcome>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut written = 0u64;
    loop {
        if listener.is_cancelled() {
            return Ok(CopyOutcome::Cancelled(written));
        }
        let len = match reader.read(&mut buf) {
            Ok(0) => return Ok(CopyOutcome::Completed(written)),
            Ok(len) => len,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        writer.write_all(&buf[..len])?;
        written += len as u64;
        if total > 0 {
            listener.on_fraction((written as f64 / total as f64).min(1.0));
        }
    }
}

/// Configuration for [`Provisioner`].
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Release metadata endpoint.
    pub release_url: String,
    /// Download chunk size in bytes.
    pub chunk_size: usize,
    /// `User-Agent` header (required by the GitHub API).
    pub user_agent: String,
    /// Directory for the downloaded archive; the platform's temp dir when `None`.
    pub temp_dir: Option<PathBuf>,
    /// Target platform; detected from the host when `None`.
    pub platform: Option<Platform>,
    /// WSL distribution to target when the platform is detected on Windows.
    pub wsl_distribution: Option<String>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            release_url: DEFAULT_RELEASE_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            user_agent: concat!("lintfix/", env!("CARGO_PKG_VERSION")).to_string(),
            temp_dir: None,
            platform: None,
            wsl_distribution: None,
        }
    }
}

impl ProvisionConfig {
    /// Set the release metadata endpoint.
    pub fn with_release_url(mut self, url: impl Into<String>) -> Self {
        self.release_url = url.into();
        self
    }

    /// Set the download chunk size (at least one byte).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Download into `dir` instead of the platform temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Skip host detection and install for `platform`.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Target a WSL distribution when running on Windows.
    pub fn with_wsl_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.wsl_distribution = Some(distribution.into());
        self
    }
}

/// How a provisioning run ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The executable is installed at this path.
    Installed(PathBuf),
    /// The listener cancelled the run.
    Cancelled {
        /// Partially downloaded archive left behind, if any.
        partial: Option<PathBuf>,
    },
}

/// Fetches and installs the latest analyzer release.
pub struct Provisioner<C> {
    client: C,
    config: ProvisionConfig,
}

impl<C: ReleaseClient> Provisioner<C> {
    /// Create a provisioner.
    pub fn new(client: C, config: ProvisionConfig) -> Self {
        Self { client, config }
    }

    /// Install the latest release into `dest`.
    ///
    /// Errors move the listener to [`ProvisionState::Failed`] before being returned.
    pub fn fetch_latest(
        &self,
        dest: &Path,
        listener: &mut dyn ProvisionListener,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        listener.on_state(ProvisionState::Idle);
        match self.run(dest, listener) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), "provisioning failed: {err}");
                listener.on_state(ProvisionState::Failed);
                Err(err)
            }
        }
    }

    fn run(
        &self,
        dest: &Path,
        listener: &mut dyn ProvisionListener,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        enter(listener, ProvisionState::ResolvingPlatform);
        let platform = match &self.config.platform {
            Some(platform) => platform.clone(),
            None => Platform::detect(self.config.wsl_distribution.as_deref())?,
        };
        tracing::info!(%platform, "resolved platform");

        enter(listener, ProvisionState::FetchingMetadata);
        listener.on_text("Getting latest release meta");
        let release = self.client.latest_release()?;
        listener.on_fraction(METADATA_FRACTION);
        if listener.is_cancelled() {
            return Ok(cancel(listener, None));
        }

        let version = release.version().ok_or_else(|| {
            ProvisionError::Metadata(format!("release tag '{}' has no version", release.tag_name))
        })?;
        let asset = release.select_asset(&platform.asset_name(version))?;
        let temp_dir = self
            .config
            .temp_dir
            .clone()
            .unwrap_or_else(|| platform.temp_dir());
        let archive = temp_dir.join(&asset.name);

        enter(listener, ProvisionState::Downloading);
        listener.on_text(&format!("Downloading {}", asset.name));
        let downloaded = {
            let mut reader = self.client.open_asset(asset)?;
            let mut file = BufWriter::new(create_target(&archive)?);
            let outcome = copy_with_progress(
                &mut reader,
                &mut file,
                asset.size,
                self.config.chunk_size,
                &mut ScaledProgress::new(listener, METADATA_FRACTION, DOWNLOAD_FRACTION),
            )?;
            file.flush()?;
            outcome
        };
        if let CopyOutcome::Cancelled(bytes) = downloaded {
            tracing::info!(bytes, archive = %archive.display(), "download cancelled");
            return Ok(cancel(listener, Some(archive)));
        }

        enter(listener, ProvisionState::Decompressing);
        let target = dest.join(platform.executable_name());
        listener.on_text(&format!("Decompressing to {}", target.display()));
        let extracted = extract_executable(
            platform.archive_format(),
            &archive,
            platform.executable_name(),
            &target,
            self.config.chunk_size,
            &mut ScaledProgress::new(listener, EXTRACT_START, 1.0 - EXTRACT_START),
        )?;
        if let CopyOutcome::Cancelled(_) = extracted {
            return Ok(cancel(listener, Some(archive)));
        }
        if let Err(err) = fs::remove_file(&archive) {
            tracing::warn!(archive = %archive.display(), "failed to remove archive: {err}");
        }

        enter(listener, ProvisionState::SettingPermissions);
        make_executable(&target)?;

        enter(listener, ProvisionState::Ready);
        listener.on_fraction(1.0);
        tracing::info!(path = %target.display(), "installed {}", asset.name);
        Ok(ProvisionOutcome::Installed(target))
    }
}

fn enter(listener: &mut dyn ProvisionListener, state: ProvisionState) {
    tracing::info!(?state, "provisioning");
    listener.on_state(state);
}

fn cancel(listener: &mut dyn ProvisionListener, partial: Option<PathBuf>) -> ProvisionOutcome {
    enter(listener, ProvisionState::Cancelled);
    ProvisionOutcome::Cancelled { partial }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), ProvisionError> {
    use std::os::unix::fs::PermissionsExt;

    let denied = |_| ProvisionError::PermissionDenied {
        path: path.to_path_buf(),
    };
    let mut permissions = fs::metadata(path).map_err(denied)?.permissions();
    let mode = permissions.mode();
    if mode & 0o111 == 0o111 {
        return Ok(());
    }
    permissions.set_mode(mode | 0o755);
    fs::set_permissions(path, permissions).map_err(denied)
}

#[cfg(not(unix))]
fn make_executable(path: &Path) -> Result<(), ProvisionError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ProvisionError::PermissionDenied {
            path: path.to_path_buf(),
        })
    }
}
