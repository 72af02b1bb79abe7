use std::path::PathBuf;
use thiserror::Error;

/// How a [`ProvisionError`] should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionErrorKind {
    /// Unsupported host or an inconsistent release; retrying will not help.
    EnvironmentMismatch,
    /// The user must fix filesystem permissions first.
    PermissionDenied,
    /// Network or I/O failure; the host may offer a retry.
    Transport,
}

/// Errors produced while installing the analyzer.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("unsupported operating system: {0}")]
    /// The host OS is not one golangci-lint ships binaries for.
    UnsupportedOs(String),

    #[error("unsupported architecture: {0}")]
    /// The host CPU architecture is not one golangci-lint ships binaries for.
    UnsupportedArch(String),

    #[error("expected exactly one release asset named '{expected}', found {matches}")]
    /// Zero or several release assets carry the expected name.
    AssetMismatch {
        /// Asset name composed for this platform.
        expected: String,
        /// Number of assets with that name.
        matches: usize,
    },

    #[error("archive does not contain '{0}'")]
    /// The downloaded archive has no entry for the executable.
    MissingExecutable(String),

    #[error("permission denied for {}", path.display())]
    /// The executable cannot be written or marked executable.
    PermissionDenied {
        /// Offending path.
        path: PathBuf,
    },

    #[error("invalid release metadata: {0}")]
    /// The release descriptor is unusable (e.g. an empty tag).
    Metadata(String),

    #[error("HTTP error: {0}")]
    /// Request or response failure.
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    /// Filesystem or stream failure.
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    /// The Windows archive could not be read.
    Zip(#[from] zip::result::ZipError),
}

impl ProvisionError {
    /// Classification used by hosts to decide how to present the failure.
    pub fn kind(&self) -> ProvisionErrorKind {
        match self {
            Self::UnsupportedOs(_)
            | Self::UnsupportedArch(_)
            | Self::AssetMismatch { .. }
            | Self::MissingExecutable(_) => ProvisionErrorKind::EnvironmentMismatch,
            Self::PermissionDenied { .. } => ProvisionErrorKind::PermissionDenied,
            Self::Metadata(_) | Self::Http(_) | Self::Io(_) | Self::Zip(_) => {
                ProvisionErrorKind::Transport
            }
        }
    }

    /// Only transport failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ProvisionErrorKind::Transport
    }
}

/// Errors produced while obtaining or parsing a golangci-lint report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed report: {0}")]
    /// The output is not a golangci-lint JSON report.
    Json(#[from] serde_json::Error),

    #[error("failed to start analyzer: {0}")]
    /// The analyzer process could not be spawned.
    Spawn(#[from] std::io::Error),

    #[error("analyzer exited with {code:?}: {stderr}")]
    /// The analyzer failed without producing a report.
    Failed {
        /// Exit code, `None` if killed by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
}
