#![warn(missing_docs)]
//! `lintfix-golangci` - golangci-lint integration for `lintfix`.
//!
//! # Overview
//!
//! - [`process`] runs the analyzer (directly or through `wsl.exe`) and captures its output.
//! - [`report`] turns golangci-lint's JSON output into `lintfix_core::Diagnostic`s.
//! - [`platform`] resolves the host OS/architecture into release asset coordinates.
//! - [`release`] reads release metadata and selects the asset for a platform.
//! - [`provision`] downloads, unpacks and installs the analyzer executable, reporting
//!   progress and honouring cooperative cancellation.
//!
//! ```text
//! Idle → ResolvingPlatform → FetchingMetadata → Downloading → Decompressing
//!      → SettingPermissions → Ready
//! ```

mod archive;
mod error;
pub mod platform;
pub mod process;
pub mod provision;
pub mod release;
pub mod report;

pub use archive::ArchiveFormat;
pub use error::{ProvisionError, ProvisionErrorKind, ReportError};
pub use platform::{Arch, OsKind, Platform};
pub use process::{LintCommand, ProcessOutput, ProcessRunner, SystemRunner};
pub use provision::{
    CopyOutcome, ProvisionConfig, ProvisionListener, ProvisionOutcome, ProvisionState,
    Provisioner, ScaledProgress, copy_with_progress,
};
pub use release::{GithubReleaseClient, ReleaseAsset, ReleaseClient, ReleaseDescriptor};
pub use report::{parse_report, run_report};

/// Name of the analyzer, used for asset names and the installed executable.
pub const LINTER_NAME: &str = "golangci-lint";
