//! Host platform → release asset coordinates.

use crate::LINTER_NAME;
use crate::archive::ArchiveFormat;
use crate::error::ProvisionError;
use crate::process::LintCommand;
use std::fmt;
use std::path::{Path, PathBuf};

/// Operating systems golangci-lint publishes binaries for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsKind {
    /// Native Windows.
    Windows,
    /// Linux.
    Linux,
    /// macOS.
    MacOs,
    /// A Linux distribution under WSL, driven from Windows.
    Wsl {
        /// WSL distribution name (`wsl.exe -d <distribution>`).
        distribution: String,
    },
}

impl OsKind {
    /// Map a host OS name (`std::env::consts::OS` spelling, plus `darwin`/`macos`).
    ///
    /// On Windows, a WSL distribution switches the target to Linux-under-WSL.
    pub fn parse(os: &str, wsl_distribution: Option<&str>) -> Result<Self, ProvisionError> {
        match os {
            "windows" => Ok(match wsl_distribution {
                Some(distribution) => Self::Wsl {
                    distribution: distribution.to_string(),
                },
                None => Self::Windows,
            }),
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOs),
            other => Err(ProvisionError::UnsupportedOs(other.to_string())),
        }
    }

    /// OS component of release asset names.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux | Self::Wsl { .. } => "linux",
            Self::MacOs => "darwin",
        }
    }
}

/// CPU architectures golangci-lint publishes binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 32-bit x86.
    X86,
    /// x86-64.
    Amd64,
    /// 64-bit ARM.
    Arm64,
}

impl Arch {
    /// Map a host architecture name onto a canonical architecture.
    pub fn parse(arch: &str) -> Result<Self, ProvisionError> {
        match arch {
            "x86" | "i386" | "i686" | "386" => Ok(Self::X86),
            "x86_64" | "amd64" => Ok(Self::Amd64),
            "aarch64" | "arm64" => Ok(Self::Arm64),
            other => Err(ProvisionError::UnsupportedArch(other.to_string())),
        }
    }

    /// Architecture component of release asset names.
    pub fn tag(self) -> &'static str {
        match self {
            Self::X86 => "386",
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

/// A resolved target platform. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    os: OsKind,
    arch: Arch,
}

impl Platform {
    /// Create a platform from already-resolved parts.
    pub fn new(os: OsKind, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Resolve OS and architecture names, failing on anything unsupported.
    pub fn resolve(
        os: &str,
        arch: &str,
        wsl_distribution: Option<&str>,
    ) -> Result<Self, ProvisionError> {
        Ok(Self::new(OsKind::parse(os, wsl_distribution)?, Arch::parse(arch)?))
    }

    /// The platform this process runs on.
    pub fn detect(wsl_distribution: Option<&str>) -> Result<Self, ProvisionError> {
        Self::resolve(
            std::env::consts::OS,
            std::env::consts::ARCH,
            wsl_distribution,
        )
    }

    /// Operating system.
    pub fn os(&self) -> &OsKind {
        &self.os
    }

    /// CPU architecture.
    pub fn arch(&self) -> Arch {
        self.arch
    }

    /// OS component of release asset names.
    pub fn os_tag(&self) -> &'static str {
        self.os.tag()
    }

    /// Architecture component of release asset names.
    pub fn arch_tag(&self) -> &'static str {
        self.arch.tag()
    }

    /// Archive format of the release asset.
    pub fn archive_format(&self) -> ArchiveFormat {
        match self.os {
            OsKind::Windows => ArchiveFormat::Zip,
            _ => ArchiveFormat::TarGz,
        }
    }

    /// File suffix of the release asset (`zip` or `tar.gz`).
    pub fn archive_suffix(&self) -> &'static str {
        self.archive_format().suffix()
    }

    /// Name of the installed executable.
    pub fn executable_name(&self) -> &'static str {
        match self.os {
            OsKind::Windows => "golangci-lint.exe",
            _ => LINTER_NAME,
        }
    }

    /// Release asset name for `version` (a tag without its leading `v`).
    ///
    /// `golangci-lint-1.55.2-linux-amd64.tar.gz`
    pub fn asset_name(&self, version: &str) -> String {
        format!(
            "{LINTER_NAME}-{version}-{}-{}.{}",
            self.os_tag(),
            self.arch_tag(),
            self.archive_suffix()
        )
    }

    /// Directory for the downloaded archive.
    ///
    /// For WSL this is the distribution's `/tmp`, reached through its UNC share.
    pub fn temp_dir(&self) -> PathBuf {
        match &self.os {
            OsKind::Wsl { distribution } => PathBuf::from(format!(r"\\wsl$\{distribution}\tmp")),
            _ => std::env::temp_dir(),
        }
    }

    /// Adapt `command` so it runs on this platform.
    ///
    /// Under WSL the analyzer runs inside the distribution:
    /// `wsl.exe -d <distro> [--cd <dir>] -- [env K=V ...] <program> <args>`.
    pub fn build_command(&self, command: &LintCommand) -> LintCommand {
        let OsKind::Wsl { distribution } = &self.os else {
            return command.clone();
        };

        let mut wrapped = LintCommand::new("wsl.exe").args(["-d", distribution.as_str()]);
        if let Some(dir) = &command.working_dir {
            wrapped = wrapped.args(["--cd".to_string(), dir.to_string_lossy().into_owned()]);
        }
        wrapped = wrapped.arg("--");
        if !command.env.is_empty() {
            wrapped = wrapped
                .arg("env")
                .args(command.env.iter().map(|(key, value)| format!("{key}={value}")));
        }
        wrapped
            .arg(command.program.to_string_lossy())
            .args(command.args.iter().cloned())
    }

    /// Whether `path` is an existing executable file.
    pub fn can_execute(&self, path: &Path) -> bool {
        is_executable(path)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.os {
            OsKind::Wsl { distribution } => {
                write!(f, "{}/{} (WSL: {distribution})", self.os_tag(), self.arch_tag())
            }
            _ => write!(f, "{}/{}", self.os_tag(), self.arch_tag()),
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
