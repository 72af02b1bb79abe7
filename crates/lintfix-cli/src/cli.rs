use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lintfix_golangci::Platform;
use lintfix_golangci::provision::{DEFAULT_CHUNK_SIZE, DEFAULT_RELEASE_URL};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lintfix", version, about = "Install golangci-lint and apply its quick fixes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved platform and release asset coordinates
    Platform(PlatformArgs),
    /// Download the latest golangci-lint release
    Install(InstallArgs),
    /// Lint a Go file and list (or apply) quick fixes
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct PlatformArgs {
    /// Target a WSL distribution (Windows only)
    #[arg(long, value_name = "DISTRO")]
    pub wsl: Option<String>,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Directory to install the executable into
    #[arg(long, env = "LINTFIX_DEST")]
    pub dest: PathBuf,

    /// Download chunk size in bytes
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Release metadata endpoint
    #[arg(long, env = "LINTFIX_RELEASE_URL", default_value = DEFAULT_RELEASE_URL)]
    pub release_url: String,

    /// Target a WSL distribution (Windows only)
    #[arg(long, value_name = "DISTRO")]
    pub wsl: Option<String>,

    /// Reinstall even if an executable is already present
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Go source file to check
    pub file: PathBuf,

    /// golangci-lint executable
    #[arg(long, env = "LINTFIX_LINTER", default_value = "golangci-lint")]
    pub linter: PathBuf,

    /// Read a saved `golangci-lint run --out-format json` report instead of running the linter
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Directory relative paths in the report are resolved against (default: current directory)
    #[arg(long, value_name = "DIR", requires = "report")]
    pub report_root: Option<PathBuf>,

    /// Apply the first fix of each diagnostic to the file
    #[arg(long)]
    pub apply: bool,

    /// Run the linter inside a WSL distribution (Windows only)
    #[arg(long, value_name = "DISTRO")]
    pub wsl: Option<String>,
}

pub fn print_platform(args: &PlatformArgs) -> Result<()> {
    let platform = Platform::detect(args.wsl.as_deref())?;
    println!("platform:   {platform}");
    println!("asset:      {}", platform.asset_name("<version>"));
    println!("executable: {}", platform.executable_name());
    println!("temp dir:   {}", platform.temp_dir().display());
    Ok(())
}
