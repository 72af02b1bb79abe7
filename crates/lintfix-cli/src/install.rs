use crate::cli::InstallArgs;
use crate::progress::BarListener;
use anyhow::{Context, Result};
use lintfix_golangci::{
    GithubReleaseClient, Platform, ProvisionConfig, ProvisionOutcome, Provisioner,
};

pub fn execute(args: &InstallArgs) -> Result<()> {
    let platform = Platform::detect(args.wsl.as_deref())?;
    let existing = args.dest.join(platform.executable_name());
    if !args.force && platform.can_execute(&existing) {
        println!("{} is already installed", existing.display());
        return Ok(());
    }

    let config = ProvisionConfig::default()
        .with_release_url(args.release_url.as_str())
        .with_chunk_size(args.chunk_size)
        .with_platform(platform);
    let client = GithubReleaseClient::new(&config).context("failed to build HTTP client")?;
    let provisioner = Provisioner::new(client, config);

    let mut listener = BarListener::new();
    let outcome = provisioner
        .fetch_latest(&args.dest, &mut listener)
        .with_context(|| format!("failed to install into {}", args.dest.display()))?;

    match outcome {
        ProvisionOutcome::Installed(path) => println!("installed {}", path.display()),
        ProvisionOutcome::Cancelled { partial } => {
            println!("cancelled");
            if let Some(partial) = partial {
                println!("partial download left at {}", partial.display());
            }
        }
    }
    Ok(())
}
