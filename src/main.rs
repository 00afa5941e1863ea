mod cache;
mod config;
mod github;
mod report;
mod scan;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::CacheStore;
use github::{GithubClient, GraphqlTransport};
use scan::walk::OrgWalker;

/// keep-contributions scans a GitHub organization and reports which
/// repositories carry your contribution trail (commits, stars, issues, PRs).
///
/// Without a mode flag it prints the compliance report from the local cache;
/// --scan walks the organization and fills the cache, --rescan-contributed
/// refreshes the repositories already cached.
#[derive(Parser, Debug)]
#[command(name = "keep-contributions", version, about)]
struct Cli {
    /// GitHub organization to scan
    org: String,

    /// GitHub user name whose contributions to look for
    user: String,

    /// GitHub API token (classic PAT)
    #[arg(long)]
    token: Option<String>,

    /// Path to a file containing the API token
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Run a full incremental organization scan, updating the cache
    #[arg(long, conflicts_with = "rescan_contributed")]
    scan: bool,

    /// Re-resolve contribution info for repositories already in the cache
    #[arg(long)]
    rescan_contributed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.scan && !cli.rescan_contributed {
        // Report mode is read-only and needs no token.
        let store = CacheStore::open_existing(&cli.org)?;
        report::print_report(store.data());
        return Ok(());
    }

    let file_config = config::Config::load()?;
    let token = config::resolve_token(cli.token, cli.token_file.as_deref(), &file_config)?;
    let client = GithubClient::new(token);
    let mut store = CacheStore::open(&cli.org)?;

    if cli.scan {
        run_scan(&client, &mut store, &cli.org, &cli.user).await?;
    } else {
        run_rescan(&client, &mut store, &cli.org, &cli.user).await?;
    }
    Ok(())
}

/// Full organization walk. Cache state is flushed after every page so an
/// interrupted run resumes at the right cursor instead of restarting.
async fn run_scan(
    client: &dyn GraphqlTransport,
    store: &mut CacheStore,
    org: &str,
    user: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let resume = store.walk_state();
    if resume.checked > 0 {
        info!(checked = resume.checked, "resuming previous walk");
    }

    let mut walker = OrgWalker::new(client, org, user, resume);
    while let Some(records) = walker.next_page().await? {
        for record in records {
            println!("{record}");
            store.insert(record);
        }
        store.set_walk_state(walker.state().clone());
        store.flush()?;
    }
    info!(repositories = store.repositories().len(), "scan complete");
    Ok(())
}

/// Refresh every cached record without discovering new repositories.
async fn run_rescan(
    client: &dyn GraphqlTransport,
    store: &mut CacheStore,
    org: &str,
    user: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let names: Vec<String> = store.repositories().keys().cloned().collect();
    info!(repositories = names.len(), "rescanning cached repositories");

    for full_name in names {
        let (_, name) = full_name
            .split_once('/')
            .ok_or_else(|| format!("malformed cache key: {full_name}"))?;
        let record = scan::scan_repository(client, org, name, user).await?;
        if record.full_name != full_name {
            return Err(format!(
                "refreshed record {} does not match cache key {full_name}",
                record.full_name
            )
            .into());
        }
        println!("{record}");
        store.insert(record);
        store.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn test_scan_and_rescan_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "keep-contributions",
            "acme",
            "alice",
            "--scan",
            "--rescan-contributed",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_mode_is_report() {
        let cli = Cli::try_parse_from(["keep-contributions", "acme", "alice"]).unwrap();
        assert!(!cli.scan);
        assert!(!cli.rescan_contributed);
        assert_eq!(cli.org, "acme");
        assert_eq!(cli.user, "alice");
    }

    #[test]
    fn test_org_and_user_are_required() {
        assert!(Cli::try_parse_from(["keep-contributions", "acme"]).is_err());
    }
}
