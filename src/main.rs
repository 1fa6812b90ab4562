use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use catalog_harvester::github::GithubClient;
use catalog_harvester::run::run_once;
use catalog_harvester::seeds::parse_seed_line;
use catalog_harvester::{HarvestConfig, RepoRef};

/// Harvests mod manifests from tracked repositories and publishes the
/// aggregated catalog when its content changes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Repository hosting the seed list and the published catalog, as "owner/name".
    #[arg(long, env = "CATALOG_REPO")]
    repo: String,

    /// Branch the catalog is published to.
    #[arg(long, default_value = "catalog")]
    branch: String,

    /// Path of the catalog document within the repository.
    #[arg(long, default_value = "addons_list.xml")]
    output: String,

    /// Path of the newline-delimited seed list within the repository.
    #[arg(long, default_value = "repos")]
    seeds: String,

    /// Maximum number of repositories harvested in parallel.
    #[arg(long, default_value_t = catalog_harvester::config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// API token; read from the environment, never logged.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let catalog_repo = parse_catalog_repo(&cli.repo)?;
    let mut config = HarvestConfig::new(catalog_repo);
    config.token = cli.token;
    config.catalog_branch = cli.branch;
    config.catalog_path = cli.output;
    config.seed_path = cli.seeds;
    config.concurrency = cli.concurrency;
    config.request_timeout = Duration::from_secs(cli.timeout_secs);

    let client = GithubClient::new(&config).map_err(|e| e.to_string())?;
    let summary = run_once(Arc::new(client), &config)
        .await
        .map_err(|e| e.to_string())?;

    tracing::info!(
        records = summary.records,
        outcome = ?summary.outcome,
        "run finished"
    );
    Ok(())
}

fn parse_catalog_repo(value: &str) -> Result<RepoRef, String> {
    parse_seed_line(value).ok_or_else(|| format!("invalid --repo value '{value}'"))
}
