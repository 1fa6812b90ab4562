//! Seed-list retrieval: the newline-delimited file naming every tracked
//! repository, kept in the catalog repository itself.

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::config::HarvestConfig;
use crate::model::RepoRef;
use crate::traits::{ApiError, RepoClient};

/// The seed list could not be fetched. Fatal: there is nothing to harvest.
#[derive(Error, Debug)]
#[error("seed list '{path}' unavailable: {source}")]
pub struct SeedListError {
    pub path: String,
    #[source]
    pub source: ApiError,
}

/// Fetches and parses the seed list from the catalog repository's default
/// branch. Unparseable lines are skipped with a warning.
pub async fn load_tracked_repositories(
    client: &dyn RepoClient,
    config: &HarvestConfig,
) -> Result<Vec<RepoRef>, SeedListError> {
    let repo = &config.catalog_repo;
    let wrap = |source| SeedListError {
        path: config.seed_path.clone(),
        source,
    };

    let info = client.repo_info(repo).await.map_err(wrap)?;
    let raw = client
        .raw_file(repo, &info.default_branch, &config.seed_path)
        .await
        .map_err(wrap)?;
    let text = String::from_utf8_lossy(&raw);

    let mut repos = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_seed_line(line) {
            Some(repo) => repos.push(repo),
            None => warn!(%line, "skipping unparseable seed line"),
        }
    }
    Ok(repos)
}

/// Parses one seed line: a repository URL, or a bare `owner/name` pair.
/// The URL's path component is split on the first `/`.
pub fn parse_seed_line(line: &str) -> Option<RepoRef> {
    let path = match Url::parse(line) {
        Ok(url) => url.path().trim_matches('/').to_string(),
        Err(_) => line.trim_matches('/').to_string(),
    };
    let (owner, name) = path.split_once('/')?;
    let name = name.trim_end_matches(".git");
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(RepoRef::new(owner, name))
}
