use crate::model::RepoRef;
use std::time::Duration;

/// Default number of repositories harvested in parallel.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default per-request latency boundary.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Explicit run configuration passed into every component.
///
/// The credential is consumed opaquely; nothing here is read from process
/// globals, which keeps the pipeline testable in isolation.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Bearer token for the remote API, if any.
    pub token: Option<String>,
    /// Repository hosting both the seed list and the published catalog.
    pub catalog_repo: RepoRef,
    /// Branch the catalog document is published to.
    pub catalog_branch: String,
    /// Path of the catalog document within `catalog_repo`.
    pub catalog_path: String,
    /// Path of the newline-delimited seed list within `catalog_repo`.
    pub seed_path: String,
    /// Upper bound on concurrently harvested repositories.
    pub concurrency: usize,
    /// Tolerated latency for a single remote call.
    pub request_timeout: Duration,
}

impl HarvestConfig {
    pub fn new(catalog_repo: RepoRef) -> Self {
        Self {
            token: None,
            catalog_repo,
            catalog_branch: "catalog".to_string(),
            catalog_path: "addons_list.xml".to_string(),
            seed_path: "repos".to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}
