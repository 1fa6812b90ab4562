//! Concurrent fan-out of per-repository harvests.
//!
//! Each tracked repository is one unit of work. Tasks run under a
//! fixed-size permit pool and each returns an owned result; the collector
//! merges successes after completion, so no worker ever touches shared
//! mutable state. Completion order does not matter — records are sorted
//! during assembly.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::harvest::repository::harvest_repository;
use crate::model::{CatalogRecord, RepoRef};
use crate::traits::RepoClient;

pub struct ConcurrentHarvester {
    client: Arc<dyn RepoClient>,
    semaphore: Arc<Semaphore>,
}

impl ConcurrentHarvester {
    pub fn new(client: Arc<dyn RepoClient>, concurrency: usize) -> Self {
        Self {
            client,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Harvests every tracked repository, returning the union of all
    /// successfully produced records.
    ///
    /// A failing repository is logged with its identifier and excluded; it
    /// never aborts sibling in-flight or queued work.
    pub async fn harvest_all(&self, repos: Vec<RepoRef>) -> Vec<CatalogRecord> {
        let total = repos.len();
        let mut tasks = JoinSet::new();
        for repo in repos {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&self.semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = harvest_repository(client.as_ref(), &repo).await;
                (repo, result)
            });
        }

        let mut records = Vec::new();
        let mut failed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((repo, Ok(found))) => {
                    info!(repo = %repo, records = found.len(), "harvested repository");
                    records.extend(found);
                }
                Ok((repo, Err(error))) => {
                    failed += 1;
                    warn!(repo = %repo, %error, "skipping repository");
                }
                Err(error) => {
                    failed += 1;
                    warn!(%error, "harvest task did not complete");
                }
            }
        }

        info!(
            repos = total,
            failed,
            records = records.len(),
            "harvest complete"
        );
        records
    }
}
