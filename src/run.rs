//! Single-shot run orchestration: seeds → harvest → assemble → publish.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::catalog::{assemble, CatalogError};
use crate::config::HarvestConfig;
use crate::harvest::ConcurrentHarvester;
use crate::publish::{PublishError, PublishOutcome, Publisher};
use crate::seeds::{load_tracked_repositories, SeedListError};
use crate::traits::RepoClient;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    SeedList(#[from] SeedListError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of records in the assembled catalog.
    pub records: usize,
    /// `None` when publishing was skipped (empty harvest).
    pub outcome: Option<PublishOutcome>,
}

/// Executes one full harvest-and-publish cycle.
///
/// An empty harvest (every repository failed or produced nothing) skips the
/// publish step entirely so a transient outage can never overwrite the
/// previously published catalog with an empty document.
pub async fn run_once(
    client: Arc<dyn RepoClient>,
    config: &HarvestConfig,
) -> Result<RunSummary, RunError> {
    let repos = load_tracked_repositories(client.as_ref(), config).await?;
    info!(tracked = repos.len(), "loaded seed list");

    let harvester = ConcurrentHarvester::new(Arc::clone(&client), config.concurrency);
    let records = harvester.harvest_all(repos).await;
    if records.is_empty() {
        info!("harvest produced no records, leaving published catalog untouched");
        return Ok(RunSummary {
            records: 0,
            outcome: None,
        });
    }

    let count = records.len();
    let document = assemble(records)?;
    let outcome = Publisher::new(client.as_ref(), config)
        .publish(&document)
        .await?;

    Ok(RunSummary {
        records: count,
        outcome: Some(outcome),
    })
}
