//! Idempotent catalog publication with optimistic concurrency.
//!
//! Per run the flow is strictly sequential: ensure the target branch exists
//! (creating it from the default branch tip), read the currently published
//! document, compare fingerprints, then create or update at most once. The
//! revision token observed on read is the sole guard against lost updates;
//! a token mismatch is a hard stop, never a forced overwrite.

use thiserror::Error;
use tracing::info;

use crate::catalog::fingerprint;
use crate::config::HarvestConfig;
use crate::traits::{ApiError, RepoClient};

const CREATE_MESSAGE: &str = "Create aggregated mod catalog";
const UPDATE_MESSAGE: &str = "Update aggregated mod catalog";

/// Failures of the publish step. All of them terminate the run.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to create branch '{branch}': {source}")]
    BranchCreation {
        branch: String,
        #[source]
        source: ApiError,
    },
    /// The catalog file changed concurrently since it was read.
    #[error("catalog on '{branch}' changed concurrently, refusing to overwrite")]
    Conflict { branch: String },
    #[error("failed to write catalog file '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: ApiError,
    },
    #[error("publish aborted: {0}")]
    Api(#[from] ApiError),
}

/// What the publish step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Fingerprints matched; nothing was written.
    Unchanged,
    Created,
    Updated,
}

pub struct Publisher<'a> {
    client: &'a dyn RepoClient,
    config: &'a HarvestConfig,
}

impl<'a> Publisher<'a> {
    pub fn new(client: &'a dyn RepoClient, config: &'a HarvestConfig) -> Self {
        Self { client, config }
    }

    /// Publishes `document` to the configured branch and path, writing only
    /// when the content fingerprint differs from what is already there.
    pub async fn publish(&self, document: &[u8]) -> Result<PublishOutcome, PublishError> {
        let repo = &self.config.catalog_repo;
        let branch = &self.config.catalog_branch;
        let path = &self.config.catalog_path;

        self.ensure_branch().await?;

        let existing = self.client.file_on_branch(repo, branch, path).await?;
        match existing {
            Some(file) if fingerprint(&file.content) == fingerprint(document) => {
                info!(%branch, %path, "no changes detected, skipping publish");
                Ok(PublishOutcome::Unchanged)
            }
            Some(file) => {
                self.client
                    .update_file(repo, branch, path, document, UPDATE_MESSAGE, &file.token)
                    .await
                    .map_err(|e| match e {
                        ApiError::Conflict => PublishError::Conflict {
                            branch: branch.clone(),
                        },
                        other => PublishError::FileWrite {
                            path: path.clone(),
                            source: other,
                        },
                    })?;
                info!(%branch, %path, "updated catalog");
                Ok(PublishOutcome::Updated)
            }
            None => {
                self.client
                    .create_file(repo, branch, path, document, CREATE_MESSAGE)
                    .await
                    .map_err(|e| PublishError::FileWrite {
                        path: path.clone(),
                        source: e,
                    })?;
                info!(%branch, %path, "created catalog");
                Ok(PublishOutcome::Created)
            }
        }
    }

    /// Creates the target branch from the default branch tip if absent.
    async fn ensure_branch(&self) -> Result<(), PublishError> {
        let repo = &self.config.catalog_repo;
        let branch = &self.config.catalog_branch;

        if self.client.branch_tip(repo, branch).await?.is_some() {
            return Ok(());
        }

        let info = self.client.repo_info(repo).await?;
        let base = self
            .client
            .branch_tip(repo, &info.default_branch)
            .await?
            .ok_or_else(|| PublishError::BranchCreation {
                branch: branch.clone(),
                source: ApiError::Decode(format!(
                    "default branch '{}' has no tip",
                    info.default_branch
                )),
            })?;

        self.client
            .create_branch(repo, branch, &base)
            .await
            .map_err(|e| PublishError::BranchCreation {
                branch: branch.clone(),
                source: e,
            })?;
        info!(%branch, base = %base, "created publish branch from default tip");
        Ok(())
    }
}
