use crate::model::RepoRef;
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the remote repository API.
///
/// `NotFound`-style conditions that callers are expected to handle (missing
/// branch, missing file) are expressed as `Ok(None)` on the relevant trait
/// methods instead of an error variant.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status} from {context}")]
    Status { status: u16, context: String },
    #[error("response could not be decoded: {0}")]
    Decode(String),
    /// The optimistic-concurrency token no longer matches the remote state.
    #[error("remote content changed since it was read")]
    Conflict,
}

/// Repository identity and default branch, resolved in one call.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    pub id: u64,
    pub default_branch: String,
}

/// One entry of a recursive tree listing.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    /// Path relative to the repository root, forward-slash separated.
    pub path: String,
    pub is_blob: bool,
}

/// One entry of a single-directory listing.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub is_file: bool,
}

/// A remote file's content together with its concurrency token.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub content: Vec<u8>,
    /// Opaque token representing the observed revision; required to update
    /// the file and rejected by the remote if the file has since changed.
    pub token: String,
}

/// Read/write access to the hosting platform, the only seam the pipeline
/// touches. A single configuration object plus this trait replace any
/// process-wide client state, so every component can be exercised against
/// an in-memory implementation.
#[async_trait]
pub trait RepoClient: Send + Sync {
    /// Resolves the repository id and default branch.
    async fn repo_info(&self, repo: &RepoRef) -> Result<RepoInfo, ApiError>;

    /// Retrieves the full recursive tree at `revision` in one call.
    async fn recursive_tree(
        &self,
        repo: &RepoRef,
        revision: &str,
    ) -> Result<Vec<TreeEntry>, ApiError>;

    /// Fetches raw file bytes at `path` on `revision`, bypassing the
    /// authenticated contents API.
    async fn raw_file(
        &self,
        repo: &RepoRef,
        revision: &str,
        path: &str,
    ) -> Result<Vec<u8>, ApiError>;

    /// Lists one directory (non-recursive) at `revision`.
    async fn list_dir(
        &self,
        repo: &RepoRef,
        revision: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ApiError>;

    /// Returns the tip commit of `branch`, or `None` if the branch is absent.
    async fn branch_tip(&self, repo: &RepoRef, branch: &str) -> Result<Option<String>, ApiError>;

    /// Creates `branch` pointing at commit `sha`.
    async fn create_branch(&self, repo: &RepoRef, branch: &str, sha: &str)
        -> Result<(), ApiError>;

    /// Reads a file on `branch`, or `None` if it does not exist.
    async fn file_on_branch(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
    ) -> Result<Option<RemoteFile>, ApiError>;

    /// Creates a new file on `branch`.
    async fn create_file(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
        content: &[u8],
        message: &str,
    ) -> Result<(), ApiError>;

    /// Updates an existing file on `branch`. `token` is the value observed
    /// via [`RepoClient::file_on_branch`]; a mismatch yields
    /// [`ApiError::Conflict`] and must never be retried with a forced write.
    async fn update_file(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
        content: &[u8],
        message: &str,
        token: &str,
    ) -> Result<(), ApiError>;
}
