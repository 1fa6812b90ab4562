//! Single-repository harvest: tree walk, manifest extraction, record assembly.

use thiserror::Error;
use tracing::warn;

use crate::harvest::manifest::{parse_manifest, ManifestInfo};
use crate::harvest::preview::find_preview_image;
use crate::model::{CatalogRecord, RepoRef, NO_PREVIEW};
use crate::traits::{ApiError, RepoClient};

const MANIFEST_FILE_NAME: &str = "about.xml";

/// The repository could not be read at all (deleted, permissions changed,
/// default branch unresolvable). The repository is skipped; the run goes on.
#[derive(Error, Debug)]
#[error("cannot access {repo}: {source}")]
pub struct RepositoryAccessError {
    pub repo: RepoRef,
    #[source]
    pub source: ApiError,
}

impl RepositoryAccessError {
    fn new(repo: &RepoRef, source: ApiError) -> Self {
        Self {
            repo: repo.clone(),
            source,
        }
    }
}

/// Locates every manifest in the tree at `revision` with a single recursive
/// listing call, keeping API cost at O(1) per repository regardless of depth.
pub async fn locate_manifests(
    client: &dyn RepoClient,
    repo: &RepoRef,
    revision: &str,
) -> Result<Vec<String>, RepositoryAccessError> {
    let tree = client
        .recursive_tree(repo, revision)
        .await
        .map_err(|e| RepositoryAccessError::new(repo, e))?;
    Ok(tree
        .into_iter()
        .filter(|entry| entry.is_blob && is_manifest_path(&entry.path))
        .map(|entry| entry.path)
        .collect())
}

/// Harvests one repository into zero or more catalog records.
///
/// A failure to fetch one manifest skips only that manifest; a malformed
/// manifest yields an all-sentinel record. Only failures that make the whole
/// repository unreadable bubble up.
pub async fn harvest_repository(
    client: &dyn RepoClient,
    repo: &RepoRef,
) -> Result<Vec<CatalogRecord>, RepositoryAccessError> {
    let info = client
        .repo_info(repo)
        .await
        .map_err(|e| RepositoryAccessError::new(repo, e))?;
    let manifests = locate_manifests(client, repo, &info.default_branch).await?;

    let mut records = Vec::with_capacity(manifests.len());
    for manifest_path in manifests {
        match harvest_manifest(client, repo, info.id, &info.default_branch, &manifest_path).await {
            Ok(record) => records.push(record),
            Err(error) => warn!(
                repo = %repo,
                manifest = %manifest_path,
                %error,
                "skipping unreadable manifest"
            ),
        }
    }
    Ok(records)
}

async fn harvest_manifest(
    client: &dyn RepoClient,
    repo: &RepoRef,
    repo_id: u64,
    revision: &str,
    manifest_path: &str,
) -> Result<CatalogRecord, ApiError> {
    let about_dir = parent_dir(manifest_path);
    let mod_root = parent_dir(about_dir);

    let raw = client.raw_file(repo, revision, manifest_path).await?;
    let text = String::from_utf8_lossy(&raw);
    let info = match parse_manifest(&text) {
        Ok(info) => info,
        Err(error) => {
            warn!(repo = %repo, manifest = %manifest_path, %error, "defaulting record");
            ManifestInfo::default()
        }
    };

    let preview_image = match client.list_dir(repo, revision, about_dir).await {
        Ok(entries) => find_preview_image(&entries).unwrap_or_else(|| NO_PREVIEW.to_string()),
        Err(error) => {
            warn!(repo = %repo, dir = %about_dir, %error, "preview lookup failed");
            NO_PREVIEW.to_string()
        }
    };

    Ok(CatalogRecord {
        repo_id,
        owner: repo.owner.clone(),
        repo_name: repo.name.clone(),
        mod_root_path: mod_root.to_string(),
        name: info.name,
        description: info.description,
        package_id: info.package_id,
        supported_versions: info.supported_versions,
        dependencies: info.dependencies,
        preview_image,
    })
}

fn is_manifest_path(path: &str) -> bool {
    file_name(path).eq_ignore_ascii_case(MANIFEST_FILE_NAME)
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}
