use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for textual manifest fields that are absent or empty.
pub const UNKNOWN: &str = "unknown";

/// Sentinel used when a mod folder carries no preview image.
pub const NO_PREVIEW: &str = "none";

/// Identifies one tracked source repository as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One declared dependency of a mod, sentinel-defaulted per sub-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDependency {
    pub package_id: String,
    pub display_name: String,
    pub steam_workshop_url: String,
}

/// One discovered package: a single `About/about.xml` plus its surroundings.
///
/// Records are immutable once produced; the catalog is rebuilt from live
/// remote state on every run, so nothing here is persisted individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Stable identifier assigned by the hosting platform.
    pub repo_id: u64,
    pub owner: String,
    pub repo_name: String,
    /// Mod root directory relative to the repository root (parent of the
    /// manifest's containing folder). Empty string for a repository-root mod.
    pub mod_root_path: String,
    pub name: String,
    pub description: String,
    pub package_id: String,
    pub supported_versions: Vec<String>,
    pub dependencies: Vec<ModDependency>,
    /// Path of the preview image, or [`NO_PREVIEW`].
    pub preview_image: String,
}

impl CatalogRecord {
    /// Ordering key: case-insensitive (owner, repo_name, mod_root_path),
    /// with the case-sensitive tuple as a tie-break so the order is total.
    pub fn sort_key(&self) -> (String, String, String, String, String, String) {
        (
            self.owner.to_lowercase(),
            self.repo_name.to_lowercase(),
            self.mod_root_path.to_lowercase(),
            self.owner.clone(),
            self.repo_name.clone(),
            self.mod_root_path.clone(),
        )
    }
}
