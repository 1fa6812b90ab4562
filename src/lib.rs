pub mod catalog;
pub mod config;
pub mod github;
pub mod harvest;
pub mod model;
pub mod publish;
pub mod run;
pub mod seeds;
pub mod traits;

// Re-export common types for convenience
pub use config::HarvestConfig;
pub use model::{CatalogRecord, ModDependency, RepoRef, NO_PREVIEW, UNKNOWN};
pub use publish::{PublishError, PublishOutcome, Publisher};
pub use run::{run_once, RunError, RunSummary};
pub use traits::{ApiError, DirEntry, RemoteFile, RepoClient, RepoInfo, TreeEntry};
