//! Harvest pipeline: locate manifests, parse them, assemble catalog records.
//!
//! - [`manifest`]: schema-tolerant manifest parsing with sentinel defaults
//! - [`preview`]: deterministic preview-image discovery
//! - [`repository`]: tree walk + per-manifest record assembly for one repo
//! - [`pipeline`]: bounded-concurrency fan-out across all tracked repos

pub mod manifest;
pub mod pipeline;
pub mod preview;
pub mod repository;

pub use manifest::{parse_manifest, ManifestInfo, ManifestParseError};
pub use pipeline::ConcurrentHarvester;
pub use preview::find_preview_image;
pub use repository::{harvest_repository, locate_manifests, RepositoryAccessError};
