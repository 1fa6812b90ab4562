//! Schema-tolerant manifest parsing.
//!
//! A manifest is a small XML document (`About/about.xml`) declaring a mod's
//! identity, supported versions, and dependencies. Fields are extracted
//! best-effort: each absent or empty field independently falls back to its
//! sentinel, so one missing element never discards the rest of the record.

use roxmltree::{Document, Node};
use thiserror::Error;

use crate::model::{ModDependency, UNKNOWN};

/// Structural parse failure of a manifest document. Recoverable: the caller
/// substitutes [`ManifestInfo::default`] and keeps processing siblings.
#[derive(Error, Debug)]
#[error("malformed manifest: {0}")]
pub struct ManifestParseError(#[from] roxmltree::Error);

/// Fields extracted from one manifest, sentinel-defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    pub name: String,
    pub description: String,
    pub package_id: String,
    pub supported_versions: Vec<String>,
    pub dependencies: Vec<ModDependency>,
}

impl Default for ManifestInfo {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            description: UNKNOWN.to_string(),
            package_id: UNKNOWN.to_string(),
            supported_versions: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

/// Parses raw manifest text.
///
/// Returns `Err` only on malformed markup; a well-formed document with any
/// combination of missing elements still yields `Ok`.
pub fn parse_manifest(text: &str) -> Result<ManifestInfo, ManifestParseError> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();

    let supported_versions = root
        .children()
        .find(|n| n.has_tag_name("supportedVersions"))
        .map(|node| list_items(node).filter_map(|li| element_text(&li)).collect())
        .unwrap_or_default();

    let dependencies = root
        .children()
        .find(|n| n.has_tag_name("modDependencies"))
        .map(|node| list_items(node).map(|li| parse_dependency(&li)).collect())
        .unwrap_or_default();

    Ok(ManifestInfo {
        name: child_text_or_unknown(&root, "name"),
        description: child_text_or_unknown(&root, "description"),
        package_id: child_text_or_unknown(&root, "packageId"),
        supported_versions,
        dependencies,
    })
}

fn parse_dependency(li: &Node<'_, '_>) -> ModDependency {
    ModDependency {
        package_id: child_text_or_unknown(li, "packageId"),
        display_name: child_text_or_unknown(li, "displayName"),
        steam_workshop_url: child_text_or_unknown(li, "steamWorkshopUrl"),
    }
}

fn list_items<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(|n| n.has_tag_name("li"))
}

fn child_text_or_unknown(node: &Node<'_, '_>, tag: &str) -> String {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| element_text(&n))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Trimmed text content; empty-after-trim counts as absent.
fn element_text(node: &Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
