//! Canonical catalog assembly and change detection.
//!
//! Serialization must be byte-for-byte deterministic for a fixed record set:
//! records are sorted by their identity key first, element order is fixed,
//! and the writer always emits 2-space-indented UTF-8. That determinism is
//! what makes fingerprint comparison meaningful.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::model::CatalogRecord;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to write catalog document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("failed to write catalog document: {0}")]
    Io(#[from] std::io::Error),
}

/// Orders records by the case-insensitive identity tuple, independent of
/// harvest completion order.
pub fn sort_records(records: &mut [CatalogRecord]) {
    records.sort_by_cached_key(CatalogRecord::sort_key);
}

/// Serializes the sorted record set into the canonical catalog document.
pub fn serialize(records: &[CatalogRecord]) -> Result<Vec<u8>, CatalogError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("repositories")))?;

    for record in records {
        write_record(&mut writer, record)?;
    }

    writer.write_event(Event::End(BytesEnd::new("repositories")))?;
    Ok(writer.into_inner())
}

/// Assembles the full document from an unordered record set.
pub fn assemble(mut records: Vec<CatalogRecord>) -> Result<Vec<u8>, CatalogError> {
    sort_records(&mut records);
    serialize(&records)
}

/// SHA-256 fingerprint of serialized content, hex-encoded.
pub fn fingerprint(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

fn write_record(
    writer: &mut Writer<Vec<u8>>,
    record: &CatalogRecord,
) -> Result<(), CatalogError> {
    writer.write_event(Event::Start(BytesStart::new("repository")))?;

    leaf(writer, "repo_id", &record.repo_id.to_string())?;
    leaf(writer, "owner", &record.owner)?;
    leaf(writer, "repo_name", &record.repo_name)?;
    leaf(writer, "mod_root_path", &record.mod_root_path)?;
    leaf(writer, "name", &record.name)?;
    leaf(writer, "description", &record.description)?;
    leaf(writer, "package_id", &record.package_id)?;

    if record.supported_versions.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("supported_versions")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("supported_versions")))?;
        for version in &record.supported_versions {
            leaf(writer, "version", version)?;
        }
        writer.write_event(Event::End(BytesEnd::new("supported_versions")))?;
    }

    if !record.dependencies.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("mod_dependencies")))?;
        for dep in &record.dependencies {
            writer.write_event(Event::Start(BytesStart::new("dependency")))?;
            leaf(writer, "package_id", &dep.package_id)?;
            leaf(writer, "display_name", &dep.display_name)?;
            leaf(writer, "steam_workshop_url", &dep.steam_workshop_url)?;
            writer.write_event(Event::End(BytesEnd::new("dependency")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("mod_dependencies")))?;
    }

    leaf(writer, "preview_image", &record.preview_image)?;
    writer.write_event(Event::End(BytesEnd::new("repository")))?;
    Ok(())
}

fn leaf(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<(), CatalogError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
