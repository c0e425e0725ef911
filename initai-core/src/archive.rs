//! Builds the generated manifest and the in-memory zip archive.
//!
//! The archive is assembled completely in a memory buffer and only
//! returned once every entry was written, so callers never see a partial
//! zip.

use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::descriptions::{install_instructions, package_description};
use crate::error::PackageError;
use crate::models::{
    Manifest, ManifestFile, ManifestMetadata, PackageNode, ResolvedFileSet, MANIFEST_VERSION,
};
use crate::MANIFEST_FILE;

/// Describe `files` as a manifest for `node`, stamped with `created_at`.
pub fn build_manifest(
    node: &PackageNode,
    files: &ResolvedFileSet,
    created_at: DateTime<Utc>,
) -> Manifest {
    Manifest {
        version: MANIFEST_VERSION.to_string(),
        tenant: node.tenant.clone(),
        framework: node.framework.clone(),
        scope: node.scope.clone(),
        llm: node.variant.clone(),
        created_at,
        files: files
            .iter()
            .map(|f| ManifestFile {
                name: f.name.clone(),
                path: f.relative_path.clone(),
                size: f.size(),
            })
            .collect(),
        metadata: ManifestMetadata {
            description: package_description(node),
            install_instructions: install_instructions(node),
        },
    }
}

/// Assemble the archive for `node`, timestamped now.
pub fn assemble(node: &PackageNode, files: &ResolvedFileSet) -> Result<Vec<u8>, PackageError> {
    assemble_at(node, files, Utc::now())
}

/// Assemble the archive for `node` with an explicit build timestamp.
///
/// Entries are written flat at the archive root: the generated
/// `manifest.json` first, then every file in the order given. A package
/// file that is itself named `manifest.json` is written as a second entry
/// of the same name.
pub fn assemble_at(
    node: &PackageNode,
    files: &ResolvedFileSet,
    created_at: DateTime<Utc>,
) -> Result<Vec<u8>, PackageError> {
    let manifest = build_manifest(node, files, created_at);
    let manifest_json = serde_json::to_vec_pretty(&manifest)?;

    // Entry timestamps stay at the zip epoch so identical inputs give identical bytes.
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file(MANIFEST_FILE, options)?;
    zip.write_all(&manifest_json)?;

    for file in files.iter() {
        if file.name == MANIFEST_FILE {
            tracing::debug!(
                "{} ships its own {}; writing both entries",
                node,
                MANIFEST_FILE
            );
        }
        zip.start_file(file.name.as_str(), options)?;
        zip.write_all(&file.content)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
