//! Maps a requested [`PackageNode`] to the flat set of files to package.

use std::io;
use std::path::Path;

use crate::error::PackageError;
use crate::library::PackageLibrary;
use crate::models::{PackageNode, ResolvedFile, ResolvedFileSet};
use crate::store::{is_valid_segment, StoreEntry};
use crate::UNIVERSAL;

const ARCHIVE_SUFFIX: &str = ".zip";

impl PackageLibrary {
    /// Resolve `node` to the files of exactly one directory.
    ///
    /// Fallback order:
    /// 1. the llm-specific directory, when an llm was requested and it exists;
    /// 2. the scope root (universal variant), when it exists;
    /// 3. the llm-specific path regardless, so the listing error of the
    ///    genuinely missing directory is what surfaces.
    ///
    /// Only regular files directly inside the directory are taken; `.zip`
    /// files and subdirectories are skipped. A directory that yields no
    /// files is `Empty`, a missing one is `NotFound`.
    pub fn resolve(&self, node: &PackageNode) -> Result<ResolvedFileSet, PackageError> {
        if !self.accepts_tenant(&node.tenant) {
            return Err(PackageError::InvalidTenant(node.tenant.clone()));
        }
        if ![&node.framework, &node.scope, &node.variant]
            .iter()
            .all(|s| is_valid_segment(s))
        {
            tracing::warn!("Rejected package path segments for {}", node);
            return Err(PackageError::NotFound(node.clone()));
        }

        let llm_dir = node.variant_dir();
        let scope_dir = node.scope_dir();

        let (dir, resolved_variant) = if !node.is_universal() && self.store().dir_exists(&llm_dir)
        {
            (llm_dir, node.variant.as_str())
        } else if self.store().dir_exists(&scope_dir) {
            (scope_dir, UNIVERSAL)
        } else {
            (llm_dir, node.variant.as_str())
        };

        tracing::debug!(
            "Resolving {} from {} ({})",
            node,
            dir.display(),
            resolved_variant
        );

        let entries = self.store().list_dir(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PackageError::NotFound(node.clone()),
            _ => PackageError::from(e),
        })?;

        let files = entries
            .into_iter()
            .filter(is_packageable)
            .map(|entry| self.read_entry(&node.tenant, &dir, entry))
            .collect::<Result<Vec<_>, _>>()?;

        if files.is_empty() {
            return Err(PackageError::Empty(node.clone()));
        }

        Ok(ResolvedFileSet::new(resolved_variant, files))
    }

    fn read_entry(
        &self,
        tenant: &str,
        dir: &Path,
        entry: StoreEntry,
    ) -> Result<ResolvedFile, PackageError> {
        let path = dir.join(&entry.name);
        let content = self.store().read_file(&path).map_err(|e| {
            PackageError::Assembly(format!("failed to read {}: {}", path.display(), e))
        })?;
        let relative_path = path
            .strip_prefix(tenant)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Ok(ResolvedFile::new(entry.name, relative_path, content))
    }
}

fn is_packageable(entry: &StoreEntry) -> bool {
    entry.is_file() && !entry.name.ends_with(ARCHIVE_SUFFIX)
}
