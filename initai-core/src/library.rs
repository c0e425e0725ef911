use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::archive;
use crate::error::PackageError;
use crate::models::{PackageArchive, PackageNode};
use crate::store::{FsStore, PackageStore};
use crate::DEFAULT_TENANT;

/// Entry point to the package tree of one tenant.
///
/// Cloning is cheap; clones share the same store. Nothing is cached, every
/// call reads the tree again.
#[derive(Clone)]
pub struct PackageLibrary {
    store: Arc<dyn PackageStore>,
    tenant: String,
}

impl PackageLibrary {
    pub fn new(store: Arc<dyn PackageStore>, tenant: impl Into<String>) -> Self {
        Self {
            store,
            tenant: tenant.into(),
        }
    }

    /// Library over a directory on disk, serving the default tenant.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsStore::new(root)), DEFAULT_TENANT)
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    /// The one tenant this library serves.
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Cheap tenant check; never touches the store.
    pub fn accepts_tenant(&self, tenant: &str) -> bool {
        tenant == self.tenant
    }

    pub(crate) fn store(&self) -> &dyn PackageStore {
        self.store.as_ref()
    }

    /// Resolve `node` and assemble its archive in one step.
    pub fn download(&self, node: &PackageNode) -> Result<PackageArchive, PackageError> {
        let files = self.resolve(node)?;
        let bytes = archive::assemble(node, &files)?;
        tracing::info!(
            "Assembled {} ({} files from '{}', {} bytes)",
            node,
            files.len(),
            files.resolved_variant,
            bytes.len()
        );
        Ok(PackageArchive {
            filename: node.archive_filename(),
            bytes,
        })
    }
}

impl fmt::Debug for PackageLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageLibrary")
            .field("tenant", &self.tenant)
            .finish_non_exhaustive()
    }
}
