//! Enumerates frameworks, scopes and variants of the package tree.
//!
//! Absence is not an error here: a missing or unreadable directory lists
//! as empty. Names come back sorted, so repeated calls over an unchanged
//! tree return identical results.

use std::path::{Path, PathBuf};

use crate::library::PackageLibrary;
use crate::store::is_valid_segment;
use crate::{MANIFEST_FILE, UNIVERSAL};

impl PackageLibrary {
    /// Framework directories of `tenant`.
    pub fn list_frameworks(&self, tenant: &str) -> Vec<String> {
        if !self.accepts_tenant(tenant) {
            return Vec::new();
        }
        self.subdirectories(Path::new(tenant))
    }

    /// Scope directories of one framework.
    pub fn list_scopes(&self, tenant: &str, framework: &str) -> Vec<String> {
        if !self.accepts_tenant(tenant) || !is_valid_segment(framework) {
            return Vec::new();
        }
        self.subdirectories(&[tenant, framework].iter().collect::<PathBuf>())
    }

    /// Publishable variants of one scope, `universal` first.
    ///
    /// A directory only counts as a variant when it carries a
    /// `manifest.json` marker; other subfolders are incidental.
    pub fn list_variants(&self, tenant: &str, framework: &str, scope: &str) -> Vec<String> {
        if !self.accepts_tenant(tenant) || !is_valid_segment(framework) || !is_valid_segment(scope)
        {
            return Vec::new();
        }

        let scope_dir: PathBuf = [tenant, framework, scope].iter().collect();
        let mut variants = Vec::new();

        if self.has_marker(&scope_dir) {
            variants.push(UNIVERSAL.to_string());
        }

        for name in self.subdirectories(&scope_dir) {
            // The sentinel always means the scope root.
            if name == UNIVERSAL {
                tracing::warn!(
                    "Ignoring '{}' directory under {}",
                    UNIVERSAL,
                    scope_dir.display()
                );
                continue;
            }
            if self.has_marker(&scope_dir.join(&name)) {
                variants.push(name);
            } else {
                tracing::debug!(
                    "Skipping {}/{}: no {}",
                    scope_dir.display(),
                    name,
                    MANIFEST_FILE
                );
            }
        }

        variants
    }

    pub(crate) fn has_marker(&self, dir: &Path) -> bool {
        self.store().file_exists(&dir.join(MANIFEST_FILE))
    }

    fn subdirectories(&self, dir: &Path) -> Vec<String> {
        if !self.store().dir_exists(dir) {
            return Vec::new();
        }

        match self.store().list_dir(dir) {
            Ok(entries) => entries
                .into_iter()
                .filter(|e| e.is_dir() && is_valid_segment(&e.name))
                .map(|e| e.name)
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to list {}: {}", dir.display(), e);
                Vec::new()
            }
        }
    }
}
