use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::UNIVERSAL;

/// One selectable download unit.
///
/// `variant` is an open set: any directory name is a valid LLM identifier,
/// so a new LLM is supported by publishing a folder, not by changing code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageNode {
    pub tenant: String,
    pub framework: String,
    pub scope: String,
    pub variant: String,
}

impl PackageNode {
    pub fn new(
        tenant: impl Into<String>,
        framework: impl Into<String>,
        scope: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            framework: framework.into(),
            scope: scope.into(),
            variant: variant.into(),
        }
    }

    /// Node for the scope-root package.
    pub fn universal(
        tenant: impl Into<String>,
        framework: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::new(tenant, framework, scope, UNIVERSAL)
    }

    /// Node for an optional llm segment, as it arrives from a URL.
    pub fn from_request(
        tenant: impl Into<String>,
        framework: impl Into<String>,
        scope: impl Into<String>,
        llm: Option<String>,
    ) -> Self {
        Self::new(
            tenant,
            framework,
            scope,
            llm.unwrap_or_else(|| UNIVERSAL.to_string()),
        )
    }

    pub fn is_universal(&self) -> bool {
        self.variant == UNIVERSAL
    }

    /// Scope-root directory, relative to the store root.
    pub fn scope_dir(&self) -> PathBuf {
        [&self.tenant, &self.framework, &self.scope].iter().collect()
    }

    /// Directory of the llm-specific variant, relative to the store root.
    ///
    /// For the universal variant this is the scope root itself.
    pub fn variant_dir(&self) -> PathBuf {
        let dir = self.scope_dir();
        if self.is_universal() {
            dir
        } else {
            dir.join(&self.variant)
        }
    }

    /// Canonical download URL; the llm segment is omitted for universal.
    pub fn download_url(&self) -> String {
        let base = format!("/init/{}/{}/{}", self.tenant, self.framework, self.scope);
        if self.is_universal() {
            base
        } else {
            format!("{}/{}", base, self.variant)
        }
    }

    /// Attachment filename offered to HTTP clients.
    pub fn archive_filename(&self) -> String {
        format!("{}-{}-{}-init.zip", self.framework, self.scope, self.variant)
    }
}

impl fmt::Display for PackageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.tenant, self.framework, self.scope, self.variant
        )
    }
}

/// A single file picked up by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// File name; also the entry name inside the archive.
    pub name: String,
    /// Path relative to the tenant directory, e.g. `bliss/backend/claude/init.md`.
    pub relative_path: String,
    pub content: Vec<u8>,
}

impl ResolvedFile {
    pub fn new(name: impl Into<String>, relative_path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            content,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Files gathered from exactly one resolved directory, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFileSet {
    /// The variant the files actually came from. Differs from the requested
    /// one when the resolver fell back to the universal package.
    pub resolved_variant: String,
    pub files: Vec<ResolvedFile>,
}

impl ResolvedFileSet {
    pub fn new(resolved_variant: impl Into<String>, files: Vec<ResolvedFile>) -> Self {
        Self {
            resolved_variant: resolved_variant.into(),
            files,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedFile> {
        self.files.iter()
    }
}

/// A finished archive, ready to be sent or written to disk.
#[derive(Debug, Clone)]
pub struct PackageArchive {
    pub filename: String,
    pub bytes: Vec<u8>,
}
