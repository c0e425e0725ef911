use thiserror::Error;

use crate::models::PackageNode;

/// Failure taxonomy shared by the resolver and the archive assembler.
///
/// Absence is never an I/O error: a missing package is `NotFound`, a
/// misconfigured one is `Empty`. Only unexpected failures while reading
/// or serializing become `Assembly`.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The tenant segment does not match the configured namespace.
    #[error("unknown tenant '{0}'")]
    InvalidTenant(String),

    /// Neither the requested variant nor the universal fallback exists.
    #[error("package not found: {0}")]
    NotFound(PackageNode),

    /// The resolved directory exists but holds no packageable files.
    #[error("package has no files: {0}")]
    Empty(PackageNode),

    /// Reading a package file or writing the archive failed.
    #[error("failed to assemble package: {0}")]
    Assembly(String),
}

impl PackageError {
    /// Short machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTenant(_) => "invalid_tenant",
            Self::NotFound(_) => "not_found",
            Self::Empty(_) => "empty",
            Self::Assembly(_) => "assembly_failure",
        }
    }
}

impl From<std::io::Error> for PackageError {
    fn from(e: std::io::Error) -> Self {
        Self::Assembly(e.to_string())
    }
}

impl From<zip::result::ZipError> for PackageError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Assembly(e.to_string())
    }
}

impl From<serde_json::Error> for PackageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Assembly(e.to_string())
    }
}
