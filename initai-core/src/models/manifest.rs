use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the generated manifest format.
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Descriptor generated for every archive and stored in it as `manifest.json`.
///
/// Field order here is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub tenant: String,
    pub framework: String,
    pub scope: String,
    pub llm: String,
    pub created_at: DateTime<Utc>,
    pub files: Vec<ManifestFile>,
    pub metadata: ManifestMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub name: String,
    pub path: String,
    /// Byte length of the file content.
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub description: String,
    pub install_instructions: String,
}
