use serde::{Deserialize, Serialize};

/// Every visible package of one tenant, nested framework → scope → variant.
///
/// Built fresh on each call and never persisted. Empty branches are pruned
/// before a catalog is returned, so every `download_url` resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub tenant: String,
    pub frameworks: Vec<FrameworkEntry>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }

    pub fn framework(&self, name: &str) -> Option<&FrameworkEntry> {
        self.frameworks.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkEntry {
    pub name: String,
    pub description: String,
    pub scopes: Vec<ScopeEntry>,
}

impl FrameworkEntry {
    pub fn scope(&self, name: &str) -> Option<&ScopeEntry> {
        self.scopes.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeEntry {
    pub name: String,
    pub description: String,
    pub variants: Vec<VariantEntry>,
}

impl ScopeEntry {
    pub fn variant(&self, name: &str) -> Option<&VariantEntry> {
        self.variants.iter().find(|v| v.name == name)
    }
}

/// A downloadable variant. `name` is `universal` or an LLM identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantEntry {
    pub name: String,
    pub description: String,
    pub download_url: String,
}
