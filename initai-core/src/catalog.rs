//! Composes scanner output into the nested [`Catalog`] listing.

use crate::descriptions::{framework_description, scope_description, variant_description};
use crate::error::PackageError;
use crate::library::PackageLibrary;
use crate::models::{Catalog, FrameworkEntry, PackageNode, ScopeEntry, VariantEntry};

impl PackageLibrary {
    /// Build the catalog of every visible package of `tenant`.
    ///
    /// Scopes without variants and frameworks without scopes are dropped,
    /// so the catalog never advertises a dead link. An unknown tenant is
    /// rejected before the tree is read.
    pub fn build_catalog(&self, tenant: &str) -> Result<Catalog, PackageError> {
        if !self.accepts_tenant(tenant) {
            return Err(PackageError::InvalidTenant(tenant.to_string()));
        }

        let frameworks: Vec<FrameworkEntry> = self
            .list_frameworks(tenant)
            .into_iter()
            .filter_map(|framework| self.framework_entry(tenant, framework))
            .collect();

        tracing::debug!(
            "Built catalog for '{}' with {} frameworks",
            tenant,
            frameworks.len()
        );

        Ok(Catalog {
            tenant: tenant.to_string(),
            frameworks,
        })
    }

    fn framework_entry(&self, tenant: &str, framework: String) -> Option<FrameworkEntry> {
        let scopes: Vec<ScopeEntry> = self
            .list_scopes(tenant, &framework)
            .into_iter()
            .filter_map(|scope| self.scope_entry(tenant, &framework, scope))
            .collect();

        if scopes.is_empty() {
            tracing::debug!("Dropping framework '{}': no publishable scopes", framework);
            return None;
        }

        Some(FrameworkEntry {
            description: framework_description(&framework),
            name: framework,
            scopes,
        })
    }

    fn scope_entry(&self, tenant: &str, framework: &str, scope: String) -> Option<ScopeEntry> {
        let variants: Vec<VariantEntry> = self
            .list_variants(tenant, framework, &scope)
            .into_iter()
            .map(|variant| {
                let node = PackageNode::new(tenant, framework, scope.as_str(), variant);
                VariantEntry {
                    description: variant_description(&node.variant),
                    download_url: node.download_url(),
                    name: node.variant,
                }
            })
            .collect();

        if variants.is_empty() {
            tracing::debug!("Dropping scope '{}/{}': no variants", framework, scope);
            return None;
        }

        Some(ScopeEntry {
            description: scope_description(&scope),
            name: scope,
            variants,
        })
    }
}
