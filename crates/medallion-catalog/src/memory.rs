//! In-memory registry
//!
//! Holds catalogs built in code. Useful for:
//! - Unit testing the evaluator with synthetic domains
//! - Embedding the engine where catalogs come from another source

use crate::registry::{CatalogError, CatalogRegistry};
use medallion_core::DomainCatalog;

/// Registry backed by a list of catalogs, in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    catalogs: Vec<DomainCatalog>,
}

impl InMemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from catalogs, rejecting duplicate ids
    pub fn from_catalogs(
        catalogs: impl IntoIterator<Item = DomainCatalog>,
    ) -> Result<Self, CatalogError> {
        let mut registry = Self::new();
        for catalog in catalogs {
            registry.insert(catalog)?;
        }
        Ok(registry)
    }

    /// Register a catalog
    pub fn insert(&mut self, catalog: DomainCatalog) -> Result<(), CatalogError> {
        if self.lookup(&catalog.id).is_some() {
            return Err(CatalogError::DuplicateDomain(catalog.id));
        }
        self.catalogs.push(catalog);
        Ok(())
    }

    /// Registered catalogs, in insertion order
    pub fn catalogs(&self) -> &[DomainCatalog] {
        &self.catalogs
    }
}

impl CatalogRegistry for InMemoryRegistry {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn domain_ids(&self) -> Vec<String> {
        self.catalogs.iter().map(|c| c.id.clone()).collect()
    }

    fn lookup(&self, domain_id: &str) -> Option<&DomainCatalog> {
        self.catalogs.iter().find(|c| c.id == domain_id)
    }

    fn len(&self) -> usize {
        self.catalogs.len()
    }
}
