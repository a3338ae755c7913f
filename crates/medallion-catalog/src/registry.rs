//! Registry trait for looking up domain catalogs

use medallion_core::DomainCatalog;
use std::path::PathBuf;

/// Errors that can occur when loading or looking up catalogs
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    #[error("Duplicate domain id: {0}")]
    DuplicateDomain(String),

    #[error("IO error reading {}: {message}", .path.display())]
    IoError { path: PathBuf, message: String },

    #[error("Parse error in {}: {message}", .path.display())]
    ParseError { path: PathBuf, message: String },
}

/// Read-only lookup of domain catalogs by id
///
/// Catalogs must be fully resolved in memory before they are handed out;
/// evaluation never sees a partially loaded domain.
pub trait CatalogRegistry {
    /// Get the registry name (e.g. "memory", "directory")
    fn name(&self) -> &'static str;

    /// All registered domain ids, in registration order
    fn domain_ids(&self) -> Vec<String>;

    /// Look up a catalog by id
    fn lookup(&self, domain_id: &str) -> Option<&DomainCatalog>;

    /// Look up a catalog by id, treating an unknown id as an error
    fn get(&self, domain_id: &str) -> Result<&DomainCatalog, CatalogError> {
        self.lookup(domain_id)
            .ok_or_else(|| CatalogError::DomainNotFound(domain_id.to_string()))
    }

    /// Number of registered domains
    fn len(&self) -> usize {
        self.domain_ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
