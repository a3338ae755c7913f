//! Directory-backed registry: one `<domain>.json` document per domain

use crate::memory::InMemoryRegistry;
use crate::registry::{CatalogError, CatalogRegistry};
use medallion_core::DomainCatalog;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Registry loaded eagerly from a directory of JSON catalogs
#[derive(Debug, Clone)]
pub struct DirectoryRegistry {
    root: PathBuf,
    inner: InMemoryRegistry,
}

impl DirectoryRegistry {
    /// Load every `*.json` file in `root`, in file name order
    pub fn load(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let root = root.as_ref().to_path_buf();

        let mut paths = Vec::new();
        for entry in WalkDir::new(&root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| CatalogError::IoError {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone()),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path.to_path_buf());
            }
        }

        let mut inner = InMemoryRegistry::new();
        for path in &paths {
            let catalog = load_catalog_file(path)?;
            tracing::debug!(domain = %catalog.id, path = %path.display(), "loaded domain catalog");
            inner.insert(catalog)?;
        }

        tracing::info!(root = %root.display(), domains = inner.len(), "catalog directory loaded");

        Ok(Self { root, inner })
    }

    /// Directory the catalogs were loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CatalogRegistry for DirectoryRegistry {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn domain_ids(&self) -> Vec<String> {
        self.inner.domain_ids()
    }

    fn lookup(&self, domain_id: &str) -> Option<&DomainCatalog> {
        self.inner.lookup(domain_id)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Parse a single catalog document
pub fn load_catalog_file(path: &Path) -> Result<DomainCatalog, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&contents).map_err(|e| CatalogError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
