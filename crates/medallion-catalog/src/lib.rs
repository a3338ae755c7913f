//! Domain catalog registries
//!
//! The evaluation engine only needs a lookup capability (`id -> DomainCatalog`).
//! This crate defines that capability and two implementations:
//! - [`InMemoryRegistry`] for catalogs built in code (tests, embedding)
//! - [`DirectoryRegistry`] for one JSON document per domain on disk
//!
//! ## Example
//!
//! ```rust,ignore
//! use medallion_catalog::{CatalogRegistry, DirectoryRegistry};
//!
//! let registry = DirectoryRegistry::load("catalog")?;
//! for id in registry.domain_ids() {
//!     let catalog = registry.get(&id)?;
//!     println!("{}: {} relationships", id, catalog.total_relationships());
//! }
//! ```

pub mod registry;
pub mod memory;
pub mod directory;

pub use registry::{CatalogRegistry, CatalogError};
pub use memory::InMemoryRegistry;
pub use directory::{DirectoryRegistry, load_catalog_file};
