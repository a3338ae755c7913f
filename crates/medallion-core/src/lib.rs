//! Medallion Core
//!
//! Core domain model for layered (logical / bronze / silver / gold) data catalogs.
//! Never rename issue codes or report fields - they are part of the public API.

pub mod schema;
pub mod relationship;
pub mod catalog;
pub mod issue;
pub mod report;
pub mod config;

pub use schema::{Column, ColumnSource, TableDefinition, EntityDefinition, CatalogNode};
pub use relationship::{Cardinality, Relationship};
pub use catalog::{Layer, LayerBundle, GoldLayer, DomainCatalog};
pub use issue::{IssueCode, ValidationIssue};
pub use report::{
    BatchReport, BatchSummary, DomainReport, DomainStatus, LayerCounts, PriorityGroup, ReportVersion,
};
pub use config::{Config, ConfigError, HeuristicThresholds, PriorityTier, PriorityTiers};
