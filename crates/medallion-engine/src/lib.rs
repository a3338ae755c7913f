//! Medallion engine - catalog consistency evaluation
//!
//! This crate implements:
//! - Relationship indexing and node-set filtering
//! - Per-layer health heuristics
//! - Domain consistency evaluation (PASS / WARN / FAIL)
//! - Batch evaluation over a catalog registry
//! - Relationship derivation for layers that declare none

pub mod indexer;
pub mod heuristic;
pub mod derivation;
pub mod star_schema;
pub mod evaluator;
pub mod batch;

pub use indexer::{RelationshipIndex, filter_relationships};
pub use heuristic::{LayerHealth, LayerStats, expected_gold_relationships};
pub use derivation::{derive_layer_relationships, derive_logical_relationships};
pub use star_schema::derive_star_relationships;
pub use evaluator::DomainEvaluator;
pub use batch::BatchRunner;
