//! Layer health heuristics
//!
//! Each layer is judged on its own from node and relationship counts. The
//! rules are soft calibration heuristics: they flag layers that look
//! under-connected, they do not prove a model complete or correct.
//!
//! - Logical: any entities but no relationships.
//! - Bronze / Silver: more than `small_layer_max_tables` tables but no
//!   relationships. Small layers (lookup-only sets) are exempt.
//! - Gold: facts and dimensions but no relationships.
//! - Gold: fewer than `expected_ratio` of the minimal-star estimate
//!   `facts * min(star_dimension_cap, dimensions)`.

use medallion_core::{HeuristicThresholds, IssueCode, Layer, ValidationIssue};

/// Counts the heuristics look at for one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerStats {
    pub layer: Layer,

    /// Entities or tables (gold: dimensions plus facts)
    pub node_count: usize,

    pub relationship_count: usize,

    /// Gold only
    pub dimension_count: usize,

    /// Gold only
    pub fact_count: usize,
}

impl LayerStats {
    /// Stats for a logical, bronze or silver layer
    pub fn plain(layer: Layer, node_count: usize, relationship_count: usize) -> Self {
        Self {
            layer,
            node_count,
            relationship_count,
            dimension_count: 0,
            fact_count: 0,
        }
    }

    /// Stats for the gold layer
    pub fn gold(dimension_count: usize, fact_count: usize, relationship_count: usize) -> Self {
        Self {
            layer: Layer::Gold,
            node_count: dimension_count + fact_count,
            relationship_count,
            dimension_count,
            fact_count,
        }
    }
}

/// Minimal-star relationship estimate: each fact references up to
/// `dimension_cap` dimensions, or all of them when there are fewer
pub fn expected_gold_relationships(fact_count: usize, dimension_count: usize, dimension_cap: usize) -> usize {
    fact_count * dimension_count.min(dimension_cap)
}

/// Applies the layer heuristics with a given calibration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerHealth {
    thresholds: HeuristicThresholds,
}

impl LayerHealth {
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HeuristicThresholds {
        &self.thresholds
    }

    /// Issues for one layer, in rule order
    pub fn check(&self, stats: &LayerStats) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        match stats.layer {
            Layer::Logical => {
                if stats.node_count > 0 && stats.relationship_count == 0 {
                    issues.push(disconnected(Layer::Logical));
                }
            }
            Layer::Bronze | Layer::Silver => {
                if stats.node_count > self.thresholds.small_layer_max_tables
                    && stats.relationship_count == 0
                {
                    issues.push(disconnected(stats.layer));
                }
            }
            Layer::Gold => {
                if stats.fact_count > 0 && stats.dimension_count > 0 && stats.relationship_count == 0 {
                    issues.push(ValidationIssue::new(
                        Layer::Gold,
                        IssueCode::StarSchemaMissing,
                        "No star schema relationships detected",
                    ));
                }

                let expected = expected_gold_relationships(
                    stats.fact_count,
                    stats.dimension_count,
                    self.thresholds.star_dimension_cap,
                );
                if (stats.relationship_count as f64) < expected as f64 * self.thresholds.expected_ratio {
                    issues.push(
                        ValidationIssue::new(
                            Layer::Gold,
                            IssueCode::StarSchemaSparse,
                            format!(
                                "Low relationship count ({} vs expected ~{})",
                                stats.relationship_count, expected
                            ),
                        )
                        .with_comparison(expected, stats.relationship_count),
                    );
                }
            }
        }

        for issue in &issues {
            tracing::debug!(layer = %stats.layer, code = %issue.code, "{}", issue.message);
        }

        issues
    }
}

fn disconnected(layer: Layer) -> ValidationIssue {
    ValidationIssue::new(layer, IssueCode::LayerDisconnected, "No relationships detected")
}
