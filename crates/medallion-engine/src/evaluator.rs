//! Domain consistency evaluation
//!
//! Runs the layer heuristics over all four layers of one domain and
//! classifies the domain by issue count. Evaluation borrows the catalog
//! read-only and is idempotent.

use std::borrow::Cow;
use medallion_core::{
    DomainCatalog, DomainReport, DomainStatus, HeuristicThresholds, Layer, LayerCounts, Relationship,
};
use crate::heuristic::{LayerHealth, LayerStats};
use crate::indexer::RelationshipIndex;
use crate::derivation::{derive_layer_relationships, derive_logical_relationships};
use crate::star_schema::derive_star_relationships;

/// Evaluates one domain at a time
#[derive(Debug, Clone, Default)]
pub struct DomainEvaluator {
    health: LayerHealth,
    derive_relationships: bool,
}

impl DomainEvaluator {
    /// Create an evaluator with the given calibration
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self {
            health: LayerHealth::new(thresholds),
            derive_relationships: false,
        }
    }

    /// Substitute derived edges for any empty relationship list
    pub fn with_derived_relationships(mut self, enabled: bool) -> Self {
        self.derive_relationships = enabled;
        self
    }

    pub fn thresholds(&self) -> &HeuristicThresholds {
        self.health.thresholds()
    }

    /// Relationships evaluated for a layer
    ///
    /// Declared relationships, except for an empty list when derivation is
    /// enabled.
    pub fn effective_relationships<'c>(&self, catalog: &'c DomainCatalog, layer: Layer) -> Cow<'c, [Relationship]> {
        let declared = catalog.relationships(layer);
        if !self.derive_relationships || !declared.is_empty() {
            return Cow::Borrowed(declared);
        }

        let derived = match layer {
            Layer::Logical => derive_logical_relationships(&catalog.logical.nodes),
            Layer::Bronze => derive_layer_relationships(&catalog.bronze.nodes),
            Layer::Silver => derive_layer_relationships(&catalog.silver.nodes),
            Layer::Gold => derive_star_relationships(&catalog.gold.dimensions, &catalog.gold.facts),
        };
        Cow::Owned(derived)
    }

    /// Heuristic inputs for every layer, in evaluation order
    pub fn layer_stats(&self, catalog: &DomainCatalog) -> [LayerStats; 4] {
        let count = |layer: Layer| RelationshipIndex::new(&self.effective_relationships(catalog, layer)).count();

        [
            LayerStats::plain(Layer::Logical, catalog.node_count(Layer::Logical), count(Layer::Logical)),
            LayerStats::plain(Layer::Bronze, catalog.node_count(Layer::Bronze), count(Layer::Bronze)),
            LayerStats::plain(Layer::Silver, catalog.node_count(Layer::Silver), count(Layer::Silver)),
            LayerStats::gold(catalog.gold.dimensions.len(), catalog.gold.facts.len(), count(Layer::Gold)),
        ]
    }

    /// Evaluate one domain
    pub fn evaluate(&self, catalog: &DomainCatalog) -> DomainReport {
        let [logical, bronze, silver, gold] = self.layer_stats(catalog);

        let issues: Vec<_> = [&logical, &bronze, &silver, &gold]
            .into_iter()
            .flat_map(|stats| self.health.check(stats))
            .collect();

        let counts = LayerCounts {
            logical_entities: logical.node_count,
            logical_relationships: logical.relationship_count,
            bronze_tables: bronze.node_count,
            bronze_relationships: bronze.relationship_count,
            silver_tables: silver.node_count,
            silver_relationships: silver.relationship_count,
            gold_dimensions: gold.dimension_count,
            gold_facts: gold.fact_count,
            gold_relationships: gold.relationship_count,
        };

        let status = DomainStatus::classify(issues.len(), self.thresholds().warn_max_issues);

        tracing::debug!(
            domain = %catalog.id,
            issues = issues.len(),
            status = %status,
            "domain evaluated"
        );

        DomainReport {
            domain_id: catalog.id.clone(),
            domain_name: catalog.display_name().to_string(),
            total_relationships: counts.total_relationships(),
            counts,
            issues,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medallion_core::{Cardinality, EntityDefinition, IssueCode, TableDefinition};

    fn tables(prefix: &str, n: usize) -> Vec<TableDefinition> {
        (0..n).map(|i| TableDefinition::new(format!("{}{}", prefix, i))).collect()
    }

    #[test]
    fn empty_domain_passes() {
        let report = DomainEvaluator::default().evaluate(&DomainCatalog::new("empty"));
        assert!(report.issues.is_empty());
        assert_eq!(report.status, DomainStatus::Pass);
        assert_eq!(report.total_relationships, 0);
    }

    #[test]
    fn disconnected_bronze_warns() {
        let mut catalog = DomainCatalog::new("deposits");
        catalog.bronze.nodes = tables("bronze.t", 5);

        let report = DomainEvaluator::default().evaluate(&catalog);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].layer, Layer::Bronze);
        assert_eq!(report.status, DomainStatus::Warn);
        assert_eq!(report.counts.bronze_tables, 5);
    }

    #[test]
    fn issues_are_ordered_by_layer() {
        let mut catalog = DomainCatalog::new("loans");
        catalog.gold.dimensions = tables("gold.dim_", 2);
        catalog.gold.facts = tables("gold.fact_", 1);
        catalog.silver.nodes = tables("silver.t", 4);
        catalog.logical.nodes = vec![EntityDefinition::new("Loan")];

        let report = DomainEvaluator::default().evaluate(&catalog);
        let layers: Vec<Layer> = report.issues.iter().map(|i| i.layer).collect();
        assert_eq!(layers, vec![Layer::Logical, Layer::Silver, Layer::Gold, Layer::Gold]);
        assert_eq!(report.status, DomainStatus::Fail);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut catalog = DomainCatalog::new("fraud");
        catalog.bronze.nodes = tables("bronze.t", 7);
        let evaluator = DomainEvaluator::default();

        assert_eq!(evaluator.evaluate(&catalog), evaluator.evaluate(&catalog));
    }

    #[test]
    fn derived_gold_relationships_fill_empty_star() {
        let mut catalog = DomainCatalog::new("cards");
        catalog.gold.dimensions = vec![
            TableDefinition::new("gold.dim_date"),
            TableDefinition::new("gold.dim_customer"),
            TableDefinition::new("gold.dim_card"),
        ];
        catalog.gold.facts = vec![TableDefinition::new("gold.fact_card_spend")];

        let plain = DomainEvaluator::default().evaluate(&catalog);
        assert_eq!(plain.issues.len(), 2);

        let derived = DomainEvaluator::default()
            .with_derived_relationships(true)
            .evaluate(&catalog);
        assert_eq!(derived.counts.gold_relationships, 3);
        assert!(derived.issues.is_empty());
        assert!(catalog.gold.relationships.is_empty());
    }

    #[test]
    fn derived_relationships_fill_empty_logical_and_bronze_layers() {
        let mut catalog = DomainCatalog::new("cards");
        catalog.logical.nodes = vec![EntityDefinition::new("Customer"), EntityDefinition::new("Account")];
        catalog.bronze.nodes = vec![
            TableDefinition::new("bronze.customer_master"),
            TableDefinition::new("bronze.account_master")
                .with_inline_schema([("account_id", "BIGINT"), ("customer_id", "BIGINT")])
                .with_primary_key(["account_id"]),
            TableDefinition::new("bronze.card_master")
                .with_inline_schema([("card_id", "BIGINT"), ("account_id", "BIGINT")])
                .with_primary_key(["card_id"]),
            TableDefinition::new("bronze.card_transactions_raw")
                .with_inline_schema([("txn_id", "BIGINT"), ("card_id", "BIGINT")])
                .with_primary_key(["txn_id"]),
        ];

        let plain = DomainEvaluator::default().evaluate(&catalog);
        let layers: Vec<Layer> = plain.issues.iter().map(|i| i.layer).collect();
        assert_eq!(layers, vec![Layer::Logical, Layer::Bronze]);

        let derived = DomainEvaluator::default()
            .with_derived_relationships(true)
            .evaluate(&catalog);
        assert_eq!(derived.counts.logical_relationships, 1);
        assert_eq!(derived.counts.bronze_relationships, 3);
        assert!(derived.issues.is_empty());
        assert_eq!(derived.status, DomainStatus::Pass);
        assert!(catalog.bronze.relationships.is_empty());
    }

    #[test]
    fn declared_gold_relationships_are_not_replaced() {
        let mut catalog = DomainCatalog::new("cards");
        catalog.gold.dimensions = tables("gold.dim_", 4);
        catalog.gold.facts = tables("gold.fact_", 2);
        catalog.gold.relationships =
            vec![Relationship::new("g1", "gold.fact_0", "gold.dim_0", Cardinality::ManyToOne)];

        let report = DomainEvaluator::default()
            .with_derived_relationships(true)
            .evaluate(&catalog);
        assert_eq!(report.counts.gold_relationships, 1);
        assert_eq!(report.issues[0].code, IssueCode::StarSchemaSparse);
    }
}
