//! Relationship indexing
//!
//! Counts a layer's relationships, associates each one with the nodes it
//! connects, and narrows the list to a selected node set. Filtering is a
//! selection, not validation: an edge whose endpoint is not selected is
//! dropped silently.

use medallion_core::Relationship;
use std::collections::{BTreeMap, HashSet};

/// Relationships of one layer, indexed by endpoint
#[derive(Debug, Clone)]
pub struct RelationshipIndex<'a> {
    relationships: &'a [Relationship],

    /// node name -> relationships touching it (as source or target)
    by_node: BTreeMap<&'a str, Vec<&'a Relationship>>,
}

impl<'a> RelationshipIndex<'a> {
    /// Index a layer's relationship list
    pub fn new(relationships: &'a [Relationship]) -> Self {
        let mut by_node: BTreeMap<&'a str, Vec<&'a Relationship>> = BTreeMap::new();

        for rel in relationships {
            by_node.entry(rel.from_table.as_str()).or_default().push(rel);
            if rel.to_table != rel.from_table {
                by_node.entry(rel.to_table.as_str()).or_default().push(rel);
            }
        }

        Self { relationships, by_node }
    }

    /// Total number of relationships
    pub fn count(&self) -> usize {
        self.relationships.len()
    }

    /// Relationships touching a node
    pub fn for_node(&self, node: &str) -> &[&'a Relationship] {
        self.by_node.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of relationships touching a node
    pub fn degree(&self, node: &str) -> usize {
        self.for_node(node).len()
    }

    /// Nodes from `nodes` that no relationship touches, in input order
    pub fn unconnected<'n>(&self, nodes: impl IntoIterator<Item = &'n str>) -> Vec<&'n str> {
        nodes.into_iter().filter(|n| self.degree(n) == 0).collect()
    }

    /// Relationships whose endpoints both belong to `nodes`, in declaration order
    pub fn filter_to<'n>(&self, nodes: impl IntoIterator<Item = &'n str>) -> Vec<&'a Relationship> {
        filter_relationships(self.relationships, nodes)
    }
}

/// Keep only relationships whose source and target are both in `nodes`
pub fn filter_relationships<'a, 'n>(
    relationships: &'a [Relationship],
    nodes: impl IntoIterator<Item = &'n str>,
) -> Vec<&'a Relationship> {
    let selected: HashSet<&str> = nodes.into_iter().collect();

    relationships
        .iter()
        .filter(|rel| {
            let keep = selected.contains(rel.from_table.as_str())
                && selected.contains(rel.to_table.as_str());
            if !keep {
                tracing::debug!(
                    relationship = %rel.id,
                    from = %rel.from_table,
                    to = %rel.to_table,
                    "relationship endpoint outside selection, dropped"
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medallion_core::Cardinality;

    fn rel(id: &str, from: &str, to: &str) -> Relationship {
        Relationship::new(id, from, to, Cardinality::ManyToOne)
    }

    fn sample() -> Vec<Relationship> {
        vec![
            rel("r1", "bronze.txn", "bronze.account"),
            rel("r2", "bronze.account", "bronze.customer"),
            rel("r3", "silver.account", "bronze.account"),
        ]
    }

    #[test]
    fn counts_and_associates() {
        let rels = sample();
        let index = RelationshipIndex::new(&rels);

        assert_eq!(index.count(), 3);
        assert_eq!(index.degree("bronze.account"), 3);
        assert_eq!(index.degree("bronze.customer"), 1);
        assert_eq!(index.degree("bronze.unknown"), 0);

        let ids: Vec<&str> = index.for_node("bronze.txn").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1"]);
    }

    #[test]
    fn self_reference_counts_once() {
        let rels = vec![rel("r1", "customer", "customer")];
        let index = RelationshipIndex::new(&rels);
        assert_eq!(index.degree("customer"), 1);
    }

    #[test]
    fn filter_requires_both_endpoints() {
        let rels = sample();
        let index = RelationshipIndex::new(&rels);

        let bronze_only = index.filter_to(["bronze.txn", "bronze.account", "bronze.customer"]);
        let ids: Vec<&str> = bronze_only.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[test]
    fn dangling_endpoints_are_dropped_silently() {
        let rels = vec![rel("r1", "a", "ghost")];
        assert!(filter_relationships(&rels, ["a"]).is_empty());
        assert!(filter_relationships(&rels, std::iter::empty()).is_empty());
    }

    #[test]
    fn unconnected_nodes() {
        let rels = sample();
        let index = RelationshipIndex::new(&rels);
        assert_eq!(
            index.unconnected(["bronze.account", "bronze.branch"]),
            vec!["bronze.branch"]
        );
    }
}
