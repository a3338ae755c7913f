//! Synthetic domain catalogs for engine tests

#![allow(dead_code)]

use medallion_catalog::InMemoryRegistry;
use medallion_core::{Cardinality, DomainCatalog, EntityDefinition, Relationship, TableDefinition};

pub fn tables(prefix: &str, n: usize) -> Vec<TableDefinition> {
    (0..n).map(|i| TableDefinition::new(format!("{}_{}", prefix, i))).collect()
}

pub fn rels(prefix: &str, n: usize) -> Vec<Relationship> {
    (0..n)
        .map(|i| {
            Relationship::new(
                format!("{}-{}", prefix, i),
                format!("{}.from_{}", prefix, i),
                format!("{}.to_{}", prefix, i),
                Cardinality::ManyToOne,
            )
        })
        .collect()
}

/// Every layer populated and connected
pub fn healthy(id: &str) -> DomainCatalog {
    let mut catalog = DomainCatalog::new(id).with_name(format!("Healthy {}", id));
    catalog.logical.nodes = vec![EntityDefinition::new("Customer"), EntityDefinition::new("Account")];
    catalog.logical.relationships = vec![Relationship::new(
        "l1",
        "Customer",
        "Account",
        Cardinality::OneToMany,
    )];
    catalog.bronze.nodes = tables("bronze.raw", 6);
    catalog.bronze.relationships = rels("bronze", 4);
    catalog.silver.nodes = tables("silver.conformed", 5);
    catalog.silver.relationships = rels("silver", 3);
    catalog.gold.dimensions = tables("gold.dim", 4);
    catalog.gold.facts = tables("gold.fact", 2);
    catalog.gold.relationships = rels("gold", 6);
    catalog
}

/// Five bronze tables with no relationships, everything else empty
pub fn disconnected_bronze(id: &str) -> DomainCatalog {
    let mut catalog = DomainCatalog::new(id);
    catalog.bronze.nodes = tables("bronze.raw", 5);
    catalog
}

/// Two facts, four dimensions, one relationship
pub fn sparse_gold(id: &str) -> DomainCatalog {
    let mut catalog = DomainCatalog::new(id);
    catalog.gold.dimensions = tables("gold.dim", 4);
    catalog.gold.facts = tables("gold.fact", 2);
    catalog.gold.relationships = rels("gold", 1);
    catalog
}

/// Populated but with no relationships anywhere
pub fn disconnected_everywhere(id: &str) -> DomainCatalog {
    let mut catalog = DomainCatalog::new(id);
    catalog.logical.nodes = vec![EntityDefinition::new("Payment")];
    catalog.bronze.nodes = tables("bronze.raw", 8);
    catalog.silver.nodes = tables("silver.conformed", 8);
    catalog.gold.dimensions = tables("gold.dim", 3);
    catalog.gold.facts = tables("gold.fact", 3);
    catalog
}

pub fn registry(catalogs: Vec<DomainCatalog>) -> InMemoryRegistry {
    InMemoryRegistry::from_catalogs(catalogs).unwrap()
}
