//! Star-schema relationship derivation for gold layers
//!
//! When a gold layer declares facts and dimensions but no edges, plausible
//! fact -> dimension edges can be derived from naming conventions
//! (`gold.fact_<subject>`, `gold.dim_<subject>`).

use medallion_core::{Cardinality, Relationship, TableDefinition};

/// Dimensions every fact is assumed to reference
const CONFORMED_DIMENSIONS: &[&str] = &[
    "date", "time", "calendar", "customer", "borrower", "client", "account", "branch",
    "channel", "geography", "location", "product",
];

/// Qualifier markers: a dimension naming one links to facts that mention the
/// dimension name with the first `_<marker>` removed (`loan_status` -> `loan`,
/// `txn_type_code` -> `txn_code`)
const QUALIFIERS: &[(&str, &str)] = &[("status", "_status"), ("type", "_type"), ("product", "_product")];

fn base_name<'a>(name: &'a str, prefix: &str) -> &'a str {
    let name = name.strip_prefix("gold.").unwrap_or(name);
    name.strip_prefix(prefix).unwrap_or(name)
}

fn references(fact_base: &str, dim_base: &str) -> bool {
    if fact_base.contains(dim_base) || CONFORMED_DIMENSIONS.contains(&dim_base) {
        return true;
    }

    if dim_base == "merchant" && fact_base.contains("card") {
        return true;
    }

    QUALIFIERS.iter().any(|(marker, qualifier)| {
        dim_base.contains(marker) && fact_base.contains(dim_base.replacen(qualifier, "", 1).as_str())
    })
}

/// Derive `fact -> dimension` edges (Many-to-One, joined on `<subject>_key`)
pub fn derive_star_relationships(
    dimensions: &[TableDefinition],
    facts: &[TableDefinition],
) -> Vec<Relationship> {
    let mut relationships = Vec::new();

    for fact in facts {
        let fact_base = base_name(&fact.name, "fact_");

        for dim in dimensions {
            let dim_base = base_name(&dim.name, "dim_");

            if references(fact_base, dim_base) {
                relationships.push(
                    Relationship::new(
                        format!("derived:{}:{}", fact.name, dim.name),
                        fact.name.clone(),
                        dim.name.clone(),
                        Cardinality::ManyToOne,
                    )
                    .with_join_condition(format!(
                        "{}.{}_key = {}.{}_key",
                        fact.name, dim_base, dim.name, dim_base
                    )),
                );
            }
        }
    }

    tracing::debug!(
        facts = facts.len(),
        dimensions = dimensions.len(),
        derived = relationships.len(),
        "derived star-schema relationships"
    );

    relationships
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(names: &[&str]) -> Vec<TableDefinition> {
        names.iter().map(|n| TableDefinition::new(*n)).collect()
    }

    fn edges(rels: &[Relationship]) -> Vec<(&str, &str)> {
        rels.iter().map(|r| (r.from_table.as_str(), r.to_table.as_str())).collect()
    }

    #[test]
    fn conformed_and_name_matched_dimensions() {
        let dims = tables(&["gold.dim_date", "gold.dim_loan", "gold.dim_merchant", "gold.dim_fx_rate"]);
        let facts = tables(&["gold.fact_loan_balance"]);

        let rels = derive_star_relationships(&dims, &facts);
        assert_eq!(
            edges(&rels),
            vec![
                ("gold.fact_loan_balance", "gold.dim_date"),
                ("gold.fact_loan_balance", "gold.dim_loan"),
            ]
        );
        assert_eq!(rels[1].cardinality, Cardinality::ManyToOne);
        assert_eq!(
            rels[1].join_condition.as_deref(),
            Some("gold.fact_loan_balance.loan_key = gold.dim_loan.loan_key")
        );
    }

    #[test]
    fn qualifier_dimensions_follow_their_stem() {
        let dims = tables(&["gold.dim_card_status", "gold.dim_loan_type"]);
        let facts = tables(&["gold.fact_card_transactions"]);

        assert_eq!(
            edges(&derive_star_relationships(&dims, &facts)),
            vec![("gold.fact_card_transactions", "gold.dim_card_status")]
        );
    }

    #[test]
    fn qualifier_inside_the_name_is_removed_not_stripped() {
        let dims = tables(&["gold.dim_txn_type_code", "gold.dim_card_status_hist"]);
        let facts = tables(&["gold.fact_txn_code_daily"]);

        assert_eq!(
            edges(&derive_star_relationships(&dims, &facts)),
            vec![("gold.fact_txn_code_daily", "gold.dim_txn_type_code")]
        );
    }

    #[test]
    fn merchants_attach_to_card_facts() {
        let dims = tables(&["gold.dim_merchant"]);
        let facts = tables(&["gold.fact_card_authorizations", "gold.fact_wire_transfers"]);

        assert_eq!(
            edges(&derive_star_relationships(&dims, &facts)),
            vec![("gold.fact_card_authorizations", "gold.dim_merchant")]
        );
    }

    #[test]
    fn nothing_to_derive_without_facts() {
        assert!(derive_star_relationships(&tables(&["gold.dim_date"]), &[]).is_empty());
    }
}
