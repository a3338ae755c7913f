//! Relationship derivation for logical, bronze and silver layers
//!
//! Physical tables are linked through key-like columns that name another
//! table's entity (`customer_id` -> `silver.customer_master`), followed by a
//! list of well-known banking table pairs. Logical entities are linked
//! through a list of common banking associations.

use medallion_core::{Cardinality, EntityDefinition, Relationship, TableDefinition};

/// Name fragments marking the table that owns an entity
const ENTITY_TABLE_MARKERS: &[&str] = &[
    "_master", "_golden", "_enriched", "_current", "_performance", "_journeys", "_attribution",
];

/// Table suffixes removed before reading the entity name
const ENTITY_SUFFIXES: &[&str] = &[
    "_raw", "_master", "_golden", "_cleansed", "_history", "_daily", "_tracking", "_enriched",
    "_current", "_performance", "_agg", "_aggregated",
];

const LAYER_PREFIXES: &[&str] = &["bronze.", "silver.", "gold."];

/// `(from fragment, to fragment, join column)`
const TABLE_PAIRS: &[(&str, &str, &str)] = &[
    ("mktg_leads_enriched", "mktg_campaigns_enriched", "campaign_id"),
    ("mktg_customer_journeys", "mktg_leads_enriched", "lead_id"),
    ("mktg_customer_journeys", "mktg_campaigns_enriched", "campaign_id"),
    ("mktg_multi_touch_attribution", "mktg_customer_journeys", "journey_id"),
    ("mktg_multi_touch_attribution", "mktg_campaigns_enriched", "campaign_id"),
    ("mktg_campaign_performance_daily", "mktg_campaigns_enriched", "campaign_id"),
    ("mktg_offer_performance", "mktg_campaigns_enriched", "campaign_id"),
    ("loan_applications", "loan_master", "loan_id"),
    ("loan_balances", "loan_master", "loan_id"),
    ("loan_transactions", "loan_master", "loan_id"),
    ("loan_payments", "loan_master", "loan_id"),
    ("loan_delinquency", "loan_master", "loan_id"),
    ("loan_collateral", "loan_master", "loan_id"),
    ("customer_accounts", "customer_master", "customer_id"),
    ("customer_identifiers", "customer_master", "source_customer_id"),
    ("customer_relationships", "customer_master", "primary_customer_id"),
    ("account_transactions", "account_master", "account_id"),
    ("account_balances", "account_master", "account_id"),
    ("card_transactions", "card_master", "card_id"),
    ("card_authorizations", "card_master", "card_id"),
];

/// `(from keyword, to keyword, cardinality, label)`
const ENTITY_ASSOCIATIONS: &[(&str, &str, Cardinality, &str)] = &[
    ("customer", "account", Cardinality::OneToMany, "owns"),
    ("customer", "household", Cardinality::ManyToMany, "member-of"),
    ("customer", "contact", Cardinality::OneToOne, "has"),
    ("customer", "product", Cardinality::ManyToMany, "holds"),
    ("customer", "loan", Cardinality::OneToMany, "borrows"),
    ("customer", "card", Cardinality::OneToMany, "holds"),
    ("account", "transaction", Cardinality::OneToMany, "has"),
    ("account", "balance", Cardinality::OneToMany, "has"),
    ("account", "product", Cardinality::ManyToOne, "is-of-type"),
    ("loan", "collateral", Cardinality::OneToMany, "secured-by"),
    ("loan", "payment", Cardinality::OneToMany, "has"),
    ("loan", "borrower", Cardinality::ManyToOne, "belongs-to"),
    ("card", "transaction", Cardinality::OneToMany, "has"),
    ("card", "account", Cardinality::ManyToOne, "linked-to"),
    ("payment", "account", Cardinality::ManyToOne, "from"),
    ("transaction", "account", Cardinality::ManyToOne, "on"),
    ("branch", "account", Cardinality::OneToMany, "manages"),
    ("channel", "transaction", Cardinality::OneToMany, "processes"),
];

/// Entity a table describes: `bronze.loan_balances_raw` -> `loan`.
/// Marketing tables keep their full name (`mktg_campaigns`).
fn table_entity(table_name: &str) -> Option<String> {
    let lower = table_name.to_ascii_lowercase();
    let mut name = LAYER_PREFIXES
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
        .unwrap_or(lower.as_str());

    if let Some(stripped) = ENTITY_SUFFIXES.iter().find_map(|suffix| name.strip_suffix(suffix)) {
        name = stripped;
    }
    name = name.strip_prefix("fact_").unwrap_or(name);

    if name.starts_with("mktg_") {
        return Some(name.to_string());
    }

    name.split('_').next().filter(|s| !s.is_empty()).map(str::to_string)
}

/// Entity a key column refers to: `source_customer_id` -> `customer`
fn referenced_entity(field: &str) -> String {
    let lower = field.to_ascii_lowercase();
    let name = lower.strip_suffix("_id").unwrap_or(lower.as_str());
    let name = name.strip_suffix("_key").unwrap_or(name);
    let name = name.strip_prefix("source_").unwrap_or(name);
    let name = name.strip_prefix("parent_").unwrap_or(name);
    name.to_string()
}

/// Key-like columns other than the table's own leading key
fn foreign_key_fields(table: &TableDefinition) -> Vec<&str> {
    let own_key = table.primary_key.first().map(String::as_str);

    table
        .column_source
        .column_names()
        .into_iter()
        .filter(|name| Some(*name) != own_key)
        .filter(|name| {
            let lower = name.to_ascii_lowercase();
            lower.ends_with("_id") || lower.ends_with("_key")
        })
        .collect()
}

/// Entity -> owning table, in first-seen order; a later owner replaces an earlier one
fn entity_tables(tables: &[TableDefinition]) -> Vec<(String, &str)> {
    let mut owners: Vec<(String, &str)> = Vec::new();

    for table in tables {
        if !ENTITY_TABLE_MARKERS.iter().any(|marker| table.name.contains(marker)) {
            continue;
        }
        let Some(entity) = table_entity(&table.name) else {
            continue;
        };
        match owners.iter_mut().find(|(e, _)| *e == entity) {
            Some(slot) => slot.1 = table.name.as_str(),
            None => owners.push((entity, table.name.as_str())),
        }
    }

    owners
}

fn resolve_target<'t>(
    table: &TableDefinition,
    entity: &str,
    owners: &[(String, &'t str)],
    tables: &'t [TableDefinition],
) -> Option<&'t str> {
    if entity.is_empty() {
        return None;
    }

    let marketing = if table.name.to_ascii_lowercase().contains("mktg_") && !entity.starts_with("mktg_") {
        let plural = if entity.ends_with('s') { entity.to_string() } else { format!("{}s", entity) };
        Some(format!("mktg_{}", plural))
    } else {
        None
    };

    let owner_of = |name: &str| owners.iter().find(|(e, _)| e == name).map(|(_, t)| *t);
    let exact = owner_of(entity).or_else(|| marketing.as_deref().and_then(owner_of));
    if exact.is_some() {
        return exact;
    }

    let fuzzy = owners
        .iter()
        .find(|(e, _)| e.contains(entity) || entity.contains(e.as_str()) || e.replace('_', "") == entity.replace('_', ""))
        .map(|(_, t)| *t);
    if fuzzy.is_some() {
        return fuzzy;
    }

    let bronze = format!("bronze.{}", entity);
    let silver = format!("silver.{}", entity);
    tables
        .iter()
        .map(|t| t.name.as_str())
        .find(|name| {
            let lower = name.to_ascii_lowercase();
            lower.contains(entity)
                && (lower.contains("master")
                    || lower.contains("golden")
                    || lower.contains("dim_")
                    || lower == bronze
                    || lower == silver)
        })
}

fn key_edge(from: &str, to: &str, field: &str) -> Relationship {
    Relationship::new(format!("derived:{}:{}:{}", from, to, field), from, to, Cardinality::ManyToOne)
        .with_join_condition(format!("{}.{} = {}.{}", from, field, to, field))
}

/// Derive `table -> owning table` edges for one bronze or silver layer
pub fn derive_layer_relationships(tables: &[TableDefinition]) -> Vec<Relationship> {
    let owners = entity_tables(tables);
    let mut relationships = Vec::new();

    for table in tables {
        for field in foreign_key_fields(table) {
            let entity = referenced_entity(field);
            match resolve_target(table, &entity, &owners, tables) {
                Some(target) if target != table.name => {
                    relationships.push(key_edge(&table.name, target, field));
                }
                _ => {}
            }
        }
    }

    for (from_fragment, to_fragment, field) in TABLE_PAIRS {
        let find = |fragment: &str| {
            tables
                .iter()
                .map(|t| t.name.as_str())
                .find(|name| name.to_ascii_lowercase().contains(fragment))
        };

        if let (Some(from), Some(to)) = (find(*from_fragment), find(*to_fragment)) {
            let exists = relationships.iter().any(|r| r.from_table == from && r.to_table == to);
            if from != to && !exists {
                relationships.push(key_edge(from, to, field));
            }
        }
    }

    tracing::debug!(
        tables = tables.len(),
        entities = owners.len(),
        derived = relationships.len(),
        "derived layer relationships"
    );

    relationships
}

/// Last entity whose letters-only name contains the keyword or is contained in it
fn matching_entity<'e>(entities: &[(&'e str, String)], keyword: &str) -> Option<&'e str> {
    entities
        .iter()
        .filter(|(_, normalized)| {
            !normalized.is_empty() && (normalized.contains(keyword) || keyword.contains(normalized.as_str()))
        })
        .last()
        .map(|(name, _)| *name)
}

/// Derive edges between logical entities from common banking associations
pub fn derive_logical_relationships(entities: &[EntityDefinition]) -> Vec<Relationship> {
    let normalized: Vec<(&str, String)> = entities
        .iter()
        .map(|e| {
            let letters: String = e.name.to_ascii_lowercase().chars().filter(|c| c.is_ascii_lowercase()).collect();
            (e.name.as_str(), letters)
        })
        .collect();

    let mut relationships: Vec<Relationship> = Vec::new();

    for (from_keyword, to_keyword, cardinality, label) in ENTITY_ASSOCIATIONS {
        let from = matching_entity(&normalized, from_keyword);
        let to = matching_entity(&normalized, to_keyword);

        if let (Some(from), Some(to)) = (from, to) {
            let exists = relationships.iter().any(|r| r.from_table == from && r.to_table == to);
            if from != to && !exists {
                relationships.push(Relationship::new(
                    format!("derived:{}:{}:{}", from, label, to),
                    from,
                    to,
                    *cardinality,
                ));
            }
        }
    }

    tracing::debug!(
        entities = entities.len(),
        derived = relationships.len(),
        "derived logical relationships"
    );

    relationships
}
