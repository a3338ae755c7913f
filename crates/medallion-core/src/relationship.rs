//! Relationships between tables or entities within a layer

use serde::{Deserialize, Serialize};

/// Relationship cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "One-to-One", alias = "1:1")]
    OneToOne,

    #[serde(rename = "One-to-Many", alias = "1:M")]
    OneToMany,

    #[serde(rename = "Many-to-One", alias = "M:1")]
    ManyToOne,

    #[serde(rename = "Many-to-Many", alias = "M:M")]
    ManyToMany,
}

impl Cardinality {
    /// Stable display identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "One-to-One",
            Self::OneToMany => "One-to-Many",
            Self::ManyToOne => "Many-to-One",
            Self::ManyToMany => "Many-to-Many",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directed edge between two nodes of the same layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Relationship identifier
    pub id: String,

    /// Source table or entity
    #[serde(alias = "fromEntity")]
    pub from_table: String,

    /// Target table or entity
    #[serde(alias = "toEntity")]
    pub to_table: String,

    /// Cardinality of the edge
    pub cardinality: Cardinality,

    /// Join predicate, if declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_condition: Option<String>,
}

impl Relationship {
    /// Create a relationship without a join condition
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            id: id.into(),
            from_table: from.into(),
            to_table: to.into(),
            cardinality,
            join_condition: None,
        }
    }

    /// Set the join condition
    pub fn with_join_condition(mut self, condition: impl Into<String>) -> Self {
        self.join_condition = Some(condition.into());
        self
    }
}
