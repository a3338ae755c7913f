//! Domain catalogs: one bundle of nodes and relationships per layer

use serde::{Deserialize, Serialize};
use crate::relationship::Relationship;
use crate::schema::{CatalogNode, EntityDefinition, TableDefinition};

/// Catalog layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Conceptual entity model
    Logical,

    /// Raw-ingested tables
    Bronze,

    /// Cleansed / conformed tables
    Silver,

    /// Business-aggregated star schema
    Gold,
}

impl Layer {
    /// All layers, in evaluation order
    pub const ALL: [Layer; 4] = [Layer::Logical, Layer::Bronze, Layer::Silver, Layer::Gold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logical => "logical",
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }

    /// Capitalized name for human-facing output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Logical => "Logical",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "logical" => Ok(Self::Logical),
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            other => Err(format!(
                "unknown layer '{}' (expected logical, bronze, silver or gold)",
                other
            )),
        }
    }
}

/// Nodes and relationships for one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerBundle<N> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<N>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl<N> Default for LayerBundle<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            relationships: Vec::new(),
        }
    }
}

impl<N> LayerBundle<N> {
    pub fn new(nodes: Vec<N>, relationships: Vec<Relationship>) -> Self {
        Self { nodes, relationships }
    }
}

/// Gold layer: dimensions and facts arranged as a star
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoldLayer {
    #[serde(default)]
    pub dimensions: Vec<TableDefinition>,

    #[serde(default)]
    pub facts: Vec<TableDefinition>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl GoldLayer {
    /// Dimensions followed by facts
    pub fn tables(&self) -> impl Iterator<Item = &TableDefinition> {
        self.dimensions.iter().chain(self.facts.iter())
    }
}

/// Everything the catalog knows about one business domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCatalog {
    /// Domain identifier (e.g. `deposits`, `loans-commercial`)
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub logical: LayerBundle<EntityDefinition>,

    #[serde(default)]
    pub bronze: LayerBundle<TableDefinition>,

    #[serde(default)]
    pub silver: LayerBundle<TableDefinition>,

    #[serde(default)]
    pub gold: GoldLayer,
}

impl DomainCatalog {
    /// Create an empty catalog for a domain
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            logical: LayerBundle::default(),
            bronze: LayerBundle::default(),
            silver: LayerBundle::default(),
            gold: GoldLayer::default(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Relationships declared for a layer
    pub fn relationships(&self, layer: Layer) -> &[Relationship] {
        match layer {
            Layer::Logical => &self.logical.relationships,
            Layer::Bronze => &self.bronze.relationships,
            Layer::Silver => &self.silver.relationships,
            Layer::Gold => &self.gold.relationships,
        }
    }

    /// Node identifiers of a layer (gold: dimensions then facts)
    pub fn node_names(&self, layer: Layer) -> Vec<&str> {
        match layer {
            Layer::Logical => self.logical.nodes.iter().map(CatalogNode::node_name).collect(),
            Layer::Bronze => self.bronze.nodes.iter().map(CatalogNode::node_name).collect(),
            Layer::Silver => self.silver.nodes.iter().map(CatalogNode::node_name).collect(),
            Layer::Gold => self.gold.tables().map(CatalogNode::node_name).collect(),
        }
    }

    /// Number of nodes in a layer (gold: dimensions plus facts)
    pub fn node_count(&self, layer: Layer) -> usize {
        match layer {
            Layer::Logical => self.logical.nodes.len(),
            Layer::Bronze => self.bronze.nodes.len(),
            Layer::Silver => self.silver.nodes.len(),
            Layer::Gold => self.gold.dimensions.len() + self.gold.facts.len(),
        }
    }

    /// Physical tables of a layer; the logical layer has none
    pub fn tables(&self, layer: Layer) -> Vec<&TableDefinition> {
        match layer {
            Layer::Logical => Vec::new(),
            Layer::Bronze => self.bronze.nodes.iter().collect(),
            Layer::Silver => self.silver.nodes.iter().collect(),
            Layer::Gold => self.gold.tables().collect(),
        }
    }

    /// Relationship count across all layers
    pub fn total_relationships(&self) -> usize {
        Layer::ALL.iter().map(|l| self.relationships(*l).len()).sum()
    }
}
