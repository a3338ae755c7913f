//! Table and column descriptions
//!
//! Catalog files describe columns in one of two shapes: an explicit `columns`
//! list, or a `schema` object mapping column names to annotated type strings.
//! Both are folded into [`ColumnSource`] once, at deserialization time.

use serde::{Deserialize, Serialize};

/// A column in a table definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,

    /// Type expression, carried verbatim (e.g. `DECIMAL(18,2)`)
    pub data_type: String,

    /// Declared nullability, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Business meaning, rendered as the column comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_meaning: Option<String>,

    /// Upstream schema this column is sourced from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_schema: Option<String>,

    /// Upstream table this column is sourced from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,

    /// Upstream column this column is sourced from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,
}

impl Column {
    /// Create a new column with no annotations
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: None,
            business_meaning: None,
            source_schema: None,
            source_table: None,
            source_column: None,
        }
    }

    /// Set the business meaning
    pub fn with_business_meaning(mut self, meaning: impl Into<String>) -> Self {
        self.business_meaning = Some(meaning.into());
        self
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Set upstream lineage
    pub fn with_source(
        mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.source_schema = Some(schema.into());
        self.source_table = Some(table.into());
        self.source_column = Some(column.into());
        self
    }
}

/// Where a table's columns come from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSource {
    /// Already-normalized column records, in display order
    Explicit(Vec<Column>),

    /// `name -> annotated type string` pairs, in declaration order
    Inline(Vec<(String, String)>),

    /// No column information
    #[default]
    Absent,
}

impl ColumnSource {
    /// Column names in declaration order, without parsing type strings
    pub fn column_names(&self) -> Vec<&str> {
        match self {
            Self::Explicit(columns) => columns.iter().map(|c| c.name.as_str()).collect(),
            Self::Inline(entries) => entries.iter().map(|(name, _)| name.as_str()).collect(),
            Self::Absent => Vec::new(),
        }
    }
}

/// A physical table (bronze, silver, gold dimension or gold fact)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTableDefinition", into = "RawTableDefinition")]
pub struct TableDefinition {
    /// Table name, optionally qualified as `schema.table`
    pub name: String,

    /// Schema name declared separately from the table name
    pub schema_name: Option<String>,

    /// Free-text description
    pub description: Option<String>,

    /// Column information
    pub column_source: ColumnSource,

    /// Primary key column names
    pub primary_key: Vec<String>,

    /// What one row represents
    pub grain: Option<String>,

    /// Partition column names
    pub partition_by: Vec<String>,

    /// Upstream tables feeding this table
    pub source_tables: Vec<String>,
}

impl TableDefinition {
    /// Create a table definition with no columns
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: None,
            description: None,
            column_source: ColumnSource::Absent,
            primary_key: Vec::new(),
            grain: None,
            partition_by: Vec::new(),
            source_tables: Vec::new(),
        }
    }

    /// Use an explicit column list
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.column_source = ColumnSource::Explicit(columns);
        self
    }

    /// Use an inline `name -> annotated type` schema object
    pub fn with_inline_schema<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.column_source = ColumnSource::Inline(
            entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        );
        self
    }

    /// Set the primary key
    pub fn with_primary_key<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.primary_key = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set partition columns
    pub fn with_partition_by<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.partition_by = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the grain
    pub fn with_grain(mut self, grain: impl Into<String>) -> Self {
        self.grain = Some(grain.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Split the table name on its first `.` into `(schema, table)`.
    ///
    /// Unqualified names fall back to `default_schema`.
    pub fn qualified_parts<'a>(&'a self, default_schema: &'a str) -> (&'a str, &'a str) {
        match self.name.split_once('.') {
            Some((schema, table)) => (schema, table),
            None => (default_schema, self.name.as_str()),
        }
    }

    /// Primary key names that do not appear among `columns`
    pub fn missing_primary_key_columns<'a>(&'a self, columns: &[Column]) -> Vec<&'a str> {
        self.primary_key
            .iter()
            .filter(|key| !columns.iter().any(|c| &c.name == *key))
            .map(String::as_str)
            .collect()
    }
}

/// An entity in the logical (conceptual) model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    /// Entity name
    pub name: String,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Attribute names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

impl EntityDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            attributes: Vec::new(),
        }
    }
}

/// Anything that can be an endpoint of a relationship
pub trait CatalogNode {
    /// Identifier relationships refer to
    fn node_name(&self) -> &str;
}

impl CatalogNode for TableDefinition {
    fn node_name(&self) -> &str {
        &self.name
    }
}

impl CatalogNode for EntityDefinition {
    fn node_name(&self) -> &str {
        &self.name
    }
}

/// On-disk shape of a table definition
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTableDefinition {
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    columns: Option<Vec<Column>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    primary_key: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    grain: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    partition_by: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    source_tables: Vec<String>,
}

impl From<RawTableDefinition> for TableDefinition {
    fn from(raw: RawTableDefinition) -> Self {
        let mut schema_name = None;
        let mut inline = None;

        match raw.schema {
            Some(serde_json::Value::Object(map)) => {
                let entries = map
                    .into_iter()
                    .map(|(name, def)| {
                        let def = match def {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        };
                        (name, def)
                    })
                    .collect::<Vec<_>>();
                inline = Some(entries);
            }
            Some(serde_json::Value::String(name)) => schema_name = Some(name),
            _ => {}
        }

        // Explicit columns win over an inline schema object
        let column_source = match (raw.columns, inline) {
            (Some(columns), _) if !columns.is_empty() => ColumnSource::Explicit(columns),
            (_, Some(entries)) => ColumnSource::Inline(entries),
            _ => ColumnSource::Absent,
        };

        Self {
            name: raw.name,
            schema_name,
            description: raw.description,
            column_source,
            primary_key: raw.primary_key,
            grain: raw.grain,
            partition_by: raw.partition_by,
            source_tables: raw.source_tables,
        }
    }
}

impl From<TableDefinition> for RawTableDefinition {
    fn from(table: TableDefinition) -> Self {
        let (schema, columns) = match table.column_source {
            ColumnSource::Explicit(columns) => {
                (table.schema_name.map(serde_json::Value::String), Some(columns))
            }
            ColumnSource::Inline(entries) => {
                let map = entries
                    .into_iter()
                    .map(|(name, def)| (name, serde_json::Value::String(def)))
                    .collect::<serde_json::Map<_, _>>();
                (Some(serde_json::Value::Object(map)), None)
            }
            ColumnSource::Absent => (table.schema_name.map(serde_json::Value::String), None),
        };

        Self {
            name: table.name,
            schema,
            description: table.description,
            columns,
            primary_key: table.primary_key,
            grain: table.grain,
            partition_by: table.partition_by,
            source_tables: table.source_tables,
        }
    }
}
