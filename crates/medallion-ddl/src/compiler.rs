//! DDL rendering
//!
//! Output is textual and deterministic. Type strings are trusted verbatim and
//! no dialect validation happens here; a table without columns still renders
//! with an empty column list.

use medallion_core::{Column, TableDefinition};
use crate::normalize::table_columns;

/// Schema used for unqualified table names unless configured otherwise
pub const DEFAULT_SCHEMA: &str = "analytics";

/// Double every single quote so `text` can sit inside a SQL string literal
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

/// Renders `CREATE TABLE` statements from table definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlCompiler {
    default_schema: String,
}

impl DdlCompiler {
    /// Create a compiler that qualifies bare names with `analytics`
    pub fn new() -> Self {
        Self {
            default_schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    /// Use a different schema for unqualified table names
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }

    /// Render DDL for a table, normalizing its columns first
    pub fn compile(&self, table: &TableDefinition) -> String {
        let columns = table_columns(table);
        self.compile_with_columns(table, &columns)
    }

    /// Render DDL for a table using already-normalized columns
    pub fn compile_with_columns(&self, table: &TableDefinition, columns: &[Column]) -> String {
        let (schema_name, table_name) = table.qualified_parts(&self.default_schema);

        let body = columns
            .iter()
            .map(render_column)
            .collect::<Vec<_>>()
            .join(",\n");

        let mut ddl = format!("CREATE TABLE {}.{} (\n{}\n)", schema_name, table_name, body);

        if !table.primary_key.is_empty() {
            ddl.push_str(&format!("\nPRIMARY KEY ({})", table.primary_key.join(", ")));
        }

        if !table.partition_by.is_empty() {
            ddl.push_str(&format!("\nPARTITION BY ({})", table.partition_by.join(", ")));
        }

        if let Some(grain) = table.grain.as_deref().filter(|g| !g.is_empty()) {
            ddl.push_str(&format!("\nCOMMENT '{}'", escape_literal(grain)));
        }

        ddl
    }

    /// Render a script for several tables, one terminated statement each
    pub fn compile_all<'a>(&self, tables: impl IntoIterator<Item = &'a TableDefinition>) -> String {
        tables
            .into_iter()
            .map(|table| format!("{};", self.compile(table)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for DdlCompiler {
    fn default() -> Self {
        Self::new()
    }
}

fn render_column(column: &Column) -> String {
    match column.business_meaning.as_deref() {
        Some(meaning) if !meaning.is_empty() => format!(
            "  {} {} COMMENT '{}'",
            column.name,
            column.data_type,
            escape_literal(meaning)
        ),
        _ => format!("  {} {}", column.name, column.data_type),
    }
}
