//! Column normalization
//!
//! Folds every [`ColumnSource`] shape into one ordered list of column records.

use std::borrow::Cow;
use medallion_core::{Column, ColumnSource, TableDefinition};
use crate::annotation::parse_annotation;

/// Normalize a column source into column records.
///
/// Explicit columns are returned as-is; inline entries are parsed in
/// declaration order; an absent source yields an empty list.
pub fn normalize_columns(source: &ColumnSource) -> Cow<'_, [Column]> {
    match source {
        ColumnSource::Explicit(columns) => Cow::Borrowed(columns.as_slice()),
        ColumnSource::Inline(entries) => Cow::Owned(
            entries
                .iter()
                .map(|(name, raw)| {
                    let parsed = parse_annotation(raw);
                    Column {
                        business_meaning: parsed.business_meaning,
                        ..Column::new(name.clone(), parsed.data_type)
                    }
                })
                .collect(),
        ),
        ColumnSource::Absent => Cow::Owned(Vec::new()),
    }
}

/// Normalized columns of a table
pub fn table_columns(table: &TableDefinition) -> Cow<'_, [Column]> {
    if table.column_source == ColumnSource::Absent {
        tracing::debug!(table = %table.name, "no column information, using empty column list");
    }
    normalize_columns(&table.column_source)
}
