//! Declarative table descriptions to DDL text
//!
//! This crate handles:
//! - Parsing annotated type strings (`TYPE COMMENT '...'`)
//! - Normalizing explicit and inline column sources into column records
//! - Rendering deterministic `CREATE TABLE` statements

pub mod annotation;
pub mod normalize;
pub mod compiler;

pub use annotation::{AnnotationParser, ParsedAnnotation, parse_annotation};
pub use normalize::{normalize_columns, table_columns};
pub use compiler::{DdlCompiler, escape_literal};
