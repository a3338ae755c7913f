//! Validation issues raised by layer health heuristics
//!
//! IMPORTANT: Issue codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the report format.

use serde::{Deserialize, Serialize};
use crate::catalog::Layer;

/// Issue code registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// A populated layer declares no relationships at all
    LayerDisconnected,

    /// Gold has both facts and dimensions but no star-schema edges
    StarSchemaMissing,

    /// Gold relationship count is well below the minimal-star estimate
    StarSchemaSparse,
}

impl IssueCode {
    /// Get the issue code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LayerDisconnected => "LAYER_DISCONNECTED",
            Self::StarSchemaMissing => "STAR_SCHEMA_MISSING",
            Self::StarSchemaSparse => "STAR_SCHEMA_SPARSE",
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A soft consistency finding for one layer of one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Layer the issue was found in
    pub layer: Layer,

    /// Stable issue code
    pub code: IssueCode,

    /// Human-readable message
    pub message: String,

    /// Expected relationship count, for count-based issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<usize>,

    /// Actual relationship count, for count-based issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<usize>,
}

impl ValidationIssue {
    pub fn new(layer: Layer, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            layer,
            code,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Set expected/actual counts
    pub fn with_comparison(mut self, expected: usize, actual: usize) -> Self {
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ERD: {}", self.layer.label(), self.message)
    }
}
