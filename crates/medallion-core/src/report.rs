//! Report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::issue::ValidationIssue;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Verdict for one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DomainStatus {
    Pass,
    Warn,
    Fail,
}

impl DomainStatus {
    /// Classify by issue count: none passes, up to `warn_max_issues` warns, more fails
    pub fn classify(issue_count: usize, warn_max_issues: usize) -> Self {
        if issue_count > warn_max_issues {
            Self::Fail
        } else if issue_count > 0 {
            Self::Warn
        } else {
            Self::Pass
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        }
    }

    /// Status glyph for terminal and markdown output
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Warn => "⚠️",
            Self::Fail => "❌",
        }
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Node and relationship counts per layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerCounts {
    pub logical_entities: usize,
    pub logical_relationships: usize,
    pub bronze_tables: usize,
    pub bronze_relationships: usize,
    pub silver_tables: usize,
    pub silver_relationships: usize,
    pub gold_dimensions: usize,
    pub gold_facts: usize,
    pub gold_relationships: usize,
}

impl LayerCounts {
    /// Relationships across all layers
    pub fn total_relationships(&self) -> usize {
        self.logical_relationships
            + self.bronze_relationships
            + self.silver_relationships
            + self.gold_relationships
    }
}

/// Consistency report for one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainReport {
    pub domain_id: String,
    pub domain_name: String,
    pub counts: LayerCounts,
    pub total_relationships: usize,

    /// Issues in layer order: logical, bronze, silver, gold
    pub issues: Vec<ValidationIssue>,
    pub status: DomainStatus,
}

/// Pass/warn/fail tally for a batch run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_domains: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,

    /// `passed / total_domains * 100`, rounded to one decimal place
    pub pass_rate: f64,
}

impl BatchSummary {
    /// Tally statuses of the given reports
    pub fn from_reports(reports: &[DomainReport]) -> Self {
        let count = |status: DomainStatus| reports.iter().filter(|r| r.status == status).count();

        let total_domains = reports.len();
        let passed = count(DomainStatus::Pass);

        Self {
            total_domains,
            passed,
            warned: count(DomainStatus::Warn),
            failed: count(DomainStatus::Fail),
            pass_rate: pass_rate(passed, total_domains),
        }
    }
}

fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = passed as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

/// Domains belonging to one priority tier, in report order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityGroup {
    /// Tier name (e.g. `P0`)
    pub tier: String,

    /// Tier description
    pub label: String,

    pub domain_ids: Vec<String>,
}

/// Batch consistency report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: BatchSummary,

    /// Per-domain reports, in evaluation order
    pub domains: Vec<DomainReport>,

    /// Priority grouping of `domains`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<PriorityGroup>,
}

impl BatchReport {
    /// Create a report from per-domain reports
    pub fn from_domains(domains: Vec<DomainReport>, groups: Vec<PriorityGroup>) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: BatchSummary::from_reports(&domains),
            domains,
            groups,
        }
    }

    /// Look up a domain report by id
    pub fn domain(&self, domain_id: &str) -> Option<&DomainReport> {
        self.domains.iter().find(|d| d.domain_id == domain_id)
    }

    /// Domains that did not pass, in evaluation order
    pub fn needing_attention(&self) -> impl Iterator<Item = &DomainReport> {
        self.domains.iter().filter(|d| d.status != DomainStatus::Pass)
    }

    /// Check if any domain failed
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
