//! Configuration schema (medallion.toml)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::report::PriorityGroup;

/// Bronze/silver layers with at most this many tables may have no relationships
pub const DEFAULT_SMALL_LAYER_MAX_TABLES: usize = 3;

/// A fact is expected to reference up to this many dimensions
pub const DEFAULT_STAR_DIMENSION_CAP: usize = 3;

/// Fraction of the expected gold relationship count below which an issue is raised
pub const DEFAULT_EXPECTED_RATIO: f64 = 0.5;

/// Domains with more issues than this fail; fewer (but non-zero) warn
pub const DEFAULT_WARN_MAX_ISSUES: usize = 2;

/// Calibration knobs for the layer health heuristics
///
/// These are calibration values, not a star-schema completeness proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicThresholds {
    /// Bronze/silver layers at or below this size are exempt from the
    /// no-relationships check
    pub small_layer_max_tables: usize,

    /// Cap on the number of dimensions each fact is expected to reference
    pub star_dimension_cap: usize,

    /// Ratio of the expected gold relationship count that must be present
    pub expected_ratio: f64,

    /// Maximum issue count that still classifies as WARN
    pub warn_max_issues: usize,
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            small_layer_max_tables: DEFAULT_SMALL_LAYER_MAX_TABLES,
            star_dimension_cap: DEFAULT_STAR_DIMENSION_CAP,
            expected_ratio: DEFAULT_EXPECTED_RATIO,
            warn_max_issues: DEFAULT_WARN_MAX_ISSUES,
        }
    }
}

/// A named priority tier and the domains assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTier {
    /// Short tier name (e.g. `P0`)
    pub name: String,

    /// Tier description
    #[serde(default)]
    pub label: String,

    /// Domain ids in this tier
    #[serde(default)]
    pub domains: Vec<String>,
}

impl PriorityTier {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            domains: Vec::new(),
        }
    }

    /// Assign domains to this tier
    pub fn with_domains<S: Into<String>>(mut self, domains: impl IntoIterator<Item = S>) -> Self {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }
}

/// Externally supplied partition of domains into priority tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTiers {
    /// Tiers in display order; the first tier listing a domain wins
    #[serde(default)]
    pub tiers: Vec<PriorityTier>,

    /// Tier for domains not listed anywhere
    #[serde(default = "PriorityTiers::default_fallback")]
    pub fallback: PriorityTier,
}

impl Default for PriorityTiers {
    fn default() -> Self {
        Self {
            tiers: Vec::new(),
            fallback: Self::default_fallback(),
        }
    }
}

impl PriorityTiers {
    fn default_fallback() -> PriorityTier {
        PriorityTier::new("ALL", "Registered Domains")
    }

    /// Tier a domain belongs to
    pub fn tier_for(&self, domain_id: &str) -> &PriorityTier {
        self.tiers
            .iter()
            .find(|t| t.domains.iter().any(|d| d == domain_id))
            .unwrap_or(&self.fallback)
    }

    /// Partition `domain_ids` into groups, one per tier plus the fallback,
    /// keeping the order of `domain_ids` inside each group
    pub fn group<S: AsRef<str>>(&self, domain_ids: &[S]) -> Vec<PriorityGroup> {
        self.tiers
            .iter()
            .chain(std::iter::once(&self.fallback))
            .map(|tier| PriorityGroup {
                tier: tier.name.clone(),
                label: tier.label.clone(),
                domain_ids: domain_ids
                    .iter()
                    .map(|id| id.as_ref())
                    .filter(|id| std::ptr::eq(self.tier_for(id), tier))
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one `<domain-id>.json` catalog per domain
    #[serde(default = "Config::default_catalog_dir")]
    pub catalog_dir: PathBuf,

    /// Schema used in DDL when a table name is unqualified
    #[serde(default = "Config::default_schema")]
    pub default_schema: String,

    /// Fill empty relationship lists with derived edges
    #[serde(default, alias = "derive_gold_relationships")]
    pub derive_relationships: bool,

    /// Heuristic calibration
    #[serde(default)]
    pub thresholds: HeuristicThresholds,

    /// Priority tiers for the batch summary
    #[serde(default)]
    pub priorities: PriorityTiers,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_dir: Self::default_catalog_dir(),
            default_schema: Self::default_schema(),
            derive_relationships: false,
            thresholds: HeuristicThresholds::default(),
            priorities: PriorityTiers::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    fn default_catalog_dir() -> PathBuf {
        PathBuf::from("catalog")
    }

    fn default_schema() -> String {
        "analytics".to_string()
    }

    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Catalog directory resolved against the project root
    pub fn catalog_path(&self) -> PathBuf {
        if self.catalog_dir.is_absolute() {
            self.catalog_dir.clone()
        } else {
            self.project_root.join(&self.catalog_dir)
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.default_schema, "analytics");
        assert_eq!(config.catalog_dir, PathBuf::from("catalog"));
        assert!(!config.derive_relationships);
        assert_eq!(config.thresholds, HeuristicThresholds::default());
    }

    #[test]
    fn default_thresholds_match_documented_constants() {
        let t = HeuristicThresholds::default();
        assert_eq!(t.small_layer_max_tables, 3);
        assert_eq!(t.star_dimension_cap, 3);
        assert_eq!(t.expected_ratio, 0.5);
        assert_eq!(t.warn_max_issues, 2);
    }

    #[test]
    fn partial_threshold_override() {
        let config = Config::from_toml(
            r#"
            [thresholds]
            expected_ratio = 0.75
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.expected_ratio, 0.75);
        assert_eq!(config.thresholds.star_dimension_cap, 3);
    }

    #[test]
    fn derivation_switch_accepts_gold_only_name() {
        assert!(Config::from_toml("derive_relationships = true").unwrap().derive_relationships);
        assert!(Config::from_toml("derive_gold_relationships = true").unwrap().derive_relationships);
    }

    #[test]
    fn priority_tiers_from_toml() {
        let config = Config::from_toml(
            r#"
            [priorities]
            tiers = [
              { name = "P0", label = "Critical", domains = ["deposits", "loans"] },
              { name = "P1", label = "High", domains = ["payments"] },
            ]
            fallback = { name = "P2", label = "Standard" }
            "#,
        )
        .unwrap();

        let tiers = &config.priorities;
        assert_eq!(tiers.tier_for("loans").name, "P0");
        assert_eq!(tiers.tier_for("payments").name, "P1");
        assert_eq!(tiers.tier_for("wealth").name, "P2");
    }

    #[test]
    fn grouping_keeps_report_order() {
        let tiers = PriorityTiers {
            tiers: vec![PriorityTier::new("P0", "Critical").with_domains(["loans", "deposits"])],
            fallback: PriorityTier::new("P2", "Standard"),
        };

        let groups = tiers.group(&["wealth", "deposits", "loans"]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].tier, "P0");
        assert_eq!(groups[0].domain_ids, vec!["deposits", "loans"]);
        assert_eq!(groups[1].domain_ids, vec!["wealth"]);
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.thresholds, parsed.thresholds);
        assert_eq!(config.priorities, parsed.priorities);
    }

    #[test]
    fn relative_catalog_dir_resolves_against_project_root() {
        let mut config = Config::default();
        config.project_root = PathBuf::from("/srv/catalogs");
        assert_eq!(config.catalog_path(), PathBuf::from("/srv/catalogs/catalog"));
    }
}
