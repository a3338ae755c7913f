//! Batch evaluation over a catalog registry

use medallion_catalog::{CatalogError, CatalogRegistry};
use medallion_core::{BatchReport, DomainReport, PriorityTiers};
use crate::evaluator::DomainEvaluator;

/// Evaluates registered domains and assembles a batch report
pub struct BatchRunner<'r> {
    registry: &'r dyn CatalogRegistry,
    evaluator: DomainEvaluator,
    priorities: PriorityTiers,
}

impl<'r> BatchRunner<'r> {
    pub fn new(registry: &'r dyn CatalogRegistry, evaluator: DomainEvaluator) -> Self {
        Self {
            registry,
            evaluator,
            priorities: PriorityTiers::default(),
        }
    }

    /// Group the report by these priority tiers
    pub fn with_priorities(mut self, priorities: PriorityTiers) -> Self {
        self.priorities = priorities;
        self
    }

    /// Evaluate a single domain by id
    pub fn evaluate_domain(&self, domain_id: &str) -> Result<DomainReport, CatalogError> {
        let catalog = self.registry.get(domain_id)?;
        Ok(self.evaluator.evaluate(catalog))
    }

    /// Evaluate every registered domain, in registry order
    pub fn run(&self) -> Result<BatchReport, CatalogError> {
        self.run_domains(&self.registry.domain_ids())
    }

    /// Evaluate the listed domains, in the given order.
    ///
    /// An unknown id aborts the run; a domain is never left out of a report silently.
    pub fn run_domains<S: AsRef<str>>(&self, domain_ids: &[S]) -> Result<BatchReport, CatalogError> {
        let domains = domain_ids
            .iter()
            .map(|id| self.evaluate_domain(id.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<&str> = domains.iter().map(|d| d.domain_id.as_str()).collect();
        let groups = self.priorities.group(&ids);

        let report = BatchReport::from_domains(domains, groups);

        tracing::info!(
            registry = self.registry.name(),
            domains = report.summary.total_domains,
            passed = report.summary.passed,
            warned = report.summary.warned,
            failed = report.summary.failed,
            "batch evaluation complete"
        );

        Ok(report)
    }
}
