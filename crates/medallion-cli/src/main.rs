use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use medallion_core::{BatchReport, Config, DomainReport, DomainStatus, Layer, TableDefinition};
use medallion_catalog::{CatalogRegistry, DirectoryRegistry};
use medallion_ddl::{table_columns, DdlCompiler};
use medallion_engine::{BatchRunner, DomainEvaluator};

const DEFAULT_CONFIG_FILE: &str = "medallion.toml";

/// Medallion - DDL compiler and relationship consistency checks for layered data catalogs
#[derive(Parser)]
#[command(name = "medallion")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: medallion.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    // None runs `verify` over every registered domain
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate relationship consistency across all layers
    Verify {
        /// Output file for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,

        /// Only evaluate these domains (repeatable)
        #[arg(short, long = "domain")]
        domains: Vec<String>,
    },

    /// Print CREATE TABLE statements for a domain
    Ddl {
        /// Domain id
        domain: String,

        /// Only this layer (bronze, silver or gold)
        #[arg(short, long)]
        layer: Option<Layer>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        None => verify_command(&config, None, None, &[], cli.verbose),
        Some(Commands::Verify { output, markdown, domains }) => {
            verify_command(&config, output.as_deref(), markdown.as_deref(), &domains, cli.verbose)
        }
        Some(Commands::Ddl { domain, layer }) => ddl_command(&config, &domain, layer),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let config = if let Some(config_path) = path {
        Config::from_file(config_path)?
    } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG_FILE))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if verbose {
        eprintln!("{} {}", "Catalog directory:".cyan(), config.catalog_path().display());
    }

    Ok(config)
}

fn load_registry(config: &Config) -> Result<DirectoryRegistry> {
    let catalog_path = config.catalog_path();
    DirectoryRegistry::load(&catalog_path)
        .map_err(|e| anyhow::anyhow!("Failed to load catalogs from {}: {}", catalog_path.display(), e))
}

/// Verify command - evaluate domains and report
fn verify_command(
    config: &Config,
    output: Option<&Path>,
    markdown: Option<&Path>,
    domains: &[String],
    verbose: bool,
) -> Result<()> {
    let registry = load_registry(config)?;

    if verbose {
        eprintln!("{} {} domains", "Evaluating".cyan(), if domains.is_empty() { registry.len() } else { domains.len() });
    }

    let evaluator = DomainEvaluator::new(config.thresholds.clone())
        .with_derived_relationships(config.derive_relationships);
    let runner = BatchRunner::new(&registry, evaluator).with_priorities(config.priorities.clone());

    let report = if domains.is_empty() {
        runner.run()?
    } else {
        runner.run_domains(domains)?
    };

    if let Some(path) = output {
        report.save_to_file(path)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

/// DDL command - render tables of one domain
fn ddl_command(config: &Config, domain_id: &str, layer: Option<Layer>) -> Result<()> {
    let registry = load_registry(config)?;
    let catalog = registry.get(domain_id)?;

    let tables: Vec<&TableDefinition> = match layer {
        Some(Layer::Logical) => {
            return Err(anyhow::anyhow!(
                "The logical layer holds entities, not tables. Use --layer bronze, silver or gold."
            ));
        }
        Some(layer) => catalog.tables(layer),
        None => [Layer::Bronze, Layer::Silver, Layer::Gold]
            .into_iter()
            .flat_map(|layer| catalog.tables(layer))
            .collect(),
    };

    for table in &tables {
        let columns = table_columns(table);
        for key in table.missing_primary_key_columns(&columns) {
            tracing::warn!(table = %table.name, column = key, "primary key column is not declared");
        }
    }

    let compiler = DdlCompiler::new().with_default_schema(config.default_schema.clone());
    println!("{}", compiler.compile_all(tables));

    Ok(())
}

fn status_label(status: DomainStatus) -> colored::ColoredString {
    match status {
        DomainStatus::Pass => status.as_str().green().bold(),
        DomainStatus::Warn => status.as_str().yellow().bold(),
        DomainStatus::Fail => status.as_str().red().bold(),
    }
}

fn print_domain(domain: &DomainReport) {
    let c = &domain.counts;

    println!(
        "{} {} ({}) [{}]",
        domain.status.glyph(),
        domain.domain_name.bold(),
        domain.domain_id,
        status_label(domain.status)
    );
    println!(
        "    Logical: {} entities, {} rels | Bronze: {} tables, {} rels | Silver: {} tables, {} rels",
        c.logical_entities,
        c.logical_relationships,
        c.bronze_tables,
        c.bronze_relationships,
        c.silver_tables,
        c.silver_relationships
    );
    println!(
        "    Gold: {} dims, {} facts, {} rels | Total: {} rels",
        c.gold_dimensions, c.gold_facts, c.gold_relationships, domain.total_relationships
    );

    for issue in &domain.issues {
        println!("    - {}", issue);
    }
}

/// Issue lines listed under a domain in the attention section
fn attention_issue_lines(domain: &DomainReport) -> Vec<String> {
    domain.issues.iter().map(|issue| format!("      - {}", issue)).collect()
}

/// Print report summary to stdout
fn print_report_summary(report: &BatchReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Relationship Consistency Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    for domain in &report.domains {
        print_domain(domain);
    }
    println!();

    let summary = &report.summary;
    println!("{}", "Summary:".bold());
    println!("  Total domains: {}", summary.total_domains);
    println!("  Passed:  {}", summary.passed.to_string().green());

    if summary.warned > 0 {
        println!("  Warned:  {}", summary.warned.to_string().yellow());
    } else {
        println!("  Warned:  {}", summary.warned.to_string().green());
    }

    if summary.failed > 0 {
        println!("  Failed:  {}", summary.failed.to_string().red().bold());
    } else {
        println!("  Failed:  {}", summary.failed.to_string().green());
    }

    println!("  Pass rate: {:.1}%", summary.pass_rate);
    println!();

    let attention: Vec<&DomainReport> = report.needing_attention().collect();
    if attention.is_empty() {
        println!("{}", "✓ All domains passed!".green().bold());
    } else {
        println!("{}", "Needs attention:".bold());
        for domain in attention {
            println!("  [{}] {}: {} issue(s)", status_label(domain.status), domain.domain_id, domain.issues.len());
            for line in attention_issue_lines(domain) {
                println!("{}", line);
            }
        }
    }

    let width = report
        .domains
        .iter()
        .map(|d| d.domain_name.chars().count())
        .max()
        .unwrap_or(0);

    for group in report.groups.iter().filter(|g| !g.domain_ids.is_empty()) {
        println!();
        println!("{}", format!("{} ({})", group.label, group.tier).bold());

        for domain in group.domain_ids.iter().filter_map(|id| report.domain(id)) {
            println!(
                "  {} {:<width$} | Total Rels: {:>3} |",
                domain.status.glyph(),
                domain.domain_name,
                domain.total_relationships,
                width = width
            );
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &BatchReport) -> String {
    let mut md = String::new();

    md.push_str("# Relationship Consistency Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    let summary = &report.summary;
    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Total domains: {}\n", summary.total_domains));
    md.push_str(&format!("- Passed: {}\n", summary.passed));
    md.push_str(&format!("- Warned: {}\n", summary.warned));
    md.push_str(&format!("- Failed: {}\n", summary.failed));
    md.push_str(&format!("- Pass rate: {:.1}%\n", summary.pass_rate));
    md.push('\n');

    md.push_str("## Domains\n\n");
    md.push_str("| Status | Domain | Logical | Bronze | Silver | Gold (dims/facts) | Relationships |\n");
    md.push_str("|---|---|---|---|---|---|---|\n");
    for domain in &report.domains {
        let c = &domain.counts;
        md.push_str(&format!(
            "| {} {} | {} | {} | {} | {} | {}/{} | {} |\n",
            domain.status.glyph(),
            domain.status,
            domain.domain_name,
            c.logical_entities,
            c.bronze_tables,
            c.silver_tables,
            c.gold_dimensions,
            c.gold_facts,
            domain.total_relationships
        ));
    }
    md.push('\n');

    if report.needing_attention().next().is_none() {
        md.push_str("✅ **All domains passed!**\n");
    } else {
        md.push_str("## Issues\n\n");

        for domain in report.needing_attention() {
            md.push_str(&format!("### {} {} ({})\n\n", domain.status.glyph(), domain.domain_name, domain.domain_id));
            for issue in &domain.issues {
                md.push_str(&format!("- `{}` {}\n", issue.code, issue));
            }
            md.push('\n');
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use medallion_core::{IssueCode, LayerCounts, ValidationIssue};

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_verify() {
        let cli = Cli::try_parse_from(["medallion"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_layer_and_domains() {
        let cli = Cli::try_parse_from(["medallion", "ddl", "cards", "--layer", "gold"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Ddl { layer: Some(Layer::Gold), .. })));

        let cli = Cli::try_parse_from(["medallion", "verify", "-d", "cards", "-d", "loans"]).unwrap();
        match cli.command {
            Some(Commands::Verify { domains, .. }) => assert_eq!(domains, vec!["cards", "loans"]),
            _ => panic!("expected verify"),
        }
    }

    #[test]
    fn attention_section_lists_each_issue() {
        let failed = DomainReport {
            domain_id: "treasury".to_string(),
            domain_name: "Treasury".to_string(),
            counts: LayerCounts::default(),
            total_relationships: 0,
            issues: vec![
                ValidationIssue::new(Layer::Silver, IssueCode::LayerDisconnected, "No relationships detected"),
                ValidationIssue::new(Layer::Gold, IssueCode::StarSchemaMissing, "No fact-dimension relationships"),
            ],
            status: DomainStatus::Fail,
        };

        assert_eq!(
            attention_issue_lines(&failed),
            vec![
                "      - Silver ERD: No relationships detected".to_string(),
                "      - Gold ERD: No fact-dimension relationships".to_string(),
            ]
        );
    }

    #[test]
    fn markdown_lists_issues_for_non_passing_domains() {
        let warned = DomainReport {
            domain_id: "payments".to_string(),
            domain_name: "Payments".to_string(),
            counts: LayerCounts { bronze_tables: 5, ..LayerCounts::default() },
            total_relationships: 0,
            issues: vec![ValidationIssue::new(
                Layer::Bronze,
                IssueCode::LayerDisconnected,
                "No relationships detected",
            )],
            status: DomainStatus::Warn,
        };
        let report = BatchReport::from_domains(vec![warned], Vec::new());

        let md = generate_markdown_report(&report);
        assert!(md.contains("- Pass rate: 0.0%"));
        assert!(md.contains("### ⚠️ Payments (payments)"));
        assert!(md.contains("- `LAYER_DISCONNECTED` Bronze ERD: No relationships detected"));
    }
}
