use std::io::IsTerminal;

use clap::Args;
use serde::{Deserialize, Serialize};

use super::GlobalArgs;
use crate::catalog::{Catalog, Category};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckReport {
    pub catalog: String,
    pub categories: Vec<CategoryStatus>,
    pub footer: FooterStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub issues: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryStatus {
    pub name: String,
    pub rules: usize,
    pub templates: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FooterStatus {
    pub signatures: usize,
    pub source_code_texts: usize,
    pub issues_texts: usize,
}

impl CheckReport {
    /// Summarise a validated catalog.
    pub fn for_catalog(source: String, catalog: &Catalog) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let set = catalog.rules(category);
                CategoryStatus {
                    name: category.as_str().to_string(),
                    rules: set.len(),
                    templates: set.rules().iter().map(|r| r.templates().len()).sum(),
                }
            })
            .collect();

        let pools = catalog.footer().pools();
        Self {
            catalog: source,
            categories,
            footer: FooterStatus {
                signatures: pools.signatures.len(),
                source_code_texts: pools.source_code_texts.len(),
                issues_texts: pools.issues_texts.len(),
            },
            username: None,
            issues: vec![],
        }
    }
}

impl CheckArgs {
    /// Validate the catalog and settings. A catalog defect fails with the
    /// catalog exit code; missing settings are reported as issues.
    pub fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let loaded = global.load()?;
        let catalog = loaded.catalog()?;

        let mut report = CheckReport::for_catalog(loaded.catalog_source(), &catalog);

        match loaded.settings() {
            Ok(settings) => report.username = Some(settings.username),
            Err(e) => report.issues.push(e.to_string()),
        }

        for status in &report.categories {
            if status.rules == 0 {
                report.issues.push(format!("category `{}` has no rules", status.name));
            }
        }

        let format = self.format.unwrap_or_else(|| {
            if std::io::stdout().is_terminal() {
                OutputFormat::Pretty
            } else {
                OutputFormat::Text
            }
        });

        match format {
            OutputFormat::Pretty => print_pretty(&report),
            OutputFormat::Text => print_text(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        let issue_count = report.issues.len();
        if issue_count > 0 {
            return Err(crate::error::ExitError::new(
                u8::try_from(issue_count.min(125)).unwrap_or(125),
                format!("{issue_count} issue(s) found"),
            )
            .into());
        }

        Ok(())
    }
}

fn print_pretty(report: &CheckReport) {
    println!("=== Prequelbot Check ===\n");
    println!("Catalog:  {}", report.catalog);
    println!(
        "Username: {}",
        report.username.as_deref().unwrap_or("(not configured)")
    );
    println!();

    println!("Categories:");
    for status in &report.categories {
        let mark = if status.rules > 0 { "✓" } else { "✗" };
        println!(
            "  {mark} {}: {} rule(s), {} template(s)",
            status.name, status.rules, status.templates
        );
    }

    println!("\nFooter:");
    println!("  signatures:        {}", report.footer.signatures);
    println!("  source code texts: {}", report.footer.source_code_texts);
    println!("  issues texts:      {}", report.footer.issues_texts);

    if report.issues.is_empty() {
        println!("\n✓ No issues found");
    } else {
        println!("\nIssues ({}):", report.issues.len());
        for issue in &report.issues {
            println!("  • {issue}");
        }
    }
}

fn print_text(report: &CheckReport) {
    println!(
        "prequelbot-check  catalog={}  username={}",
        report.catalog,
        report.username.as_deref().unwrap_or("-")
    );

    for status in &report.categories {
        println!(
            "category  {}  rules={}  templates={}",
            status.name, status.rules, status.templates
        );
    }

    println!(
        "footer  signatures={}  source_code_texts={}  issues_texts={}",
        report.footer.signatures, report.footer.source_code_texts, report.footer.issues_texts
    );

    if !report.issues.is_empty() {
        println!("issues  count={}", report.issues.len());
        for issue in &report.issues {
            println!("issue  {issue}");
        }
    }
}
