//! Validate command - surface data quality issues without generating full reports

use super::{InputArgs, YearArgs};
use clap::Args;
use imposta::Warning;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    year: YearArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    holding_id: String,
    message: String,
}

impl From<&Warning> for ValidationIssue {
    fn from(warning: &Warning) -> Self {
        ValidationIssue {
            issue_type: warning_type_name(warning).to_string(),
            holding_id: warning.holding_id().to_string(),
            message: warning.message(),
        }
    }
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    tax_year: i32,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.input.load()?;
        // Rejected input (negative values, bad year) surfaces as an error here
        let result = input.calculate_taxes(&self.year.engine(), self.year.year)?;
        let issues: Vec<ValidationIssue> = result.warnings.iter().map(Into::into).collect();

        if self.json {
            let output = ValidationOutput {
                tax_year: result.tax_year.year(),
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue]) {
        println!();
        println!("VALIDATION RESULTS ({})", self.year.year);
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.holding_id);
                println!("     {}", issue.message);
                println!();
            }
        }
    }
}

fn warning_type_name(warning: &Warning) -> &'static str {
    match warning {
        Warning::UnknownHolding { .. } => "UnknownHolding",
        Warning::InsufficientLots { .. } => "InsufficientLots",
    }
}
