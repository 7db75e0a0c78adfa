//! `verify-banks`: read-only validation with a failing exit code.

use camino::Utf8PathBuf;
use clap::Parser;

use super::{CliError, banks_dir};
use crate::config::BankSettings;
use crate::validation::{BankReport, Severity, Verification, VerifySource, verify_banks};

/// Findings listed per severity and bank before the rest are summarised.
pub const SHOWN_ISSUES: usize = 30;

/// Arguments for `verify-banks`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "verify-banks",
    about = "Validate question banks and fail on critical problems",
    version
)]
pub struct VerifyArgs {
    /// Banks directory holding `index.json`.
    #[arg(long = "banks-dir", value_name = "DIR")]
    pub banks_dir: Option<Utf8PathBuf>,
    /// Bank files to check instead of the indexed ones.
    #[arg(value_name = "FILE")]
    pub files: Vec<Utf8PathBuf>,
}

/// Verifies the selected banks.
///
/// # Errors
///
/// Returns [`CliError`] when settings or `index.json` cannot be read.
pub fn run(args: &VerifyArgs, settings: &BankSettings) -> Result<Verification, CliError> {
    let dir = banks_dir(args.banks_dir.as_deref(), settings)?;
    Ok(verify_banks(&dir, &args.files)?)
}

/// Renders the verification report.
#[must_use]
pub fn render(verification: &Verification) -> String {
    let source = match verification.source {
        VerifySource::Explicit => "files given on the command line",
        VerifySource::Index => "index.json",
        VerifySource::Legacy => "legacy bank files",
    };
    let mut lines = vec![format!("checking {source}")];
    for failure in &verification.failures {
        lines.push(format!("error: {failure}"));
    }
    for report in &verification.reports {
        render_bank(report, &mut lines);
    }
    if verification.reports.is_empty() && verification.failures.is_empty() {
        lines.push("no banks found".to_owned());
    }
    lines.push(format!(
        "{}: {} critical, {} warning(s)",
        if verification.passed() { "ok" } else { "failed" },
        verification.critical(),
        verification.warnings()
    ));
    lines.join("\n")
}

fn render_bank(report: &BankReport, lines: &mut Vec<String>) {
    lines.push(format!(
        "- {} ({}): items={}, passages={}",
        report.name,
        report.subject.as_deref().unwrap_or("?"),
        report.items,
        report.passages
    ));
    for severity in [Severity::Critical, Severity::Warning] {
        let matching: Vec<_> = report
            .issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .collect();
        lines.extend(
            matching
                .iter()
                .take(SHOWN_ISSUES)
                .map(|issue| format!("  {issue}")),
        );
        if matching.len() > SHOWN_ISSUES {
            lines.push(format!("  … and {} more", matching.len() - SHOWN_ISSUES));
        }
    }
}

/// Turns a failed verification into an error for the exit code.
///
/// # Errors
///
/// Returns [`CliError::VerificationFailed`] when anything critical was found.
pub fn ensure_passed(verification: &Verification) -> Result<(), CliError> {
    if verification.passed() {
        Ok(())
    } else {
        Err(CliError::VerificationFailed {
            critical: verification.critical(),
        })
    }
}
