//! # Run Report
//!
//! Snapshot of a finished run, rendered either as the human-readable summary
//! block or as JSON.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::testing::{Category, CategoryResults, Ledger};

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    #[serde(flatten)]
    pub results: CategoryResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub user_email: String,
    /// RFC 3339 timestamp of when the run started.
    pub started_at: String,
    pub duration_ms: u128,
    pub categories: Vec<CategoryReport>,
    pub total_passed: usize,
    pub total_failed: usize,
    pub success: bool,
}

impl RunReport {
    pub fn from_ledger(
        ledger: &Ledger,
        base_url: &str,
        user_email: &str,
        started_at: String,
        duration_ms: u128,
    ) -> Self {
        Self {
            base_url: base_url.to_string(),
            user_email: user_email.to_string(),
            started_at,
            duration_ms,
            categories: ledger
                .iter()
                .map(|(category, results)| CategoryReport {
                    category,
                    results: results.clone(),
                })
                .collect(),
            total_passed: ledger.total_passed(),
            total_failed: ledger.total_failed(),
            success: ledger.all_passed(),
        }
    }

    /// Write the report to `w` in `format`; returns overall success.
    pub fn render(&self, format: OutputFormat, w: &mut dyn Write) -> std::io::Result<bool> {
        match format {
            OutputFormat::Text => self.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, self)?;
                writeln!(w)?;
            }
        }
        Ok(self.success)
    }

    pub fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(w, "\n{rule}")?;
        writeln!(w, "🎯 EDUQUEST BACKEND API TEST SUMMARY")?;
        writeln!(w, "{rule}")?;

        for entry in &self.categories {
            let results = &entry.results;
            writeln!(
                w,
                "\n{} {}: {} passed, {} failed",
                status_icon(results),
                entry.category.as_str().to_uppercase(),
                results.passed,
                results.failed
            )?;
            for line in results.details() {
                writeln!(w, "  {line}")?;
            }
        }

        writeln!(w, "\n{rule}")?;
        if self.success {
            writeln!(w, "OVERALL: ✅ ALL TESTS PASSED")?;
        } else {
            writeln!(
                w,
                "OVERALL: ⚠️ {} PASSED, {} FAILED",
                self.total_passed, self.total_failed
            )?;
        }
        writeln!(w, "{rule}")
    }
}

fn status_icon(results: &CategoryResults) -> &'static str {
    if results.failed == 0 {
        "✅"
    } else if results.passed > results.failed {
        "⚠️"
    } else {
        "❌"
    }
}
