// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Human-readable rendering.

use std::fmt::Write;
use std::path::Path;

use crate::runner::CheckResult;

use super::Summary;

const RULE_WIDTH: usize = 60;

pub const REPORT_TITLE: &str = "ENCRYPTION TEST REPORT - Security Validation";

/// Fixed follow-up recommendations printed after every report.
pub const RECOMMENDATIONS: [&str; 5] = [
    "Continue regular key rotation schedule",
    "Implement automated encryption testing in CI/CD",
    "Consider upgrading to AES-256 for all sensitive data",
    "Add encryption monitoring to production systems",
    "Schedule quarterly encryption audits",
];

/// One progress line (plus optional detail line) for a freshly logged result.
pub fn progress_line(result: &CheckResult) -> String {
    let marker = if result.passed() { '✓' } else { '✗' };
    let mut line = format!("{} Test {}: {}", marker, result.sequence(), result.name());
    if let Some(details) = result.details() {
        let _ = write!(line, "\n  Details: {details}");
    }
    line
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}:");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
}

/// Render the full text report. Output depends only on the arguments.
pub fn render_text(summary: &Summary, results: &[CheckResult]) -> String {
    render_console(summary, results, None)
}

/// Render the report as printed after a run, with the saved-report line
/// between the detailed results and the critical findings.
pub fn render_console(
    summary: &Summary,
    results: &[CheckResult],
    saved_to: Option<&Path>,
) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{REPORT_TITLE}");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Test Date: {}",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Total Tests Run: {}", summary.total);
    let _ = writeln!(out, "Tests Passed: {}", summary.passed);
    let _ = writeln!(out, "Tests Failed: {}", summary.failed);
    match summary.pass_rate {
        Some(rate) => {
            let _ = writeln!(out, "Pass Rate: {rate:.1}%");
        }
        None => {
            let _ = writeln!(out, "Pass Rate: N/A (no tests run)");
        }
    }

    section(&mut out, "DETAILED RESULTS");
    for r in results {
        let status = if r.passed() { "PASS" } else { "FAIL" };
        let _ = writeln!(out, "{:3}. [{}] {}", r.sequence(), status, r.name());
        if let Some(details) = r.details() {
            let _ = writeln!(out, "     → {details}");
        }
    }

    if let Some(path) = saved_to {
        let _ = writeln!(out, "\n✓ Report saved to '{}'", path.display());
    }

    section(&mut out, "CRITICAL FINDINGS");
    let mut failures = results.iter().filter(|r| !r.passed()).peekable();
    if results.is_empty() {
        let _ = writeln!(out, "✓ No critical issues found - no tests were run");
    } else if failures.peek().is_none() {
        let _ = writeln!(out, "✓ No critical issues found - all encryption tests passed");
    } else {
        for r in failures {
            let _ = writeln!(out, "⚠️  {}: {}", r.name(), r.details().unwrap_or(""));
        }
    }

    section(&mut out, "RECOMMENDATIONS");
    for (i, rec) in RECOMMENDATIONS.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, rec);
    }

    out
}
