// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Report aggregation and serialization.
//!
//! A report is derived entirely from a finished run's result log. It is
//! computed once per run and never updated in place.

mod render;

pub use render::{progress_line, render_console, render_text, RECOMMENDATIONS};

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::HarnessError;
use crate::runner::{CheckResult, CompletedRun};

/// Aggregate statistics over a result log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    #[serde(rename = "date")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "total_tests")]
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage of passing checks. `None` when no checks ran.
    pub pass_rate: Option<f64>,
}

impl Summary {
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.failed == 0
    }
}

/// Compute summary statistics. `generated_at` is supplied by the caller so
/// the same log always yields the same summary.
pub fn summarize(results: &[CheckResult], generated_at: DateTime<Utc>) -> Summary {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed()).count();
    let pass_rate = (total > 0).then(|| passed as f64 / total as f64 * 100.0);

    Summary {
        generated_at,
        total,
        passed,
        failed: total - passed,
        pass_rate,
    }
}

/// Summary plus the ordered results it was computed from. Serialized
/// through [`serialize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: Summary,
    pub results: Vec<CheckResult>,
}

#[derive(Serialize)]
struct ReportRef<'a> {
    summary: &'a Summary,
    results: &'a [CheckResult],
}

impl Report {
    pub fn from_run(run: &CompletedRun, generated_at: DateTime<Utc>) -> Self {
        Self {
            summary: summarize(run.results(), generated_at),
            results: run.results().to_vec(),
        }
    }

    /// Results that failed, in original order.
    pub fn critical_findings(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    pub fn render_text(&self) -> String {
        render_text(&self.summary, &self.results)
    }

    /// Text report including the saved-report line when `saved_to` is set.
    pub fn render_console(&self, saved_to: Option<&Path>) -> String {
        render_console(&self.summary, &self.results, saved_to)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, HarnessError> {
        serialize(&self.summary, &self.results)
    }
}

/// Serialize a report as pretty JSON with a fixed field order.
pub fn serialize(summary: &Summary, results: &[CheckResult]) -> Result<Vec<u8>, HarnessError> {
    let mut out = serde_json::to_vec_pretty(&ReportRef { summary, results })
        .map_err(|e| HarnessError::Serialization(e.to_string()))?;
    out.push(b'\n');
    Ok(out)
}

/// Write the report to `path`, replacing any previous file atomically.
pub fn write_report(path: &Path, report: &Report) -> Result<(), HarnessError> {
    let bytes = report.to_json()?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        HarnessError::Serialization(format!("failed to create temp file in {}: {e}", dir.display()))
    })?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| HarnessError::Serialization(format!("failed to write report: {e}")))?;
    tmp.persist(path).map_err(|e| {
        HarnessError::Serialization(format!("failed to persist {}: {}", path.display(), e.error))
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "report written");
    Ok(())
}
