// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Outcome record of a single assertion.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Immutable record of one assertion. Only `CheckRunner::log_result`
/// constructs these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    #[serde(rename = "test_id")]
    sequence: usize,
    #[serde(rename = "test_name")]
    name: String,
    timestamp: DateTime<Utc>,
    passed: bool,
    details: Option<String>,
}

impl CheckResult {
    pub(crate) fn new(
        sequence: usize,
        name: String,
        timestamp: DateTime<Utc>,
        passed: bool,
        details: Option<String>,
    ) -> Self {
        Self {
            sequence,
            name,
            timestamp,
            passed,
            details,
        }
    }

    /// 1-based position in the run.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}
