// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Check execution.
//!
//! A `CheckRunner` owns the ordered result log of exactly one run. It moves
//! `Idle -> Running` on the first logged result and `Running -> Completed`
//! when `finish` consumes it, so a finished run can never be appended to.
//!
//! Check groups are isolated from each other: an error or panic inside one
//! group becomes a single failing result named after the group, and the
//! next group still runs.

mod result;

pub use result::CheckResult;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use crate::error::HarnessError;

/// Error type returned by check groups.
pub type GroupError = Box<dyn std::error::Error + Send + Sync>;

/// A named batch of related assertions.
pub trait CheckGroup {
    fn name(&self) -> &str;

    /// Label shown when the group starts. Defaults to the name.
    fn heading(&self) -> &str {
        self.name()
    }

    /// Run the assertions, logging each through `runner.log_result`.
    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError>;
}

/// Adapts a closure into a `CheckGroup`.
pub struct FnCheckGroup<F> {
    name: String,
    f: F,
}

/// Build a check group from a name and a closure.
pub fn check_group<F>(name: impl Into<String>, f: F) -> FnCheckGroup<F>
where
    F: Fn(&mut CheckRunner) -> Result<(), GroupError>,
{
    FnCheckGroup {
        name: name.into(),
        f,
    }
}

impl<F> CheckGroup for FnCheckGroup<F>
where
    F: Fn(&mut CheckRunner) -> Result<(), GroupError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        (self.f)(runner)
    }
}

/// Receives progress notifications while a run executes.
///
/// A sink that panics is detached; the run continues without it.
pub trait ProgressSink {
    fn group_started(&mut self, _heading: &str) {}

    fn result_logged(&mut self, result: &CheckResult);
}

/// Runner lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
}

/// What happened when a group was run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub name: String,
    /// Results appended while the group ran, including any synthetic failure.
    pub logged: usize,
    /// Error text if the group failed unexpectedly.
    pub aborted: Option<String>,
}

/// Executes check groups and owns the ordered result log of one run.
pub struct CheckRunner {
    results: Vec<CheckResult>,
    passed: usize,
    state: RunState,
    started_at: Option<DateTime<Utc>>,
    progress: Option<Box<dyn ProgressSink>>,
}

impl CheckRunner {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            passed: 0,
            state: RunState::Idle,
            started_at: None,
            progress: None,
        }
    }

    /// Attach a progress sink notified of every group and result.
    pub fn with_progress(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn passed_count(&self) -> usize {
        self.passed
    }

    /// Record one assertion outcome. Empty `details` is stored as absent.
    pub fn log_result(
        &mut self,
        name: impl Into<String>,
        passed: bool,
        details: impl Into<String>,
    ) -> &CheckResult {
        let now = Utc::now();
        if self.state == RunState::Idle {
            self.state = RunState::Running;
            self.started_at = Some(now);
        }

        let details = details.into();
        let result = CheckResult::new(
            self.results.len() + 1,
            name.into(),
            now,
            passed,
            (!details.is_empty()).then_some(details),
        );
        if passed {
            self.passed += 1;
        }

        debug!(
            test_id = result.sequence(),
            name = result.name(),
            passed,
            "check result logged"
        );
        self.notify(|sink| sink.result_logged(&result));

        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    /// Run one group, converting an unexpected error or panic into a single
    /// failing result named after the group.
    pub fn run_check_group(&mut self, group: &dyn CheckGroup) -> GroupOutcome {
        let name = group.name().to_string();
        let before = self.results.len();
        self.notify(|sink| sink.group_started(group.heading()));

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| group.run(self)));
        let aborted = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };

        if let Some(message) = &aborted {
            let err = HarnessError::CheckExecution {
                group: name.clone(),
                message: message.clone(),
            };
            error!(group = %name, error = %err, "check group aborted");
            self.log_result(name.clone(), false, message.clone());
        }

        GroupOutcome {
            name,
            logged: self.results.len() - before,
            aborted,
        }
    }

    fn notify(&mut self, f: impl FnOnce(&mut Box<dyn ProgressSink>)) {
        let Some(sink) = self.progress.as_mut() else {
            return;
        };
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| f(sink))) {
            warn!(
                error = %panic_message(payload.as_ref()),
                "progress sink panicked, detaching it"
            );
            self.progress = None;
        }
    }

    /// Run groups in declared order.
    pub fn run_all(&mut self, groups: &[Box<dyn CheckGroup + '_>]) -> Vec<GroupOutcome> {
        groups
            .iter()
            .map(|group| self.run_check_group(group.as_ref()))
            .collect()
    }

    /// End the run. Consumes the runner.
    pub fn finish(self) -> CompletedRun {
        let completed_at = Utc::now();
        CompletedRun {
            started_at: self.started_at.unwrap_or(completed_at),
            completed_at,
            passed: self.passed,
            results: self.results,
        }
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

/// The frozen result log of a finished run.
#[derive(Debug, Clone)]
pub struct CompletedRun {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    passed: usize,
    results: Vec<CheckResult>,
}

impl CompletedRun {
    pub fn state(&self) -> RunState {
        RunState::Completed
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed
    }

    /// True when at least one check ran and none failed.
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.failed() == 0
    }
}
