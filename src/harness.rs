// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end run orchestration.
//!
//! One run: prepare and seed the store, execute the standard battery,
//! freeze the result log, tear the store down, then write the report.
//! Store faults abort only the operation that raised them. The store is
//! closed on every path that returns.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::checks::{standard_battery, CredentialStorageGroup, Profile};
use crate::crypto::hash::{DEFAULT_ITERATIONS, DEFAULT_SALT};
use crate::error::HarnessError;
use crate::report::{progress_line, write_report, Report};
use crate::runner::{CheckResult, CheckRunner, GroupOutcome, ProgressSink};
use crate::store::{seed_credentials, CredentialStore};

/// Prints group headers and progress lines, by default to stdout.
///
/// The first write error (a closed pipe, for instance) silences all further
/// output; the run itself is unaffected.
pub struct ConsoleProgress {
    out: Box<dyn Write>,
    silenced: bool,
}

impl ConsoleProgress {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self {
            out,
            silenced: false,
        }
    }

    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        if self.silenced {
            return;
        }
        if let Err(e) = self.out.write_fmt(text).and_then(|_| self.out.flush()) {
            warn!(error = %e, "console output failed, progress silenced");
            self.silenced = true;
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl ProgressSink for ConsoleProgress {
    fn group_started(&mut self, heading: &str) {
        self.emit(format_args!("\n[TESTING {}]\n", heading.to_uppercase()));
    }

    fn result_logged(&mut self, result: &CheckResult) {
        self.emit(format_args!("{}\n", progress_line(result)));
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub report: Report,
    pub groups: Vec<GroupOutcome>,
    /// Store faults that were logged and skipped.
    pub store_errors: Vec<HarnessError>,
    /// Where the report was written, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl RunOutcome {
    /// `0` when every check passed, otherwise `1` (including an empty run).
    pub fn exit_code(&self) -> u8 {
        if self.report.summary.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Configured harness. Consumed by [`Harness::run`].
pub struct Harness {
    profile: Profile,
    report_path: Option<PathBuf>,
    keep_store: bool,
    hash_iterations: u32,
    progress: Option<Box<dyn ProgressSink>>,
}

impl Harness {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            report_path: None,
            keep_store: false,
            hash_iterations: DEFAULT_ITERATIONS,
            progress: None,
        }
    }

    /// Write the JSON report here after the run.
    pub fn with_report_path(mut self, path: impl AsRef<Path>) -> Self {
        self.report_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Leave seeded credentials in place instead of dropping them.
    pub fn keep_store(mut self, keep: bool) -> Self {
        self.keep_store = keep;
        self
    }

    /// PBKDF2 iterations for seeding and the password hashing group.
    pub fn with_hash_iterations(mut self, iterations: u32) -> Self {
        self.hash_iterations = iterations;
        self
    }

    pub fn with_progress(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Execute one run against an optional store.
    ///
    /// Only a report write failure is returned as an error. The store has
    /// already been closed by then.
    pub fn run<S: CredentialStore>(self, store: Option<S>) -> Result<RunOutcome, HarnessError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id);
        let _guard = span.enter();

        let Harness {
            profile,
            report_path,
            keep_store,
            hash_iterations,
            progress,
        } = self;

        let mut store = store;
        let mut store_errors = Vec::new();

        if let Some(s) = store.as_mut() {
            if let Err(e) = prepare_store(s, &profile, hash_iterations) {
                error!(error = %e, "store setup failed, continuing without seeded data");
                store_errors.push(e);
            }
        }

        let mut runner = CheckRunner::new();
        if let Some(sink) = progress {
            runner = runner.with_progress(sink);
        }

        info!(store_attached = store.is_some(), "running check battery");
        let battery = standard_battery(&profile, hash_iterations);
        let mut groups = runner.run_all(&battery);

        if let Some(s) = store.as_ref() {
            let group = CredentialStorageGroup::new(s, profile.seed_users.clone());
            groups.push(runner.run_check_group(&group));
        }

        let run = runner.finish();
        info!(
            total = run.total(),
            passed = run.passed(),
            failed = run.failed(),
            "check battery finished"
        );
        let report = Report::from_run(&run, Utc::now());

        if let Some(s) = store {
            store_errors.extend(teardown_store(s, keep_store));
        }

        if let Some(path) = &report_path {
            write_report(path, &report)?;
        }

        Ok(RunOutcome {
            run_id,
            report,
            groups,
            store_errors,
            report_path,
        })
    }
}

fn prepare_store<S: CredentialStore>(
    store: &mut S,
    profile: &Profile,
    iterations: u32,
) -> Result<(), HarnessError> {
    store
        .ensure_schema()
        .map_err(|e| HarnessError::store("schema setup", e))?;
    seed_credentials(store, &profile.seed_users, DEFAULT_SALT, iterations)
        .map_err(|e| HarnessError::store("seeding", e))?;
    Ok(())
}

fn teardown_store<S: CredentialStore>(mut store: S, keep: bool) -> Vec<HarnessError> {
    let mut errors = Vec::new();

    if keep {
        info!("keeping seeded credentials");
    } else if let Err(e) = store.drop_all() {
        let err = HarnessError::store("cleanup", e);
        warn!(error = %err, "store cleanup failed");
        errors.push(err);
    }

    if let Err(e) = store.close() {
        let err = HarnessError::store("close", e);
        warn!(error = %err, "store close failed");
        errors.push(err);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Credential, MemoryStore, StoreError, UpsertOutcome};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Wraps a MemoryStore and records whether close was called.
    struct TrackedStore {
        inner: MemoryStore,
        closed: Rc<Cell<bool>>,
        fail_drop: bool,
    }

    impl TrackedStore {
        fn new(inner: MemoryStore) -> (Self, Rc<Cell<bool>>) {
            let closed = Rc::new(Cell::new(false));
            let store = Self {
                inner,
                closed: Rc::clone(&closed),
                fail_drop: false,
            };
            (store, closed)
        }
    }

    impl CredentialStore for TrackedStore {
        fn ensure_schema(&mut self) -> Result<(), StoreError> {
            self.inner.ensure_schema()
        }

        fn upsert(&mut self, username: &str, digest: &str) -> Result<UpsertOutcome, StoreError> {
            self.inner.upsert(username, digest)
        }

        fn list_all(&self) -> Result<Vec<Credential>, StoreError> {
            self.inner.list_all()
        }

        fn lookup(&self, username: &str) -> Result<Option<Credential>, StoreError> {
            self.inner.lookup(username)
        }

        fn drop_all(&mut self) -> Result<(), StoreError> {
            if self.fail_drop {
                return Err(StoreError::Query("drop refused".into()));
            }
            self.inner.drop_all()
        }

        fn close(self) -> Result<(), StoreError> {
            self.closed.set(true);
            self.inner.close()
        }
    }

    fn harness() -> Harness {
        Harness::new(Profile::default()).with_hash_iterations(10)
    }

    #[test]
    fn test_run_with_memory_store_passes() {
        let (store, closed) = TrackedStore::new(MemoryStore::new());
        let outcome = harness().run(Some(store)).unwrap();

        assert!(closed.get());
        assert!(outcome.store_errors.is_empty());
        assert_eq!(outcome.groups.len(), 11);
        assert_eq!(outcome.groups[10].name, "Credential Storage");
        assert!(outcome.report.summary.all_passed());
        assert_eq!(outcome.exit_code(), 0);
        assert!(outcome.report_path.is_none());
    }

    #[test]
    fn test_run_without_store_skips_credential_group() {
        let outcome = harness().run(None::<MemoryStore>).unwrap();
        assert_eq!(outcome.groups.len(), 10);
        assert!(outcome
            .groups
            .iter()
            .all(|g| g.name != "Credential Storage"));
    }

    #[test]
    fn test_unreachable_store_still_runs_checks_and_closes() {
        let (store, closed) = TrackedStore::new(MemoryStore::unreachable());
        let outcome = harness().run(Some(store)).unwrap();

        assert!(closed.get());
        assert!(outcome.store_errors.iter().any(|e| e.is_store_connection()));
        // Credential group aborts, every other group still ran.
        assert_eq!(outcome.groups.len(), 11);
        assert!(outcome.groups[10].aborted.is_some());
        assert!(outcome.groups[..10].iter().all(|g| g.aborted.is_none()));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_cleanup_failure_is_recorded_and_store_closed() {
        let (mut store, closed) = TrackedStore::new(MemoryStore::new());
        store.fail_drop = true;
        let outcome = harness().run(Some(store)).unwrap();

        assert!(closed.get());
        assert_eq!(outcome.store_errors.len(), 1);
        assert!(matches!(
            &outcome.store_errors[0],
            HarnessError::Store { operation: "cleanup", .. }
        ));
    }

    #[test]
    fn test_keep_store_skips_cleanup() {
        let (mut store, closed) = TrackedStore::new(MemoryStore::new());
        store.fail_drop = true;
        let outcome = harness().keep_store(true).run(Some(store)).unwrap();
        assert!(closed.get());
        assert!(outcome.store_errors.is_empty());
    }

    #[test]
    fn test_unwritable_report_path_errors_after_close() {
        let (store, closed) = TrackedStore::new(MemoryStore::new());
        let err = harness()
            .with_report_path("/nonexistent-dir/report.json")
            .run(Some(store))
            .unwrap_err();
        assert!(matches!(err, HarnessError::Serialization(_)));
        assert!(closed.get());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "Broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct PanickingSink;

    impl ProgressSink for PanickingSink {
        fn result_logged(&mut self, _result: &CheckResult) {
            panic!("failed printing to stdout: Broken pipe");
        }
    }

    #[test]
    fn test_panicking_progress_still_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let (store, closed) = TrackedStore::new(MemoryStore::new());

        let outcome = harness()
            .with_report_path(&path)
            .with_progress(Box::new(PanickingSink))
            .run(Some(store))
            .unwrap();

        assert!(path.exists());
        assert!(closed.get());
        assert!(outcome.groups.iter().all(|g| g.aborted.is_none()));
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_console_progress_silenced_on_write_error() {
        let mut console = ConsoleProgress::new(Box::new(BrokenPipe));
        console.group_started("Password Security");
        assert!(console.silenced);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let outcome = harness()
            .with_report_path(&path)
            .with_progress(Box::new(ConsoleProgress::new(Box::new(BrokenPipe))))
            .run(None::<MemoryStore>)
            .unwrap();
        assert!(path.exists());
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_console_progress_format() {
        let buf = Rc::new(RefCell::new(Vec::new()));
        let mut console = ConsoleProgress::new(Box::new(SharedBuf(Rc::clone(&buf))));
        let mut runner = CheckRunner::new();
        console.group_started("Data in Transit");
        console.result_logged(runner.log_result("Transit Encryption - WSS", true, ""));

        let text = String::from_utf8(buf.borrow().clone()).unwrap();
        assert_eq!(text, "\n[TESTING DATA IN TRANSIT]\n✓ Test 1: Transit Encryption - WSS\n");
    }

    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failing_profile_sets_exit_code() {
        let mut profile = Profile::default();
        profile.api_endpoints[0].min_tls = "1.0".to_string();
        let outcome = Harness::new(profile)
            .with_hash_iterations(10)
            .run(None::<MemoryStore>)
            .unwrap();
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.report.critical_findings().count(), 1);
    }
}
