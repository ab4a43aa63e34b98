//! GG-VERIFY: security-control verification harness.
//!
//! Runs a fixed battery of checks against a declared deployment profile,
//! records one pass/fail result per assertion, and emits a human-readable
//! report plus a JSON summary.
//!
//! # Layout
//!
//! - [`crypto`]: PBKDF2 password hashing, AES-256-GCM probing, known-answer self-tests
//! - [`store`]: credential store contract with in-memory and SQLite backends
//! - [`runner`]: ordered result log and check-group isolation
//! - [`checks`]: the standard battery and its TOML profile
//! - [`report`]: summary, text rendering and JSON report file
//! - [`harness`]: one end-to-end run

pub mod checks;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod harness;
pub mod report;
pub mod runner;
pub mod store;
pub mod telemetry;

pub use checks::{standard_battery, Profile};
pub use error::HarnessError;
pub use harness::{Harness, RunOutcome};
pub use report::{Report, Summary};
pub use runner::{CheckGroup, CheckResult, CheckRunner, CompletedRun};
pub use store::{CredentialStore, MemoryStore, SqliteStore};
