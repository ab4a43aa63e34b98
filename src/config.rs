// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Harness configuration loading from environment variables.
//!
//! All values are read from `GG_VERIFY_*` environment variables with
//! sensible defaults. Invalid values fall back to defaults without crashing.
//! Cryptographic work factors are deliberately not configurable here.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `GG_VERIFY_REPORT_PATH` | `encryption_test_report.json` | JSON report destination |
//! | `GG_VERIFY_PROFILE` | unset | TOML profile of declared facts |
//! | `GG_VERIFY_STORE` | `memory` | `memory`, `sqlite::memory:`, `none`, or a SQLite file path |
//! | `GG_VERIFY_KEEP_STORE` | `false` | Skip dropping seeded credentials after the run |
//! | `GG_VERIFY_LOG_FORMAT` | `pretty` | `pretty` or `json` |
//! | `GG_VERIFY_LOG_LEVEL` | `warn` | `tracing` filter directive |
//! | `GG_VERIFY_LOG_FILE` | unset | Write logs to this file instead of stderr |

use std::path::PathBuf;

use crate::telemetry::{LogConfig, LogFormat};

pub const DEFAULT_REPORT_PATH: &str = "encryption_test_report.json";

/// Which credential store backs the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// No store. Seeding, cleanup and the credential group are skipped.
    Disabled,
    Memory,
    SqliteMemory,
    SqliteFile(PathBuf),
}

impl StoreTarget {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "memory" => Self::Memory,
            "none" | "off" => Self::Disabled,
            "sqlite::memory:" | ":memory:" => Self::SqliteMemory,
            path => Self::SqliteFile(PathBuf::from(path.strip_prefix("sqlite:").unwrap_or(path))),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Disabled => "none".to_string(),
            Self::Memory => "memory".to_string(),
            Self::SqliteMemory => "sqlite::memory:".to_string(),
            Self::SqliteFile(p) => p.display().to_string(),
        }
    }
}

/// All harness configuration.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub report_path: PathBuf,
    pub profile_path: Option<PathBuf>,
    pub store: StoreTarget,
    pub keep_store: bool,
    pub log: LogConfig,
}

fn parse_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load all configuration from environment variables.
pub fn load() -> EnvConfig {
    let report_path = non_empty_var("GG_VERIFY_REPORT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));
    let profile_path = non_empty_var("GG_VERIFY_PROFILE").map(PathBuf::from);
    let store = non_empty_var("GG_VERIFY_STORE")
        .map(|v| StoreTarget::parse(&v))
        .unwrap_or(StoreTarget::Memory);

    let format = non_empty_var("GG_VERIFY_LOG_FORMAT")
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or_default();
    let level = non_empty_var("GG_VERIFY_LOG_LEVEL").unwrap_or_else(|| "warn".to_string());

    EnvConfig {
        report_path,
        profile_path,
        store,
        keep_store: parse_bool("GG_VERIFY_KEEP_STORE", false),
        log: LogConfig {
            format,
            level,
            output_path: non_empty_var("GG_VERIFY_LOG_FILE").map(PathBuf::from),
        },
    }
}

impl EnvConfig {
    /// Effective values as `KEY=value` lines.
    pub fn effective_lines(&self) -> Vec<String> {
        vec![
            format!("GG_VERIFY_REPORT_PATH={}", self.report_path.display()),
            format!(
                "GG_VERIFY_PROFILE={}",
                self.profile_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<built-in>".to_string())
            ),
            format!("GG_VERIFY_STORE={}", self.store.describe()),
            format!("GG_VERIFY_KEEP_STORE={}", self.keep_store),
            format!("GG_VERIFY_LOG_FORMAT={}", self.log.format.as_str()),
            format!("GG_VERIFY_LOG_LEVEL={}", self.log.level),
            format!(
                "GG_VERIFY_LOG_FILE={}",
                self.log
                    .output_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<stderr>".to_string())
            ),
        ]
    }
}
