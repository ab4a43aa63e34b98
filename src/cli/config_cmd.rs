// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, validate.
//!
//! These commands read configuration directly from environment variables.

use tracing_subscriber::EnvFilter;

use crate::checks::Profile;
use crate::config::{self, EnvConfig, StoreTarget};

use super::{EXIT_CONFIG, EXIT_OK};

/// Print effective config as key-value pairs to stdout.
pub fn run_show() {
    for line in config::load().effective_lines() {
        println!("{line}");
    }
}

/// Validate configuration for obvious misconfigurations.
///
/// Returns 0 if valid, 2 if any problem is found.
pub fn run_validate() -> u8 {
    let problems = validate(&config::load());
    if problems.is_empty() {
        println!("Configuration is valid.");
        EXIT_OK
    } else {
        for p in &problems {
            eprintln!("WARNING: {p}");
        }
        EXIT_CONFIG
    }
}

fn validate(cfg: &EnvConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if let Err(e) = EnvFilter::try_new(&cfg.log.level) {
        problems.push(format!("GG_VERIFY_LOG_LEVEL '{}' is invalid: {e}", cfg.log.level));
    }

    if let Some(path) = &cfg.profile_path {
        if let Err(e) = Profile::load(path) {
            problems.push(format!("GG_VERIFY_PROFILE: {e}"));
        }
    }

    if let Some(dir) = cfg.report_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            problems.push(format!(
                "GG_VERIFY_REPORT_PATH directory {} does not exist",
                dir.display()
            ));
        }
    }

    if let Some(dir) = cfg.log.output_path.as_ref().and_then(|p| p.parent()) {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            problems.push(format!(
                "GG_VERIFY_LOG_FILE directory {} does not exist",
                dir.display()
            ));
        }
    }

    if let StoreTarget::SqliteFile(path) = &cfg.store {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.is_dir() {
                problems.push(format!(
                    "GG_VERIFY_STORE directory {} does not exist",
                    dir.display()
                ));
            }
        }
    }

    problems
}
