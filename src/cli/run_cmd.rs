// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! The `run` command: execute the battery and print the report.

use tracing::error;

use crate::checks::Profile;
use crate::config::EnvConfig;
use crate::error::HarnessError;
use crate::harness::{ConsoleProgress, Harness};
use crate::store::StoreBackend;

use super::{EXIT_CONFIG, EXIT_SERIALIZATION};

const BANNER: &str = "Starting CampusWatch Encryption Test Suite...";

/// Run the full battery with the given configuration. Returns the exit code.
pub fn run(cfg: &EnvConfig) -> u8 {
    let profile = match &cfg.profile_path {
        Some(path) => match Profile::load(path) {
            Ok(p) => p,
            Err(e) => {
                let err = HarnessError::from(e);
                error!(error = %err, "profile rejected");
                eprintln!("Error: {err}");
                return EXIT_CONFIG;
            }
        },
        None => Profile::default(),
    };

    // An unopenable store is a store fault, not a configuration fault.
    let store = match StoreBackend::open(&cfg.store) {
        Ok(store) => store,
        Err(e) => {
            let err = HarnessError::store("connect", e);
            error!(error = %err, "running without a credential store");
            eprintln!("Warning: {err}");
            None
        }
    };

    println!("{BANNER}");
    println!("{}", "=".repeat(60));

    let outcome = Harness::new(profile)
        .with_report_path(&cfg.report_path)
        .keep_store(cfg.keep_store)
        .with_progress(Box::new(ConsoleProgress::default()))
        .run(store);

    match outcome {
        Ok(outcome) => {
            println!(
                "\n{}",
                outcome.report.render_console(outcome.report_path.as_deref())
            );
            for err in &outcome.store_errors {
                eprintln!("Warning: {err}");
            }
            outcome.exit_code()
        }
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("Error: {e}");
            match e {
                HarnessError::Serialization(_) => EXIT_SERIALIZATION,
                _ => EXIT_CONFIG,
            }
        }
    }
}
