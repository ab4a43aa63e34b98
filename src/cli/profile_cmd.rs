// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Profile CLI subcommands: defaults, check.

use std::path::Path;

use crate::checks::Profile;

use super::{EXIT_CONFIG, EXIT_OK};

/// Print the built-in profile as TOML, ready to be edited and passed back
/// through `GG_VERIFY_PROFILE`.
pub fn run_defaults() -> u8 {
    match Profile::default().to_toml() {
        Ok(text) => {
            print!("{text}");
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG
        }
    }
}

/// Parse a profile file and print how many facts it declares.
pub fn run_check(path: &Path) -> u8 {
    match Profile::load(path) {
        Ok(profile) => {
            println!("{}: {}", path.display(), describe(&profile));
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG
        }
    }
}

fn describe(profile: &Profile) -> String {
    format!(
        "{} password samples, {} database fields, {} endpoints, {} files, \
         {} key controls, {} transit channels, {} backups, {} session controls, \
         {} compliance controls, {} seed users",
        profile.password_samples.len(),
        profile.database_fields.len(),
        profile.api_endpoints.len(),
        profile.file_samples.len(),
        profile.key_management.len(),
        profile.transit.len(),
        profile.backups.len(),
        profile.session.len(),
        profile.compliance.len(),
        profile.seed_users.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_describe_default_profile() {
        let text = describe(&Profile::default());
        assert!(text.starts_with("3 password samples, 4 database fields"));
        assert!(text.ends_with("2 seed users"));
    }

    #[test]
    fn test_check_round_trips_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(Profile::default().to_toml().unwrap().as_bytes())
            .unwrap();
        assert_eq!(run_check(file.path()), EXIT_OK);
    }

    #[test]
    fn test_check_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"password_samples = 7").unwrap();
        assert_eq!(run_check(file.path()), EXIT_CONFIG);
    }
}
