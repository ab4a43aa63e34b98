// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommands for the verification harness.
//!
//! ## Usage
//!
//! ```bash
//! gg-verify                    # Run the full check battery (default)
//! gg-verify config show        # Print effective configuration
//! gg-verify profile defaults   # Print the built-in profile as TOML
//! ```

pub mod config_cmd;
pub mod profile_cmd;
pub mod run_cmd;

pub use run_cmd::run;

/// Every check passed.
pub const EXIT_OK: u8 = 0;
/// At least one check failed, or no checks ran.
pub const EXIT_CHECKS_FAILED: u8 = 1;
/// Configuration or profile could not be loaded.
pub const EXIT_CONFIG: u8 = 2;
/// The report could not be written.
pub const EXIT_SERIALIZATION: u8 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinct() {
        let codes = [EXIT_OK, EXIT_CHECKS_FAILED, EXIT_CONFIG, EXIT_SERIALIZATION];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
