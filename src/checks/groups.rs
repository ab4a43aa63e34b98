// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! The standard check groups.

use std::collections::HashSet;

use crate::crypto::hash::{DEFAULT_ITERATIONS, DEFAULT_SALT};
use crate::crypto::{self_test, CipherError, HashVerifier, PasswordDigest, SymmetricCipherProbe};
use crate::runner::{CheckGroup, CheckRunner, GroupError};
use crate::store::{CredentialStore, SeedUser};

use super::profile::{
    ApiEndpoint, BackupTarget, ComplianceControl, Control, DatabaseField, TransitChannel,
};

/// Field-level algorithms accepted as encryption at rest.
const APPROVED_FIELD_ALGORITHMS: &[&str] = &[
    "AES-128",
    "AES-256",
    "AES-128-GCM",
    "AES-256-GCM",
    "CHACHA20-POLY1305",
];

/// Protocols accepted for data in transit.
const SECURE_TRANSIT_PROTOCOLS: &[&str] = &["WSS", "TLS", "SSL/TLS", "MTLS", "HTTPS"];

/// Minimum TLS version accepted for API endpoints.
const MIN_TLS_VERSION: (u32, u32) = (1, 2);

/// Minimum key sizes for backup encryption.
const MIN_SYMMETRIC_KEY_BITS: u32 = 128;
const MIN_ASYMMETRIC_KEY_BITS: u32 = 2048;

/// Known-answer tests for the primitives the other groups rely on.
pub struct SelfTestGroup;

impl CheckGroup for SelfTestGroup {
    fn name(&self) -> &str {
        "Cryptographic Self-Tests"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        let tests: [(&str, fn() -> Result<(), self_test::SelfTestError>); 3] = [
            ("PBKDF2-SHA256 KAT", self_test::pbkdf2_kat),
            ("AES-256-GCM KAT", self_test::aes_gcm_kat),
            ("RNG health", self_test::rng_health_test),
        ];

        for (label, test) in tests {
            let name = format!("Self-Test - {label}");
            match test() {
                Ok(()) => runner.log_result(name, true, "Known answer matched"),
                Err(e) => runner.log_result(name, false, format!("FAILED: {e}")),
            };
        }
        Ok(())
    }
}

/// Masked label for a password sample: first three characters then `***`.
fn mask(password: &str) -> String {
    let prefix: String = password.chars().take(3).collect();
    format!("'{prefix}***'")
}

/// Digests must differ from the plaintext and must re-verify.
pub struct PasswordHashingGroup {
    samples: Vec<String>,
    iterations: u32,
}

impl PasswordHashingGroup {
    pub fn new(samples: Vec<String>) -> Self {
        Self::with_iterations(samples, DEFAULT_ITERATIONS)
    }

    pub fn with_iterations(samples: Vec<String>, iterations: u32) -> Self {
        Self {
            samples,
            iterations,
        }
    }
}

impl CheckGroup for PasswordHashingGroup {
    fn name(&self) -> &str {
        "Password Hashing"
    }

    fn heading(&self) -> &str {
        "Password Security"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        for pwd in &self.samples {
            let name = format!("Password Hashing - {}", mask(pwd));
            let digest = match HashVerifier::hash(pwd, DEFAULT_SALT, self.iterations) {
                Ok(d) => d,
                Err(e) => {
                    runner.log_result(name, false, format!("FAILED: {e}"));
                    continue;
                }
            };

            if !HashVerifier::verify_not_plaintext(pwd, &digest) {
                runner.log_result(name, false, "FAILED: Plaintext detected");
            } else if !HashVerifier::verify(pwd, &digest) {
                runner.log_result(name, false, "FAILED: Digest does not verify");
            } else {
                runner.log_result(
                    name,
                    true,
                    format!("Using PBKDF2 with SHA256 ({} iterations)", digest.iterations()),
                );
            }
        }
        Ok(())
    }
}

/// Declared field encryption must use an approved algorithm.
pub struct DatabaseEncryptionGroup {
    fields: Vec<DatabaseField>,
}

impl DatabaseEncryptionGroup {
    pub fn new(fields: Vec<DatabaseField>) -> Self {
        Self { fields }
    }
}

impl CheckGroup for DatabaseEncryptionGroup {
    fn name(&self) -> &str {
        "Database Encryption"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        for f in &self.fields {
            let name = format!("Database Encryption - {}", f.field);
            let approved = APPROVED_FIELD_ALGORITHMS
                .iter()
                .any(|a| a.eq_ignore_ascii_case(f.algorithm.trim()));

            if !f.encrypted {
                runner.log_result(name, false, "FAILED: Field stored unencrypted");
            } else if !approved {
                runner.log_result(
                    name,
                    false,
                    format!("FAILED: Unapproved algorithm '{}'", f.algorithm),
                );
            } else {
                runner.log_result(name, true, format!("{} encryption", f.algorithm));
            }
        }
        Ok(())
    }
}

/// Parse `"1.2"` style version strings.
fn parse_tls_version(v: &str) -> Option<(u32, u32)> {
    let (major, minor) = v.trim().split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// Last non-empty path segment of a URL, used as the short result label.
fn endpoint_label(url: &str) -> &str {
    url.rsplit('/').find(|s| !s.is_empty()).unwrap_or(url)
}

/// Endpoints must use `https` and declare at least TLS 1.2.
pub struct ApiTlsGroup {
    endpoints: Vec<ApiEndpoint>,
}

impl ApiTlsGroup {
    pub fn new(endpoints: Vec<ApiEndpoint>) -> Self {
        Self { endpoints }
    }
}

impl CheckGroup for ApiTlsGroup {
    fn name(&self) -> &str {
        "API TLS"
    }

    fn heading(&self) -> &str {
        "API Security"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        for ep in &self.endpoints {
            let name = format!("API TLS - {}", endpoint_label(&ep.url));
            let scheme = ep.url.split_once("://").map(|(s, _)| s);

            match (scheme, parse_tls_version(&ep.min_tls)) {
                (Some(s), _) if !s.eq_ignore_ascii_case("https") => {
                    runner.log_result(name, false, "FAILED: No TLS");
                }
                (None, _) => {
                    runner.log_result(name, false, format!("FAILED: Unparseable URL '{}'", ep.url));
                }
                (_, None) => {
                    runner.log_result(
                        name,
                        false,
                        format!("FAILED: Unknown TLS version '{}'", ep.min_tls),
                    );
                }
                (_, Some(v)) if v < MIN_TLS_VERSION => {
                    runner.log_result(
                        name,
                        false,
                        format!("FAILED: TLS {} below minimum 1.2", ep.min_tls),
                    );
                }
                (_, Some(_)) => {
                    runner.log_result(name, true, format!("TLS {}+ enforced", ep.min_tls));
                }
            }
        }
        Ok(())
    }
}

/// Real AEAD round-trips over sample file payloads.
pub struct FileEncryptionGroup {
    files: Vec<String>,
}

impl FileEncryptionGroup {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    fn round_trip(key: &crate::crypto::SymmetricKey, data: &[u8]) -> Result<(), String> {
        let ciphertext = SymmetricCipherProbe::encrypt(key, data).map_err(|e| e.to_string())?;
        if ciphertext == data {
            return Err("ciphertext equals plaintext".to_string());
        }

        let decrypted = SymmetricCipherProbe::decrypt(key, &ciphertext).map_err(|e| e.to_string())?;
        if decrypted != data {
            return Err("round-trip mismatch".to_string());
        }

        let mut tampered = ciphertext;
        if let Some(last) = tampered.last_mut() {
            *last ^= 0x01;
        }
        match SymmetricCipherProbe::decrypt(key, &tampered) {
            Err(CipherError::AuthenticationFailed) => Ok(()),
            Err(e) => Err(format!("tampering reported as '{e}'")),
            Ok(_) => Err("tampered ciphertext accepted".to_string()),
        }
    }
}

impl CheckGroup for FileEncryptionGroup {
    fn name(&self) -> &str {
        "File Encryption"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        let key = SymmetricCipherProbe::generate_key();
        for filename in &self.files {
            let name = format!("File Encryption - {filename}");
            let data = format!("Sensitive data in {filename}");
            match Self::round_trip(&key, data.as_bytes()) {
                Ok(()) => runner.log_result(name, true, "AES-256-GCM round-trip, tampering rejected"),
                Err(e) => runner.log_result(name, false, format!("FAILED: {e}")),
            };
        }
        Ok(())
    }
}

/// Declared yes/no controls under a common prefix.
pub struct ControlGroup {
    title: &'static str,
    controls: Vec<Control>,
    pass_detail: &'static str,
    fail_detail: &'static str,
}

impl ControlGroup {
    pub fn key_management(controls: Vec<Control>) -> Self {
        Self {
            title: "Key Management",
            controls,
            pass_detail: "Compliant",
            fail_detail: "Non-compliant",
        }
    }

    pub fn session_security(controls: Vec<Control>) -> Self {
        Self {
            title: "Session Security",
            controls,
            pass_detail: "Implemented",
            fail_detail: "Missing",
        }
    }
}

impl CheckGroup for ControlGroup {
    fn name(&self) -> &str {
        self.title
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        for c in &self.controls {
            let detail = if c.satisfied {
                self.pass_detail
            } else {
                self.fail_detail
            };
            runner.log_result(format!("{} - {}", self.title, c.name), c.satisfied, detail);
        }
        Ok(())
    }
}

/// Channels must be enabled and use a secure protocol.
pub struct TransitEncryptionGroup {
    channels: Vec<TransitChannel>,
}

impl TransitEncryptionGroup {
    pub fn new(channels: Vec<TransitChannel>) -> Self {
        Self { channels }
    }
}

impl CheckGroup for TransitEncryptionGroup {
    fn name(&self) -> &str {
        "Transit Encryption"
    }

    fn heading(&self) -> &str {
        "Data in Transit"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        for ch in &self.channels {
            let name = format!("Transit Encryption - {}", ch.scenario);
            let secure = SECURE_TRANSIT_PROTOCOLS
                .iter()
                .any(|p| p.eq_ignore_ascii_case(ch.protocol.trim()));

            if !ch.enabled {
                runner.log_result(name, false, format!("FAILED: {} not enabled", ch.protocol));
            } else if !secure {
                runner.log_result(
                    name,
                    false,
                    format!("FAILED: Insecure protocol '{}'", ch.protocol),
                );
            } else {
                runner.log_result(name, true, format!("Using {}", ch.protocol));
            }
        }
        Ok(())
    }
}

fn is_symmetric_method(method: &str) -> bool {
    let m = method.trim().to_ascii_uppercase();
    m.starts_with("AES") || m.starts_with("CHACHA")
}

/// Backups must be encrypted with a key of adequate size.
pub struct BackupEncryptionGroup {
    backups: Vec<BackupTarget>,
}

impl BackupEncryptionGroup {
    pub fn new(backups: Vec<BackupTarget>) -> Self {
        Self { backups }
    }
}

impl CheckGroup for BackupEncryptionGroup {
    fn name(&self) -> &str {
        "Backup Encryption"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        for b in &self.backups {
            let name = format!("Backup Encryption - {}", b.name);
            let min_bits = if is_symmetric_method(&b.method) {
                MIN_SYMMETRIC_KEY_BITS
            } else {
                MIN_ASYMMETRIC_KEY_BITS
            };

            if !b.encrypted {
                runner.log_result(name, false, "FAILED: Backup stored unencrypted");
            } else if b.key_bits < min_bits {
                runner.log_result(
                    name,
                    false,
                    format!(
                        "FAILED: {}-bit {} key below minimum {}",
                        b.key_bits, b.method, min_bits
                    ),
                );
            } else {
                runner.log_result(
                    name,
                    true,
                    format!("{} encryption with {}-bit key", b.method, b.key_bits),
                );
            }
        }
        Ok(())
    }
}

/// Controls required by compliance standards.
pub struct ComplianceGroup {
    controls: Vec<ComplianceControl>,
}

impl ComplianceGroup {
    pub fn new(controls: Vec<ComplianceControl>) -> Self {
        Self { controls }
    }
}

impl CheckGroup for ComplianceGroup {
    fn name(&self) -> &str {
        "Compliance"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        for c in &self.controls {
            runner.log_result(
                format!("Compliance ({}) - {}", c.standard, c.control),
                c.satisfied,
                if c.satisfied { "Verified" } else { "Not satisfied" },
            );
        }
        Ok(())
    }
}

/// Seeded credentials must be stored once, hashed, and verifiable.
///
/// A store failure is unexpected here and aborts the group.
pub struct CredentialStorageGroup<'s> {
    store: &'s dyn CredentialStore,
    seeds: Vec<SeedUser>,
}

impl<'s> CredentialStorageGroup<'s> {
    pub fn new(store: &'s dyn CredentialStore, seeds: Vec<SeedUser>) -> Self {
        Self { store, seeds }
    }
}

impl CheckGroup for CredentialStorageGroup<'_> {
    fn name(&self) -> &str {
        "Credential Storage"
    }

    fn run(&self, runner: &mut CheckRunner) -> Result<(), GroupError> {
        let rows = self.store.list_all()?;

        // First seed per username is authoritative.
        let mut seen = HashSet::new();
        for seed in self.seeds.iter().filter(|s| seen.insert(s.username.as_str())) {
            let name = format!("Credential Storage - {}", seed.username);
            let matching: Vec<_> = rows.iter().filter(|r| r.username == seed.username).collect();

            let row = match matching.as_slice() {
                [] => {
                    runner.log_result(name, false, "FAILED: Credential missing");
                    continue;
                }
                [row] => row,
                many => {
                    runner.log_result(
                        name,
                        false,
                        format!("FAILED: {} rows for one username", many.len()),
                    );
                    continue;
                }
            };

            if row.password_digest == seed.password {
                runner.log_result(name, false, "FAILED: Plaintext detected");
                continue;
            }
            match row.password_digest.parse::<PasswordDigest>() {
                Ok(d) if HashVerifier::verify(&seed.password, &d) => {
                    runner.log_result(name, true, format!("{} digest verified", d.algorithm()));
                }
                Ok(_) => {
                    runner.log_result(name, false, "FAILED: Digest does not verify");
                }
                Err(e) => {
                    runner.log_result(name, false, format!("FAILED: {e}"));
                }
            }
        }
        Ok(())
    }
}
