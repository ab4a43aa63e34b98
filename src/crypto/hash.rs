// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Salted password digests (PBKDF2-HMAC-SHA256).
//!
//! Digests are deterministic for a fixed (password, salt, iterations) triple
//! and carry their own parameters so a stored digest can be re-verified.

use std::fmt;
use std::str::FromStr;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;

/// Algorithm identifier recorded with every digest.
pub const ALGORITHM_ID: &str = "pbkdf2-sha256";
/// Digest output length in bytes.
pub const DIGEST_LEN: usize = 32;
/// Iteration count used by the harness.
pub const DEFAULT_ITERATIONS: u32 = 100_000;
/// Upper bound on iterations, keeps a single hash bounded in time.
pub const MAX_ITERATIONS: u32 = 1_000_000;
/// Upper bound on salt length.
pub const MAX_SALT_LEN: usize = 64;
/// Salt used for seeded credentials and the hashing checks.
pub const DEFAULT_SALT: &[u8] = b"salt_example";

/// Errors produced by the hash verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("Invalid hash parameters: {0}")]
    InvalidParameters(String),

    #[error("Malformed digest encoding: {0}")]
    MalformedEncoding(String),
}

/// A derived password digest together with its derivation parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: Vec<u8>,
    iterations: u32,
    bytes: [u8; DIGEST_LEN],
}

impl PasswordDigest {
    pub fn algorithm(&self) -> &'static str {
        ALGORITHM_ID
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex encoding of the raw digest bytes only.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Self-describing encoding stored in the credential relation:
    /// `pbkdf2-sha256$<iterations>$<salt hex>$<digest hex>`.
    pub fn encode(&self) -> String {
        format!(
            "{}${}${}${}",
            ALGORITHM_ID,
            self.iterations,
            hex::encode(&self.salt),
            self.to_hex()
        )
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("algorithm", &ALGORITHM_ID)
            .field("iterations", &self.iterations)
            .field("salt", &hex::encode(&self.salt))
            .field("digest", &self.to_hex())
            .finish()
    }
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for PasswordDigest {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('$').collect();
        if parts.len() != 4 {
            return Err(HashError::MalformedEncoding(format!(
                "expected 4 fields, found {}",
                parts.len()
            )));
        }
        if parts[0] != ALGORITHM_ID {
            return Err(HashError::MalformedEncoding(format!(
                "unsupported algorithm '{}'",
                parts[0]
            )));
        }

        let iterations = parts[1]
            .parse::<u32>()
            .map_err(|e| HashError::MalformedEncoding(format!("iterations: {e}")))?;
        let salt = hex::decode(parts[2])
            .map_err(|e| HashError::MalformedEncoding(format!("salt: {e}")))?;
        let raw = hex::decode(parts[3])
            .map_err(|e| HashError::MalformedEncoding(format!("digest: {e}")))?;
        validate_parameters(&salt, iterations)?;

        let bytes: [u8; DIGEST_LEN] = raw.as_slice().try_into().map_err(|_| {
            HashError::MalformedEncoding(format!(
                "digest must be {} bytes, found {}",
                DIGEST_LEN,
                raw.len()
            ))
        })?;

        Ok(Self {
            salt,
            iterations,
            bytes,
        })
    }
}

fn validate_parameters(salt: &[u8], iterations: u32) -> Result<(), HashError> {
    if iterations == 0 || iterations > MAX_ITERATIONS {
        return Err(HashError::InvalidParameters(format!(
            "iterations must be in 1..={}, got {}",
            MAX_ITERATIONS, iterations
        )));
    }
    if salt.len() > MAX_SALT_LEN {
        return Err(HashError::InvalidParameters(format!(
            "salt must be at most {} bytes, got {}",
            MAX_SALT_LEN,
            salt.len()
        )));
    }
    Ok(())
}

/// Stateless password hashing and verification.
pub struct HashVerifier;

impl HashVerifier {
    /// Derive a digest. Empty passwords are accepted like any other string.
    pub fn hash(password: &str, salt: &[u8], iterations: u32) -> Result<PasswordDigest, HashError> {
        validate_parameters(salt, iterations)?;

        let mut bytes = [0u8; DIGEST_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut bytes);

        Ok(PasswordDigest {
            salt: salt.to_vec(),
            iterations,
            bytes,
        })
    }

    /// True iff the digest bytes differ from the raw UTF-8 password bytes.
    pub fn verify_not_plaintext(password: &str, digest: &PasswordDigest) -> bool {
        digest.as_bytes() != password.as_bytes()
    }

    /// Recompute the digest with its own parameters and compare.
    pub fn verify(password: &str, digest: &PasswordDigest) -> bool {
        match Self::hash(password, digest.salt(), digest.iterations()) {
            Ok(candidate) => constant_time_eq(candidate.as_bytes(), digest.as_bytes()),
            Err(_) => false,
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
