// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Symmetric cipher round-trip checks (AES-256-GCM).
//!
//! Ciphertext layout: `nonce (12) || ciphertext || tag (16)`.
//! A fresh random nonce is drawn for every encryption.

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use thiserror::Error;

/// Encryption key size (256 bits)
pub const KEY_SIZE: usize = 32;
/// Nonce size (96 bits for GCM)
pub const NONCE_SIZE: usize = 12;
/// Tag size (128 bits)
pub const TAG_SIZE: usize = 16;
/// Largest plaintext accepted for encryption.
pub const MAX_PLAINTEXT_LEN: usize = 1024 * 1024;

/// Cipher errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Wrong key, or ciphertext/nonce/tag was modified.
    #[error("Authentication failed: ciphertext rejected")]
    AuthenticationFailed,

    /// Input cannot be a ciphertext produced by this cipher.
    #[error("Malformed ciphertext: {0}")]
    Malformed(String),

    #[error("Plaintext too large: {len} bytes exceeds limit of {limit}")]
    PlaintextTooLarge { len: usize, limit: usize },

    #[error("Encryption failed")]
    EncryptionFailed,
}

impl CipherError {
    /// True for the integrity-failure kind.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}

/// 256-bit symmetric key.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Stateless AEAD round-trip checker.
pub struct SymmetricCipherProbe;

impl SymmetricCipherProbe {
    /// Generate a fresh key from the OS RNG.
    pub fn generate_key() -> SymmetricKey {
        let mut key = [0u8; KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut key);
        SymmetricKey(key)
    }

    pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if plaintext.len() > MAX_PLAINTEXT_LEN {
            return Err(CipherError::PlaintextTooLarge {
                len: plaintext.len(),
                limit: MAX_PLAINTEXT_LEN,
            });
        }

        let mut nonce = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let cipher = Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(&key.0));
        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    pub fn decrypt(key: &SymmetricKey, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::Malformed(format!(
                "need at least {} bytes, got {}",
                NONCE_SIZE + TAG_SIZE,
                ciphertext.len()
            )));
        }

        let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);
        let cipher = Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(&key.0));
        cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CipherError::AuthenticationFailed)
    }
}
