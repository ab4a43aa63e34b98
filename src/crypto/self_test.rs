// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic self-tests.
//!
//! Known Answer Tests (KAT) for PBKDF2-HMAC-SHA256 and AES-256-GCM, plus a
//! stuck-output test for the OS RNG. These run before the check battery so
//! that a broken primitive is reported instead of silently skewing every
//! downstream check.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use thiserror::Error;

use super::hash::HashVerifier;

/// Self-test error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelfTestError {
    #[error("AES-GCM encryption KAT failed")]
    AesGcmEncryptFailed,

    #[error("AES-GCM decryption KAT failed")]
    AesGcmDecryptFailed,

    #[error("PBKDF2-SHA256 KAT failed")]
    Pbkdf2Failed,

    #[error("RNG health test failed")]
    RngHealthFailed,

    #[error("KAT output mismatch: expected {expected}, got {actual}")]
    KatMismatch { expected: String, actual: String },
}

/// PBKDF2-HMAC-SHA256 Known Answer Test
///
/// password "passwd", salt "salt", 1 iteration (RFC 7914 §11, first 32 bytes).
pub fn pbkdf2_kat() -> Result<(), SelfTestError> {
    let expected: [u8; 32] = [
        0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44, 0xb6,
        0x05, 0xf9, 0x41, 0x85, 0x21, 0x6d, 0xde, 0x04, 0x65, 0xe6, 0x8b, 0x9d, 0x57, 0xc2, 0x0d,
        0xac, 0xbc,
    ];

    let digest = HashVerifier::hash("passwd", b"salt", 1).map_err(|_| SelfTestError::Pbkdf2Failed)?;

    if digest.as_bytes() != expected {
        return Err(SelfTestError::KatMismatch {
            expected: hex::encode(expected),
            actual: digest.to_hex(),
        });
    }

    Ok(())
}

/// AES-256-GCM Known Answer Test
///
/// GCM specification test case 14: all-zero key, nonce and 16-byte plaintext.
pub fn aes_gcm_kat() -> Result<(), SelfTestError> {
    let key = [0u8; 32];
    let nonce = [0u8; 12];
    let plaintext = [0u8; 16];
    let expected: [u8; 32] = [
        // ciphertext
        0xce, 0xa7, 0x40, 0x3d, 0x4d, 0x60, 0x6b, 0x6e, 0x07, 0x4e, 0xc5, 0xd3, 0xba, 0xf3, 0x9d,
        0x18, // tag
        0xd0, 0xd1, 0xc8, 0xa7, 0x99, 0x99, 0x6b, 0xf0, 0x26, 0x5b, 0x98, 0xb5, 0xd4, 0x8a, 0xb9,
        0x19,
    ];

    let cipher = Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(&key));
    let nonce = Nonce::from_slice(&nonce);

    let sealed = cipher
        .encrypt(nonce, plaintext.as_slice())
        .map_err(|_| SelfTestError::AesGcmEncryptFailed)?;
    if sealed != expected {
        return Err(SelfTestError::KatMismatch {
            expected: hex::encode(expected),
            actual: hex::encode(&sealed),
        });
    }

    let opened = cipher
        .decrypt(nonce, expected.as_slice())
        .map_err(|_| SelfTestError::AesGcmDecryptFailed)?;
    if opened != plaintext {
        return Err(SelfTestError::AesGcmDecryptFailed);
    }

    Ok(())
}

/// RNG Health Test
///
/// Successive 256-bit draws must never repeat and must differ in roughly
/// half their bits on average.
pub fn rng_health_test() -> Result<(), SelfTestError> {
    use rand::RngCore;

    let mut prev = [0u8; 32];
    let mut curr = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut prev);

    let mut total_diff_bits = 0u32;
    for _ in 0..10 {
        rand::rngs::OsRng.fill_bytes(&mut curr);
        if curr == prev {
            return Err(SelfTestError::RngHealthFailed);
        }
        total_diff_bits += count_differing_bits(&prev, &curr);
        prev.copy_from_slice(&curr);
    }

    // ~128 expected per sample
    if total_diff_bits / 10 < 64 {
        return Err(SelfTestError::RngHealthFailed);
    }

    Ok(())
}

fn count_differing_bits(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pbkdf2_kat() {
        assert!(pbkdf2_kat().is_ok());
    }

    #[test]
    fn test_aes_gcm_kat() {
        assert!(aes_gcm_kat().is_ok());
    }

    #[test]
    fn test_rng_health() {
        assert!(rng_health_test().is_ok());
    }

    #[test]
    fn test_count_differing_bits() {
        let a = [0x00u8; 32];
        let b = [0xFFu8; 32];
        assert_eq!(count_differing_bits(&a, &b), 256);
        assert_eq!(count_differing_bits(&a, &a), 0);
    }

    #[test]
    fn test_self_test_error_display() {
        assert!(SelfTestError::AesGcmEncryptFailed.to_string().contains("AES-GCM"));
        assert!(SelfTestError::Pbkdf2Failed.to_string().contains("PBKDF2"));
        assert!(SelfTestError::RngHealthFailed.to_string().contains("RNG"));
    }
}
