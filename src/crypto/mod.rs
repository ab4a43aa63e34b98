// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic primitives exercised by the check battery:
//! - Salted password digests (PBKDF2-HMAC-SHA256)
//! - AEAD round-trip checker (AES-256-GCM)
//! - Known-answer self-tests

pub mod cipher;
pub mod hash;
pub mod self_test;

pub use cipher::{CipherError, SymmetricCipherProbe, SymmetricKey};
pub use hash::{HashError, HashVerifier, PasswordDigest};
