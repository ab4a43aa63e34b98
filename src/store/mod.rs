// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Credential store contract.
//!
//! A single relation keyed by unique username holding an opaque digest
//! string. Upserts are idempotent: on a duplicate username the insert is
//! ignored and the first digest is retained.

mod backend;
mod memory;
mod sqlite;

pub use backend::StoreBackend;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::crypto::{HashError, HashVerifier};

/// Store errors. None of these are retried by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store schema missing: call ensure_schema first")]
    SchemaMissing,

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Could not derive digest for '{username}': {source}")]
    Digest {
        username: String,
        #[source]
        source: HashError,
    },
}

impl StoreError {
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// One stored credential row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password_digest: String,
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    ConflictIgnored,
}

/// Plaintext seed entry (username, password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
}

impl SeedUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Operations the harness consumes from a credential store.
pub trait CredentialStore {
    /// Create the relation if absent. Idempotent.
    fn ensure_schema(&mut self) -> Result<(), StoreError>;

    /// Insert unless the username already exists.
    fn upsert(&mut self, username: &str, digest: &str) -> Result<UpsertOutcome, StoreError>;

    /// All rows in insertion order.
    fn list_all(&self) -> Result<Vec<Credential>, StoreError>;

    fn lookup(&self, username: &str) -> Result<Option<Credential>, StoreError>;

    /// Remove the relation and all of its rows.
    fn drop_all(&mut self) -> Result<(), StoreError>;

    /// Release the underlying connection.
    fn close(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

/// Hash each seed password and upsert it. Stops at the first store error.
pub fn seed_credentials<S: CredentialStore + ?Sized>(
    store: &mut S,
    users: &[SeedUser],
    salt: &[u8],
    iterations: u32,
) -> Result<usize, StoreError> {
    let mut inserted = 0;
    for user in users {
        let digest = HashVerifier::hash(&user.password, salt, iterations).map_err(|source| {
            StoreError::Digest {
                username: user.username.clone(),
                source,
            }
        })?;

        match store.upsert(&user.username, &digest.encode())? {
            UpsertOutcome::Inserted => inserted += 1,
            UpsertOutcome::ConflictIgnored => {
                debug!(username = %user.username, "seed ignored, username already present");
            }
        }
    }
    info!(inserted, requested = users.len(), "credential store seeded");
    Ok(inserted)
}
