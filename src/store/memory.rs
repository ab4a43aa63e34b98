// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-process credential store.

use super::{Credential, CredentialStore, StoreError, UpsertOutcome};

/// Credential store held entirely in memory.
///
/// `rows` is `None` until `ensure_schema` runs, mirroring a database where
/// the relation has not been created yet.
#[derive(Debug)]
pub struct MemoryStore {
    rows: Option<Vec<Credential>>,
    reachable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: None,
            reachable: true,
        }
    }

    /// A store whose every operation fails with a connection error.
    pub fn unreachable() -> Self {
        Self {
            rows: None,
            reachable: false,
        }
    }

    fn connected(&self) -> Result<(), StoreError> {
        if self.reachable {
            Ok(())
        } else {
            Err(StoreError::Connection("memory store is unreachable".to_string()))
        }
    }

    fn rows(&self) -> Result<&Vec<Credential>, StoreError> {
        self.connected()?;
        self.rows.as_ref().ok_or(StoreError::SchemaMissing)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryStore {
    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        self.connected()?;
        self.rows.get_or_insert_with(Vec::new);
        Ok(())
    }

    fn upsert(&mut self, username: &str, digest: &str) -> Result<UpsertOutcome, StoreError> {
        self.connected()?;
        let rows = self.rows.as_mut().ok_or(StoreError::SchemaMissing)?;

        if rows.iter().any(|c| c.username == username) {
            return Ok(UpsertOutcome::ConflictIgnored);
        }
        rows.push(Credential {
            username: username.to_string(),
            password_digest: digest.to_string(),
        });
        Ok(UpsertOutcome::Inserted)
    }

    fn list_all(&self) -> Result<Vec<Credential>, StoreError> {
        Ok(self.rows()?.clone())
    }

    fn lookup(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.rows()?.iter().find(|c| c.username == username).cloned())
    }

    fn drop_all(&mut self) -> Result<(), StoreError> {
        self.connected()?;
        self.rows = None;
        Ok(())
    }

    fn close(self) -> Result<(), StoreError> {
        Ok(())
    }
}
