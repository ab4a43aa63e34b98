// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Store selection for the command-line harness.

use crate::config::StoreTarget;

use super::{Credential, CredentialStore, MemoryStore, SqliteStore, StoreError, UpsertOutcome};

/// A concrete store chosen at runtime.
pub enum StoreBackend {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl StoreBackend {
    /// Open the configured store. `Ok(None)` when the store is disabled.
    pub fn open(target: &StoreTarget) -> Result<Option<Self>, StoreError> {
        Ok(match target {
            StoreTarget::Disabled => None,
            StoreTarget::Memory => Some(Self::Memory(MemoryStore::new())),
            StoreTarget::SqliteMemory => Some(Self::Sqlite(SqliteStore::open_in_memory()?)),
            StoreTarget::SqliteFile(path) => Some(Self::Sqlite(SqliteStore::open(path)?)),
        })
    }
}

impl CredentialStore for StoreBackend {
    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        match self {
            Self::Memory(s) => s.ensure_schema(),
            Self::Sqlite(s) => s.ensure_schema(),
        }
    }

    fn upsert(&mut self, username: &str, digest: &str) -> Result<UpsertOutcome, StoreError> {
        match self {
            Self::Memory(s) => s.upsert(username, digest),
            Self::Sqlite(s) => s.upsert(username, digest),
        }
    }

    fn list_all(&self) -> Result<Vec<Credential>, StoreError> {
        match self {
            Self::Memory(s) => s.list_all(),
            Self::Sqlite(s) => s.list_all(),
        }
    }

    fn lookup(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        match self {
            Self::Memory(s) => s.lookup(username),
            Self::Sqlite(s) => s.lookup(username),
        }
    }

    fn drop_all(&mut self) -> Result<(), StoreError> {
        match self {
            Self::Memory(s) => s.drop_all(),
            Self::Sqlite(s) => s.drop_all(),
        }
    }

    fn close(self) -> Result<(), StoreError> {
        match self {
            Self::Memory(s) => s.close(),
            Self::Sqlite(s) => s.close(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_disabled() {
        assert!(StoreBackend::open(&StoreTarget::Disabled).unwrap().is_none());
    }

    #[test]
    fn test_open_sqlite_memory() {
        let mut store = StoreBackend::open(&StoreTarget::SqliteMemory).unwrap().unwrap();
        store.ensure_schema().unwrap();
        store.upsert("a", "d").unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
        store.close().unwrap();
    }

    #[test]
    fn test_open_unwritable_path_is_connection_error() {
        let target = StoreTarget::SqliteFile("/nonexistent-dir/creds.db".into());
        let err = StoreBackend::open(&target).err().unwrap();
        assert!(err.is_connection_error());
    }
}
