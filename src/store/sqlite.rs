// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! SQLite-backed credential store.

use std::path::Path;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::info;

use super::{Credential, CredentialStore, StoreError, UpsertOutcome};

/// Credential store backed by a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Connection(format!("failed to open database: {e}")))?;
        info!(path = %path.display(), "credential store opened");
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Connection(format!("failed to open database: {e}")))?;
        Ok(Self { conn })
    }
}

/// Classify a rusqlite error. An unusable database or a busy, locked or
/// failing file is a connection fault; a missing relation is
/// `SchemaMissing`; everything else is a query failure.
fn query_error(context: &str, e: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &e {
        if matches!(
            failure.code,
            ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::SystemIoFailure
        ) {
            return StoreError::Connection(format!("{context}: {e}"));
        }
    }

    let msg = e.to_string();
    if msg.contains("no such table") {
        StoreError::SchemaMissing
    } else {
        StoreError::Query(format!("{context}: {msg}"))
    }
}

fn row_to_credential(row: &rusqlite::Row<'_>) -> rusqlite::Result<Credential> {
    Ok(Credential {
        username: row.get(0)?,
        password_digest: row.get(1)?,
    })
}

impl CredentialStore for SqliteStore {
    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS test_users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL
                );",
            )
            .map_err(|e| query_error("failed to create schema", e))
    }

    fn upsert(&mut self, username: &str, digest: &str) -> Result<UpsertOutcome, StoreError> {
        let changed = self
            .conn
            .execute(
                "INSERT INTO test_users (username, password_hash) VALUES (?1, ?2)
                 ON CONFLICT(username) DO NOTHING",
                params![username, digest],
            )
            .map_err(|e| query_error("failed to insert credential", e))?;

        Ok(if changed == 0 {
            UpsertOutcome::ConflictIgnored
        } else {
            UpsertOutcome::Inserted
        })
    }

    fn list_all(&self) -> Result<Vec<Credential>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT username, password_hash FROM test_users ORDER BY id ASC")
            .map_err(|e| query_error("failed to prepare query", e))?;

        let rows = stmt
            .query_map([], row_to_credential)
            .map_err(|e| query_error("failed to query credentials", e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| query_error("failed to read credential", e))
    }

    fn lookup(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        self.conn
            .query_row(
                "SELECT username, password_hash FROM test_users WHERE username = ?1",
                params![username],
                row_to_credential,
            )
            .optional()
            .map_err(|e| query_error("failed to look up credential", e))
    }

    fn drop_all(&mut self) -> Result<(), StoreError> {
        self.conn
            .execute_batch("DROP TABLE IF EXISTS test_users;")
            .map_err(|e| query_error("failed to drop schema", e))
    }

    fn close(self) -> Result<(), StoreError> {
        self.conn
            .close()
            .map_err(|(_, e)| StoreError::Connection(format!("failed to close database: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_upsert_and_list() {
        let mut store = store();
        store.upsert("testuser1", "d1").unwrap();
        store.upsert("testuser2", "d2").unwrap();

        let rows = store.list_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].username, "testuser1");
        assert_eq!(rows[1].password_digest, "d2");
    }

    #[test]
    fn test_conflict_ignored() {
        let mut store = store();
        assert_eq!(store.upsert("alice", "d1").unwrap(), UpsertOutcome::Inserted);
        assert_eq!(
            store.upsert("alice", "d2").unwrap(),
            UpsertOutcome::ConflictIgnored
        );
        assert_eq!(store.list_all().unwrap().len(), 1);
        assert_eq!(store.lookup("alice").unwrap().unwrap().password_digest, "d1");
    }

    #[test]
    fn test_lookup_missing() {
        let store = store();
        assert_eq!(store.lookup("nobody").unwrap(), None);
    }

    #[test]
    fn test_schema_missing_after_drop() {
        let mut store = store();
        store.drop_all().unwrap();
        assert_eq!(store.list_all(), Err(StoreError::SchemaMissing));
        assert_eq!(store.upsert("a", "b"), Err(StoreError::SchemaMissing));
        // idempotent
        store.drop_all().unwrap();
    }

    #[test]
    fn test_junk_file_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.db");
        std::fs::write(&path, b"not a database, just bytes. ".repeat(150)).unwrap();

        let mut store = SqliteStore::open(&path).unwrap();
        let err = store.ensure_schema().unwrap_err();
        assert!(err.is_connection_error(), "unexpected: {err:?}");
    }

    #[test]
    fn test_close() {
        let store = store();
        assert!(store.close().is_ok());
    }
}
