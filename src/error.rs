// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Harness error types.
//!
//! Check failures are data, not errors: they end up as failing results.
//! Only store faults, configuration faults and report serialization faults
//! are represented here.

use thiserror::Error;

use crate::checks::ProfileError;
use crate::store::StoreError;

/// Errors surfaced by the harness outside the check loop.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A store operation failed. Aborts that operation only.
    #[error("Store error during {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// A check group failed unexpectedly. Converted into a failing result.
    #[error("Check group '{group}' failed unexpectedly: {message}")]
    CheckExecution { group: String, message: String },

    /// The report could not be produced or written.
    #[error("Report serialization failed: {0}")]
    Serialization(String),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

impl HarnessError {
    pub fn store(operation: &'static str, source: StoreError) -> Self {
        Self::Store { operation, source }
    }

    /// Returns true for connection-level store failures.
    pub fn is_store_connection(&self) -> bool {
        matches!(self, Self::Store { source, .. } if source.is_connection_error())
    }

    /// Returns true if this error must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Serialization(_) | Self::Profile(_))
    }
}
