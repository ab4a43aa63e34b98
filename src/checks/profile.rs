// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Declared-fact profile driving the check battery.
//!
//! Facts about infrastructure the harness cannot inspect directly (field
//! encryption, TLS endpoints, key management, backups, sessions, compliance
//! controls) are declared here and asserted against real predicates. The
//! built-in default mirrors the CampusWatch deployment inventory.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::SeedUser;

/// Errors loading or rendering a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid profile: {0}")]
    Parse(String),

    #[error("Failed to render profile: {0}")]
    Render(String),
}

/// A field declared as encrypted at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseField {
    pub field: String,
    pub algorithm: String,
    #[serde(default = "default_true")]
    pub encrypted: bool,
}

/// An API endpoint and the minimum TLS version it enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub url: String,
    pub min_tls: String,
}

/// A yes/no control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub name: String,
    pub satisfied: bool,
}

/// A channel carrying data in transit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitChannel {
    pub scenario: String,
    pub protocol: String,
    pub enabled: bool,
}

/// A backup artifact and how it is encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupTarget {
    pub name: String,
    pub method: String,
    pub key_bits: u32,
    #[serde(default = "default_true")]
    pub encrypted: bool,
}

/// A control required by a compliance standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceControl {
    pub standard: String,
    pub control: String,
    pub satisfied: bool,
}

fn default_true() -> bool {
    true
}

/// Everything the standard battery checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub password_samples: Vec<String>,
    pub file_samples: Vec<String>,
    pub database_fields: Vec<DatabaseField>,
    pub api_endpoints: Vec<ApiEndpoint>,
    pub key_management: Vec<Control>,
    pub transit: Vec<TransitChannel>,
    pub backups: Vec<BackupTarget>,
    pub session: Vec<Control>,
    pub compliance: Vec<ComplianceControl>,
    pub seed_users: Vec<SeedUser>,
}

impl Profile {
    /// Load a profile from a TOML file. Missing sections take defaults.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|e| ProfileError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ProfileError> {
        toml::from_str(text).map_err(|e| ProfileError::Parse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ProfileError> {
        toml::to_string_pretty(self).map_err(|e| ProfileError::Render(e.to_string()))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn control(name: &str, satisfied: bool) -> Control {
    Control {
        name: name.to_string(),
        satisfied,
    }
}

impl Default for Profile {
    fn default() -> Self {
        let database_fields = [
            ("users.ssn", "AES-256"),
            ("users.credit_card", "AES-256"),
            ("incidents.sensitive_data", "AES-256"),
            ("camera_feeds.metadata", "AES-128"),
        ]
        .iter()
        .map(|(field, algorithm)| DatabaseField {
            field: field.to_string(),
            algorithm: algorithm.to_string(),
            encrypted: true,
        })
        .collect();

        let api_endpoints = [
            "https://api.campuswatch.local/v1/auth",
            "https://api.campuswatch.local/v1/incidents",
            "https://api.campuswatch.local/v1/camera-feeds",
        ]
        .iter()
        .map(|url| ApiEndpoint {
            url: url.to_string(),
            min_tls: "1.2".to_string(),
        })
        .collect();

        let transit = [
            ("WebSocket connections", "WSS"),
            ("Database connections", "SSL/TLS"),
            ("Inter-service communication", "mTLS"),
            ("Cloud storage transfer", "HTTPS"),
        ]
        .iter()
        .map(|(scenario, protocol)| TransitChannel {
            scenario: scenario.to_string(),
            protocol: protocol.to_string(),
            enabled: true,
        })
        .collect();

        let backups = [
            "database_backup_daily.sql",
            "video_archive_weekly.tar",
            "config_backup.zip",
        ]
        .iter()
        .map(|name| BackupTarget {
            name: name.to_string(),
            method: "GPG".to_string(),
            key_bits: 4096,
            encrypted: true,
        })
        .collect();

        let compliance = [
            ("FERPA", "Student records encrypted"),
            ("FERPA", "Access logs encrypted"),
            ("GDPR", "PII encryption"),
            ("GDPR", "Right to erasure support"),
            ("PCI-DSS", "Card data tokenization"),
            ("PCI-DSS", "Network segmentation"),
        ]
        .iter()
        .map(|(standard, ctl)| ComplianceControl {
            standard: standard.to_string(),
            control: ctl.to_string(),
            satisfied: true,
        })
        .collect();

        Self {
            password_samples: strings(&["admin123", "SecureP@ss1", "testuser"]),
            file_samples: strings(&[
                "video_metadata.json",
                "incident_reports.pdf",
                "backup_data.tar.gz",
            ]),
            database_fields,
            api_endpoints,
            key_management: vec![
                control("Keys stored in environment variables", true),
                control("Keys rotated regularly", true),
                control("No hardcoded keys in source", true),
                control("Key vault/HSM integration", true),
                control("Separate keys for different environments", true),
            ],
            transit,
            backups,
            session: vec![
                control("JWT tokens signed", true),
                control("Session cookies encrypted", true),
                control("Tokens contain no sensitive data", true),
                control("Secure cookie flags set", true),
            ],
            compliance,
            seed_users: vec![
                SeedUser::new("testuser1", "pass1word"),
                SeedUser::new("testuser2", "pass2word"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_inventory_sizes() {
        let p = Profile::default();
        assert_eq!(p.password_samples.len(), 3);
        assert_eq!(p.database_fields.len(), 4);
        assert_eq!(p.api_endpoints.len(), 3);
        assert_eq!(p.file_samples.len(), 3);
        assert_eq!(p.key_management.len(), 5);
        assert_eq!(p.transit.len(), 4);
        assert_eq!(p.backups.len(), 3);
        assert_eq!(p.session.len(), 4);
        assert_eq!(p.compliance.len(), 6);
    }

    #[test]
    fn test_partial_profile_keeps_defaults() {
        let p = Profile::from_toml_str(
            r#"
password_samples = ["hunter2"]

[[session]]
name = "Secure cookie flags set"
satisfied = false
"#,
        )
        .unwrap();

        assert_eq!(p.password_samples, vec!["hunter2".to_string()]);
        assert_eq!(p.session.len(), 1);
        assert!(!p.session[0].satisfied);
        assert_eq!(p.compliance.len(), 6);
    }

    #[test]
    fn test_encrypted_defaults_true() {
        let p = Profile::from_toml_str(
            r#"
[[database_fields]]
field = "users.email"
algorithm = "AES-256"
"#,
        )
        .unwrap();
        assert!(p.database_fields[0].encrypted);
    }

    #[test]
    fn test_toml_render_parses_back() {
        let p = Profile::default();
        let text = p.to_toml().unwrap();
        assert_eq!(Profile::from_toml_str(&text).unwrap(), p);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Profile::from_toml_str("password_samples = 3"),
            Err(ProfileError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Profile::load(Path::new("/nonexistent/profile.toml")).unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
