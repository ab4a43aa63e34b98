// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! The standard check battery.
//!
//! Groups run in a fixed order: self-tests first, then the nine data
//! protection groups. The credential-storage group is appended by the
//! harness only when a store is attached.

mod groups;
mod profile;

pub use groups::{
    ApiTlsGroup, BackupEncryptionGroup, ComplianceGroup, ControlGroup, CredentialStorageGroup,
    DatabaseEncryptionGroup, FileEncryptionGroup, PasswordHashingGroup, SelfTestGroup,
    TransitEncryptionGroup,
};
pub use profile::{
    ApiEndpoint, BackupTarget, ComplianceControl, Control, DatabaseField, Profile, ProfileError,
    TransitChannel,
};

use crate::runner::CheckGroup;

/// Build the standard battery from a profile, using `iterations` for the
/// password hashing group.
pub fn standard_battery(profile: &Profile, iterations: u32) -> Vec<Box<dyn CheckGroup>> {
    vec![
        Box::new(SelfTestGroup),
        Box::new(PasswordHashingGroup::with_iterations(
            profile.password_samples.clone(),
            iterations,
        )),
        Box::new(DatabaseEncryptionGroup::new(profile.database_fields.clone())),
        Box::new(ApiTlsGroup::new(profile.api_endpoints.clone())),
        Box::new(FileEncryptionGroup::new(profile.file_samples.clone())),
        Box::new(ControlGroup::key_management(profile.key_management.clone())),
        Box::new(TransitEncryptionGroup::new(profile.transit.clone())),
        Box::new(BackupEncryptionGroup::new(profile.backups.clone())),
        Box::new(ControlGroup::session_security(profile.session.clone())),
        Box::new(ComplianceGroup::new(profile.compliance.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_order() {
        let battery = standard_battery(&Profile::default(), 10);
        let names: Vec<&str> = battery.iter().map(|g| g.name()).collect();
        assert_eq!(
            names,
            vec![
                "Cryptographic Self-Tests",
                "Password Hashing",
                "Database Encryption",
                "API TLS",
                "File Encryption",
                "Key Management",
                "Transit Encryption",
                "Backup Encryption",
                "Session Security",
                "Compliance",
            ]
        );
    }

    #[test]
    fn test_battery_headings() {
        let battery = standard_battery(&Profile::default(), 10);
        let headings: Vec<String> = battery.iter().map(|g| g.heading().to_uppercase()).collect();
        assert_eq!(headings[1], "PASSWORD SECURITY");
        assert_eq!(headings[3], "API SECURITY");
        assert_eq!(headings[6], "DATA IN TRANSIT");
        assert_eq!(headings[9], "COMPLIANCE");
    }
}
