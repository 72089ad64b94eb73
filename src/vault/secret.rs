//! Secret records held inside the vault.
//!
//! The whole `Vec<Secret>` is serialized to JSON and encrypted as one
//! blob, so these types define the plaintext shape of the vault.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, VaultError};

/// The closed set of secret kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretCategory {
    #[serde(alias = "api-key")]
    ApiKey,
    Password,
    #[serde(alias = "ssh-key")]
    SshKey,
    Note,
    Custom,
}

impl SecretCategory {
    pub const ALL: [SecretCategory; 5] = [
        SecretCategory::ApiKey,
        SecretCategory::Password,
        SecretCategory::SshKey,
        SecretCategory::Note,
        SecretCategory::Custom,
    ];

    /// The serialized name, e.g. `api_key`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretCategory::ApiKey => "api_key",
            SecretCategory::Password => "password",
            SecretCategory::SshKey => "ssh_key",
            SecretCategory::Note => "note",
            SecretCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for SecretCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecretCategory {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "api_key" => Ok(SecretCategory::ApiKey),
            "password" => Ok(SecretCategory::Password),
            "ssh_key" => Ok(SecretCategory::SshKey),
            "note" => Ok(SecretCategory::Note),
            "custom" => Ok(SecretCategory::Custom),
            _ => Err(VaultError::InvalidSecret(format!(
                "unknown category '{s}' (expected api_key, password, ssh_key, note or custom)"
            ))),
        }
    }
}

/// A single credential or private note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Assigned on creation, never changed.
    pub id: Uuid,
    pub name: String,
    pub category: SecretCategory,
    /// The sensitive payload.
    pub value: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a secret. Id and timestamps are assigned by the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSecret {
    pub name: String,
    pub category: SecretCategory,
    pub value: String,
    pub notes: String,
}

impl NewSecret {
    /// Stamp a fresh id and timestamps onto this input.
    pub fn into_secret(self, now: DateTime<Utc>) -> Result<Secret> {
        validate_name(&self.name)?;
        Ok(Secret {
            id: Uuid::new_v4(),
            name: self.name,
            category: self.category,
            value: self.value,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a secret's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretPatch {
    pub name: Option<String>,
    pub category: Option<SecretCategory>,
    pub value: Option<String>,
    pub notes: Option<String>,
}

impl SecretPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.value.is_none()
            && self.notes.is_none()
    }
}

impl Secret {
    /// Apply `patch` in place and refresh `updated_at`.
    ///
    /// `id` and `created_at` are left untouched.
    pub fn apply(&mut self, patch: SecretPatch, now: DateTime<Utc>) -> Result<()> {
        if let Some(ref name) = patch.name {
            validate_name(name)?;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Case-insensitive match of `query` against name, category and notes.
    ///
    /// The value is never searched.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.category.as_str().contains(&needle)
            || self.notes.to_lowercase().contains(&needle)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VaultError::InvalidSecret("secret name cannot be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Secret {
        NewSecret {
            name: "GitHub".into(),
            category: SecretCategory::Password,
            value: "hunter2".into(),
            notes: "work account".into(),
        }
        .into_secret(Utc::now())
        .unwrap()
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&SecretCategory::ApiKey).unwrap();
        assert_eq!(json, "\"api_key\"");
    }

    #[test]
    fn category_accepts_hyphenated_spelling() {
        let parsed: SecretCategory = serde_json::from_str("\"ssh-key\"").unwrap();
        assert_eq!(parsed, SecretCategory::SshKey);
        assert_eq!("API-KEY".parse::<SecretCategory>().unwrap(), SecretCategory::ApiKey);
        assert!("token".parse::<SecretCategory>().is_err());
    }

    #[test]
    fn every_category_parses_its_own_name() {
        for category in SecretCategory::ALL {
            assert_eq!(category.as_str().parse::<SecretCategory>().unwrap(), category);
        }
    }

    #[test]
    fn new_secret_requires_name() {
        let result = NewSecret {
            name: "  ".into(),
            category: SecretCategory::Note,
            value: String::new(),
            notes: String::new(),
        }
        .into_secret(Utc::now());
        assert!(matches!(result, Err(VaultError::InvalidSecret(_))));
    }

    #[test]
    fn apply_keeps_id_and_created_at() {
        let mut secret = sample();
        let id = secret.id;
        let created = secret.created_at;
        let later = created + chrono::Duration::seconds(5);

        secret
            .apply(
                SecretPatch {
                    value: Some("new".into()),
                    ..SecretPatch::default()
                },
                later,
            )
            .unwrap();

        assert_eq!(secret.id, id);
        assert_eq!(secret.created_at, created);
        assert_eq!(secret.updated_at, later);
        assert_eq!(secret.value, "new");
        assert_eq!(secret.name, "GitHub");
    }

    #[test]
    fn apply_rejects_blank_rename_without_changes() {
        let mut secret = sample();
        let before = secret.clone();
        let result = secret.apply(
            SecretPatch {
                name: Some(String::new()),
                value: Some("changed".into()),
                ..SecretPatch::default()
            },
            Utc::now(),
        );
        assert!(result.is_err());
        assert_eq!(secret, before);
    }

    #[test]
    fn search_matches_name_category_and_notes_only() {
        let secret = sample();
        assert!(secret.matches(""));
        assert!(secret.matches("git"));
        assert!(secret.matches("PASS"));
        assert!(secret.matches("work"));
        assert!(!secret.matches("hunter2"));
    }

    #[test]
    fn deserializes_record_with_missing_notes() {
        let json = r#"{
            "id": "5f0c6b1e-4a63-4d3a-9a3e-0c8b8f1f2a11",
            "name": "AWS",
            "category": "api_key",
            "value": "AKIA...",
            "created_at": "2024-01-01T00:00:00.000Z",
            "updated_at": "2024-01-01T00:00:00.000Z"
        }"#;
        let secret: Secret = serde_json::from_str(json).unwrap();
        assert_eq!(secret.category, SecretCategory::ApiKey);
        assert!(secret.notes.is_empty());
    }
}
