//! Strongly-typed identifiers for domain entities
//!
//! A newtype wrapper around UUID provides type safety and prevents
//! accidental mixing of identifiers with other UUID-valued data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when parsing identifiers from text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Unique identifier of a policy aggregate
///
/// Backed by a random 128-bit UUID with the canonical lowercase
/// hyphenated text encoding. Equality is value-based on the decoded id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(Uuid);

impl PolicyId {
    /// Creates a new random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its canonical text form
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::InvalidIdentifier` if the text is not a
    /// well-formed identifier
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        Uuid::parse_str(text)
            .map(Self)
            .map_err(|_| IdentifierError::InvalidIdentifier(text.to_string()))
    }

    /// Creates from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PolicyId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for PolicyId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PolicyId> for Uuid {
    fn from(id: PolicyId) -> Uuid {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(PolicyId::generate(), PolicyId::generate());
    }

    #[test]
    fn test_display_round_trip() {
        let original = PolicyId::generate();
        let parsed: PolicyId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        let result = PolicyId::parse("not-a-policy-id");
        assert!(matches!(result, Err(IdentifierError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_display_is_lowercase_hyphenated() {
        let id = PolicyId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text, text.to_lowercase());
        assert_eq!(text.matches('-').count(), 4);
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let policy_id = PolicyId::from(uuid);
        let back: Uuid = policy_id.into();
        assert_eq!(uuid, back);
    }
}
