use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a diagnostic, module exercise set, or simulation.
///
/// Identifiers are opaque strings owned by the content store. An empty
/// identifier is representable so that a missing target can be detected at
/// submission time instead of at construction.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticId(String);

impl DiagnosticId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Identifier of an authenticated user (student or teacher).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiagnosticId({:?})", self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({:?})", self.0)
    }
}

impl fmt::Display for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DiagnosticId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A named, authenticated person taking part in an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub user_id: UserId,
}

impl Identity {
    #[must_use]
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_id: UserId::new(user_id),
        }
    }

    /// True when either the name or the user id is missing.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.name.trim().is_empty() || self.user_id.is_blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_detected() {
        assert!(DiagnosticId::new("").is_blank());
        assert!(DiagnosticId::new("   ").is_blank());
        assert!(!DiagnosticId::new("diag-1").is_blank());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = DiagnosticId::new("diag-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"diag-7\"");
        assert_eq!(id.to_string(), "diag-7");
    }

    #[test]
    fn identity_uses_camel_case_user_id() {
        let identity = Identity::new("Ana", "u-1");
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["name"], "Ana");
    }

    #[test]
    fn identity_without_user_id_is_incomplete() {
        assert!(Identity::new("Ana", "").is_incomplete());
        assert!(Identity::new("", "u-1").is_incomplete());
        assert!(!Identity::new("Ana", "u-1").is_incomplete());
    }
}
