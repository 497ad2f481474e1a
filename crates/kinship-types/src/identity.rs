//! Identity keys and identities.
//!
//! Every participant is identified by an [`IdentityKey`] derived from the
//! email address they registered with. The key is the only thing the graph
//! engine and the timelines ever store; the human-readable label lives on
//! [`Identity`] and never takes part in comparisons.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Characters that delimit records in the adjacency snapshot format, plus
/// path separators (keys name the per-identity event files).
const RESERVED: [char; 6] = [':', ',', '\n', '\r', '/', '\\'];

/// Longest accepted key, in bytes.
///
/// The event file `life_events_<key>.txt` and its `.tmp` sibling must fit in
/// a 255-byte file name.
pub const MAX_KEY_LEN: usize = 235;

/// Opaque, validated key for a registered participant.
///
/// Equality and ordering are by the underlying string. Keys never contain
/// `:`, `,`, line breaks or path separators, so they can be written into the
/// adjacency snapshot and into file names without escaping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Parse a key from an email-like string.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::EmptyKey`] for blank input and
    /// [`TypesError::ReservedCharacter`] if the key contains a snapshot
    /// delimiter, [`TypesError::KeyTooLong`] past [`MAX_KEY_LEN`] bytes.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyKey);
        }
        if trimmed.len() > MAX_KEY_LEN {
            return Err(TypesError::KeyTooLong {
                len: trimmed.len(),
                max: MAX_KEY_LEN,
            });
        }
        if let Some(found) = trimmed.chars().find(|c| RESERVED.contains(c)) {
            return Err(TypesError::ReservedCharacter {
                key: trimmed.to_owned(),
                found,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for IdentityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IdentityKey {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IdentityKey> for String {
    fn from(key: IdentityKey) -> Self {
        key.0
    }
}

/// A participant as presented to the user: a key plus a display label.
///
/// Two identities are equal when their keys are equal, whatever their
/// labels say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Stable key (the registration email).
    pub key: IdentityKey,
    /// Display label (the registered name).
    pub label: String,
}

impl Identity {
    /// Create an identity from a key and a label.
    pub fn new(key: IdentityKey, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
        }
    }

    /// Create an identity whose label is its own key.
    ///
    /// Used when a key is known to the graph but no richer record exists.
    pub fn from_key(key: IdentityKey) -> Self {
        let label = key.as_str().to_owned();
        Self { key, label }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Identity {}

impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl core::fmt::Display for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let key = IdentityKey::parse("  alice@example.com \n").unwrap();
        assert_eq!(key.as_str(), "alice@example.com");
    }

    #[test]
    fn parse_rejects_blank() {
        assert_eq!(IdentityKey::parse("   "), Err(TypesError::EmptyKey));
    }

    #[test]
    fn parse_rejects_delimiters() {
        for raw in ["a:b", "a,b", "../etc/passwd", "a\\b"] {
            assert!(matches!(
                IdentityKey::parse(raw),
                Err(TypesError::ReservedCharacter { .. })
            ));
        }
    }

    #[test]
    fn parse_caps_key_length() {
        let longest = format!("{}@x.org", "a".repeat(229));
        assert_eq!(IdentityKey::parse(&longest).unwrap().as_str().len(), MAX_KEY_LEN);

        let too_long = format!("{}@example.com", "a".repeat(240));
        assert_eq!(
            IdentityKey::parse(&too_long),
            Err(TypesError::KeyTooLong {
                len: 252,
                max: MAX_KEY_LEN
            })
        );
    }

    #[test]
    fn identity_equality_ignores_label() {
        let key = IdentityKey::parse("bob@example.com").unwrap();
        let a = Identity::new(key.clone(), "Bob");
        let b = Identity::new(key, "Robert");
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn identity_displays_label() {
        let key = IdentityKey::parse("carol@example.com").unwrap();
        assert_eq!(Identity::new(key, "Carol").to_string(), "Carol");
    }

    #[test]
    fn key_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(IdentityKey::parse("dave@example.com").unwrap(), 7);
        assert_eq!(map.get("dave@example.com"), Some(&7));
    }

    #[test]
    fn key_serde_rejects_invalid() {
        let ok: Result<IdentityKey, _> = serde_json::from_str("\"eve@example.com\"");
        assert!(ok.is_ok());
        let bad: Result<IdentityKey, _> = serde_json::from_str("\"e:ve\"");
        assert!(bad.is_err());
    }
}
