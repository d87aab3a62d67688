//! Item identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ValidationError};

/// A validated item identifier.
///
/// Ids issued by the file store are decimal epoch-millisecond strings, but
/// any non-empty token of `[A-Za-z0-9_-]` is accepted so snapshots written
/// by other tools still load.
///
/// # Example
///
/// ```
/// use lostfound_core::ItemId;
///
/// let id = ItemId::new("1718031234567").unwrap();
/// assert_eq!(id.as_millis(), Some(1718031234567));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Create a new id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Create an id from an epoch-millisecond value.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.to_string())
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value if this is a millisecond id.
    pub fn as_millis(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(ValidationError::InvalidId {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.len() > 128 {
            return Err(ValidationError::InvalidId {
                value: s.to_string(),
                reason: "exceeds maximum length of 128 characters".to_string(),
            }
            .into());
        }

        if let Some(c) = s
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(ValidationError::InvalidId {
                value: s.to_string(),
                reason: format!("contains invalid character '{}'", c),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_millis_id() {
        let id = ItemId::new("1718031234567").unwrap();
        assert_eq!(id.as_str(), "1718031234567");
        assert_eq!(id.as_millis(), Some(1718031234567));
    }

    #[test]
    fn from_millis_round_trips() {
        let id = ItemId::from_millis(42);
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.as_millis(), Some(42));
    }

    #[test]
    fn non_numeric_id_is_allowed() {
        let id = ItemId::new("legacy_item-7").unwrap();
        assert_eq!(id.as_millis(), None);
    }

    #[test]
    fn invalid_empty() {
        assert!(ItemId::new("").is_err());
    }

    #[test]
    fn invalid_character() {
        assert!(ItemId::new("../items").is_err());
        assert!(ItemId::new("a b").is_err());
    }

    #[test]
    fn deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<ItemId>("\"\"").is_err());
        let id: ItemId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(id.as_str(), "17");
    }
}
