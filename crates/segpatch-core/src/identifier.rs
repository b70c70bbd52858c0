//! Opaque identifiers for targets and clauses
//!
//! Provides [`Identifier`], the string key that names a target or a rule
//! within its parent segment.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Opaque identifier of a target or a clause
///
/// An empty identifier marks a rule that exists only in form state and has
/// not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Create identifier from any string-like value
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The empty identifier (unsaved rule)
    #[inline]
    #[must_use]
    pub fn unsaved() -> Self {
        Self(String::new())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if identifier is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the inner string
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_unsaved_is_empty() {
        assert!(Identifier::unsaved().is_empty());
        assert!(Identifier::default().is_empty());
        assert!(!Identifier::new("t1").is_empty());
    }

    #[test]
    fn identifier_display_and_parse() {
        let id: Identifier = "target-1".parse().unwrap();
        assert_eq!(id.to_string(), "target-1");
        assert_eq!(id.as_str(), "target-1");
    }

    #[test]
    fn identifier_serializes_as_plain_string() {
        let id = Identifier::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");

        let back: Identifier = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }
}
