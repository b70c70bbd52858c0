//! Segment data model
//!
//! Persisted entities ([`Target`], [`Rule`], [`SegmentSnapshot`]) and the
//! edited form values ([`Selection`], [`SegmentForm`]) the builders diff
//! against each other.

use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};

/// Individually included or excluded member of a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target identifier
    pub identifier: Identifier,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Target {
    /// Create target without a display name
    #[inline]
    #[must_use]
    pub fn new(identifier: impl Into<Identifier>) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
        }
    }

    /// Set display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A target chosen in a multi-select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Identifier of the selected target
    pub value: Identifier,

    /// Label shown to the user
    pub label: String,
}

impl Selection {
    /// Create selection
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Identifier>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<&Target> for Selection {
    fn from(target: &Target) -> Self {
        let label = target
            .name
            .clone()
            .unwrap_or_else(|| target.identifier.to_string());
        Self {
            value: target.identifier.clone(),
            label,
        }
    }
}

/// A single clause of a segment
///
/// # Invariants
/// - An empty `id` means the rule was created in the form and is not persisted
/// - Within one rule list, non-empty ids are unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Clause id, empty for unsaved rules
    #[serde(default)]
    pub id: Identifier,

    /// Target attribute the clause matches on
    pub attribute: String,

    /// Match operator (`starts_with`, `in`, ...)
    #[serde(rename = "op")]
    pub operator: String,

    /// Operand values, order significant
    #[serde(default)]
    pub values: Vec<String>,

    /// Inverts the match when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate: Option<bool>,
}

impl Rule {
    /// Create persisted rule
    #[must_use]
    pub fn new(
        id: impl Into<Identifier>,
        attribute: impl Into<String>,
        operator: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            attribute: attribute.into(),
            operator: operator.into(),
            values: values.into_iter().map(Into::into).collect(),
            negate: None,
        }
    }

    /// Create rule that only exists in form state
    #[must_use]
    pub fn new_unsaved(
        attribute: impl Into<String>,
        operator: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(Identifier::unsaved(), attribute, operator, values)
    }

    /// Set negate flag
    #[inline]
    #[must_use]
    pub fn with_negate(mut self, negate: bool) -> Self {
        self.negate = Some(negate);
        self
    }

    /// Check if rule has been persisted
    #[inline]
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Compare everything except the id
    ///
    /// `values` compare as ordered sequences and an absent `negate` differs
    /// from `Some(false)`.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute
            && self.operator == other.operator
            && self.values == other.values
            && self.negate == other.negate
    }
}

/// Segment as fetched from the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSnapshot {
    /// Segment identifier
    pub identifier: Identifier,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Individually included targets
    #[serde(default)]
    pub included: Vec<Target>,

    /// Individually excluded targets
    #[serde(default)]
    pub excluded: Vec<Target>,

    /// Clauses
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Edited form values for a segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentForm {
    /// Selected include-list targets
    #[serde(default)]
    pub included: Vec<Selection>,

    /// Selected exclude-list targets
    #[serde(default)]
    pub excluded: Vec<Selection>,

    /// Edited clauses
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl SegmentForm {
    /// Initial form values for a snapshot (no pending changes)
    #[must_use]
    pub fn from_snapshot(snapshot: &SegmentSnapshot) -> Self {
        Self {
            included: snapshot.included.iter().map(Selection::from).collect(),
            excluded: snapshot.excluded.iter().map(Selection::from).collect(),
            rules: snapshot.rules.clone(),
        }
    }
}
