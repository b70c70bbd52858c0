//! Patch instructions
//!
//! Provides [`Instruction`], one atomic change to a segment, and
//! [`InstructionBatch`], the ordered sequence produced by one submit.
//!
//! # Wire format
//!
//! Instructions serialize adjacently tagged:
//!
//! ```json
//! { "kind": "addToIncludeList", "parameters": { "targets": ["t1"] } }
//! { "kind": "updateClause", "parameters": { "clauseID": "c1", "attribute": "a", "op": "in", "values": ["x"] } }
//! ```

use crate::identifier::Identifier;
use crate::model::Rule;
use serde::{Deserialize, Serialize};

/// One atomic change operation for the segment PATCH endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "parameters", rename_all = "camelCase")]
pub enum Instruction {
    /// Add targets to the include list
    AddToIncludeList {
        /// Target identifiers
        #[serde(rename = "targets")]
        identifiers: Vec<Identifier>,
    },

    /// Remove targets from the include list
    RemoveFromIncludeList {
        /// Target identifiers
        #[serde(rename = "targets")]
        identifiers: Vec<Identifier>,
    },

    /// Add targets to the exclude list
    AddToExcludeList {
        /// Target identifiers
        #[serde(rename = "targets")]
        identifiers: Vec<Identifier>,
    },

    /// Remove targets from the exclude list
    RemoveFromExcludeList {
        /// Target identifiers
        #[serde(rename = "targets")]
        identifiers: Vec<Identifier>,
    },

    /// Create a clause; the server assigns its id
    AddClause {
        /// Attribute
        attribute: String,
        /// Operator
        #[serde(rename = "op")]
        operator: String,
        /// Values
        values: Vec<String>,
        /// Negate flag, omitted when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        negate: Option<bool>,
    },

    /// Delete a clause
    RemoveClause {
        /// Clause id
        #[serde(rename = "clauseID")]
        id: Identifier,
    },

    /// Replace the content of a clause
    ///
    /// Carries no `negate`; the backend keeps the stored flag.
    UpdateClause {
        /// Clause id
        #[serde(rename = "clauseID")]
        id: Identifier,
        /// Attribute
        attribute: String,
        /// Operator
        #[serde(rename = "op")]
        operator: String,
        /// Values
        values: Vec<String>,
    },
}

impl Instruction {
    /// `AddClause` for a rule, dropping its id
    #[must_use]
    pub fn add_clause(rule: &Rule) -> Self {
        Self::AddClause {
            attribute: rule.attribute.clone(),
            operator: rule.operator.clone(),
            values: rule.values.clone(),
            negate: rule.negate,
        }
    }

    /// `RemoveClause` for a rule id
    #[inline]
    #[must_use]
    pub fn remove_clause(id: Identifier) -> Self {
        Self::RemoveClause { id }
    }

    /// `UpdateClause` for an edited rule
    #[must_use]
    pub fn update_clause(rule: &Rule) -> Self {
        Self::UpdateClause {
            id: rule.id.clone(),
            attribute: rule.attribute.clone(),
            operator: rule.operator.clone(),
            values: rule.values.clone(),
        }
    }

    /// Wire name of the instruction kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddToIncludeList { .. } => "addToIncludeList",
            Self::RemoveFromIncludeList { .. } => "removeFromIncludeList",
            Self::AddToExcludeList { .. } => "addToExcludeList",
            Self::RemoveFromExcludeList { .. } => "removeFromExcludeList",
            Self::AddClause { .. } => "addClause",
            Self::RemoveClause { .. } => "removeClause",
            Self::UpdateClause { .. } => "updateClause",
        }
    }

    /// Check if instruction removes something
    #[inline]
    #[must_use]
    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            Self::RemoveFromIncludeList { .. }
                | Self::RemoveFromExcludeList { .. }
                | Self::RemoveClause { .. }
        )
    }
}

/// Ordered, append-only sequence of instructions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructionBatch(Vec<Instruction>);

impl InstructionBatch {
    /// Create empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append instructions, keeping their order
    #[inline]
    pub fn extend(&mut self, instructions: impl IntoIterator<Item = Instruction>) {
        self.0.extend(instructions);
    }

    /// Number of instructions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if batch is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.0.iter()
    }

    /// Borrow as slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Instruction] {
        &self.0
    }

    /// Drop all instructions
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Wrap into a PATCH request body
    #[inline]
    #[must_use]
    pub fn into_payload(self) -> PatchPayload {
        PatchPayload {
            instructions: self.0,
        }
    }
}

impl From<Vec<Instruction>> for InstructionBatch {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }
}

impl IntoIterator for InstructionBatch {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a InstructionBatch {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// JSON body of a segment PATCH request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchPayload {
    /// Instructions in application order
    pub instructions: Vec<Instruction>,
}
