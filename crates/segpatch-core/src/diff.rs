//! Set difference over ordered key lists
//!
//! Provides [`diff`], the primitive every instruction builder reduces to.

use std::collections::HashSet;
use std::hash::Hash;

/// Result of diffing two key lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<K> {
    /// Desired keys missing from existing, in desired order
    pub added: Vec<K>,

    /// Existing keys missing from desired, in existing order
    pub removed: Vec<K>,
}

impl<K> Diff<K> {
    /// Check if both sides are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl<K> Default for Diff<K> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

/// Compute `(added, removed)` between existing and desired keys
///
/// Membership is tested per key, so a key present at least once on both
/// sides is kept. Duplicates are passed through, not collapsed.
///
/// # Examples
/// ```
/// use segpatch_core::diff;
///
/// let d = diff(&["a", "b"], &["b", "c"]);
/// assert_eq!(d.added, vec!["c"]);
/// assert_eq!(d.removed, vec!["a"]);
/// ```
#[must_use]
pub fn diff<K>(existing: &[K], desired: &[K]) -> Diff<K>
where
    K: Eq + Hash + Clone,
{
    diff_by(existing, desired, |k| k.clone(), |k| k.clone())
}

/// Keyed variant of [`diff`] over heterogeneous inputs
///
/// `existing_key` and `desired_key` project each element onto the compared key.
#[must_use]
pub fn diff_by<E, D, K, FE, FD>(
    existing: &[E],
    desired: &[D],
    existing_key: FE,
    desired_key: FD,
) -> Diff<K>
where
    K: Eq + Hash,
    FE: Fn(&E) -> K,
    FD: Fn(&D) -> K,
{
    let existing_keys: HashSet<K> = existing.iter().map(&existing_key).collect();
    let desired_keys: HashSet<K> = desired.iter().map(&desired_key).collect();

    let added = desired
        .iter()
        .map(&desired_key)
        .filter(|k| !existing_keys.contains(k))
        .collect();
    let removed = existing
        .iter()
        .map(&existing_key)
        .filter(|k| !desired_keys.contains(k))
        .collect();

    Diff { added, removed }
}
