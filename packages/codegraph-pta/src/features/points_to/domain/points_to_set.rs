//! Points-to sets
//!
//! Sorted, deduplicated vector of context-qualified objects. Sets only grow:
//! there is no removal. Merges are linear two-pointer walks over sorted
//! storage, which also yields the delta of a merge for free.
//!
//! # Performance Characteristics
//! - Insert: O(n) (shift), O(log n) lookup
//! - Contains: O(log n)
//! - Merge with delta: O(n + m)
//! - Intersects: O(n + m)

use super::cs_element::CSObjId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsToSet {
    elements: Vec<CSObjId>,
}

impl PointsToSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn singleton(obj: CSObjId) -> Self {
        Self {
            elements: vec![obj],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn contains(&self, obj: CSObjId) -> bool {
        self.elements.binary_search(&obj).is_ok()
    }

    /// Iterate in ascending handle order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = CSObjId> + '_ {
        self.elements.iter().copied()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Growth
    // ═══════════════════════════════════════════════════════════════════════

    /// Insert one object. Returns true if it was not present.
    pub fn insert(&mut self, obj: CSObjId) -> bool {
        match self.elements.binary_search(&obj) {
            Ok(_) => false,
            Err(pos) => {
                self.elements.insert(pos, obj);
                true
            }
        }
    }

    /// self = self ∪ other, returning other \ self-before (the delta).
    ///
    /// The delta is empty iff nothing changed.
    pub fn add_all(&mut self, other: &PointsToSet) -> PointsToSet {
        if other.is_empty() {
            return PointsToSet::new();
        }
        if self.is_empty() {
            self.elements = other.elements.clone();
            return other.clone();
        }

        let mut merged = Vec::with_capacity(self.elements.len() + other.elements.len());
        let mut delta = Vec::new();
        let mut i = 0;
        let mut j = 0;

        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                Ordering::Less => {
                    merged.push(self.elements[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(other.elements[j]);
                    delta.push(other.elements[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(self.elements[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.elements[i..]);
        merged.extend_from_slice(&other.elements[j..]);
        delta.extend_from_slice(&other.elements[j..]);

        if !delta.is_empty() {
            self.elements = merged;
        }
        PointsToSet { elements: delta }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Whether the sets share at least one object
    pub fn intersects(&self, other: &PointsToSet) -> bool {
        let mut i = 0;
        let mut j = 0;
        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// self ⊆ other
    pub fn is_subset(&self, other: &PointsToSet) -> bool {
        self.len() <= other.len() && self.iter().all(|obj| other.contains(obj))
    }
}

impl FromIterator<CSObjId> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = CSObjId>>(iter: I) -> Self {
        let mut elements: Vec<CSObjId> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Self { elements }
    }
}

impl<'a> IntoIterator for &'a PointsToSet {
    type Item = CSObjId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, CSObjId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter().copied()
    }
}
