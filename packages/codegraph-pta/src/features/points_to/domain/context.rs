//! Analysis contexts
//!
//! A context is a short, immutable history of call sites, abstract objects or
//! types. Equality and hashing are by content, so two separately built
//! contexts with the same elements intern to the same handle.

use crate::ir::{ClassId, ObjId, StmtId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Inline capacity; contexts deeper than this spill to the heap
const INLINE_DEPTH: usize = 2;

/// One element of a context history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ContextElement {
    /// Call site (k-call)
    CallSite(StmtId),

    /// Allocation-site object (k-obj)
    Object(ObjId),

    /// Class containing an allocation site (k-type)
    Type(ClassId),
}

impl fmt::Display for ContextElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextElement::CallSite(site) => write!(f, "{}", site),
            ContextElement::Object(obj) => write!(f, "{}", obj),
            ContextElement::Type(class) => write!(f, "{}", class),
        }
    }
}

/// Context: oldest element first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    elements: SmallVec<[ContextElement; INLINE_DEPTH]>,
}

impl Context {
    /// The empty context
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: impl IntoIterator<Item = ContextElement>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn elements(&self) -> &[ContextElement] {
        &self.elements
    }

    /// Most recent element
    #[inline]
    pub fn last(&self) -> Option<ContextElement> {
        self.elements.last().copied()
    }

    /// The last `n` elements (the whole context if it is shorter)
    pub fn suffix(&self, n: usize) -> Context {
        let start = self.elements.len().saturating_sub(n);
        Self::from_elements(self.elements[start..].iter().copied())
    }

    /// Append `element` and keep only the last `k` elements.
    ///
    /// `k == 0` always yields the empty context.
    pub fn append_truncated(&self, element: ContextElement, k: usize) -> Context {
        if k == 0 {
            return Context::empty();
        }
        let keep = k - 1;
        let start = self.elements.len().saturating_sub(keep);
        let mut elements: SmallVec<[ContextElement; INLINE_DEPTH]> =
            self.elements[start..].iter().copied().collect();
        elements.push(element);
        Context { elements }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str("]")
    }
}
