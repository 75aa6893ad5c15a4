//! IR statements
//!
//! A closed set of statement kinds. Everything the pointer analysis does not
//! care about (branches, arithmetic, ...) is lowered to [`Stmt::Nop`].

use super::program::{ClassId, MethodId, VarId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Method name plus parameter/return descriptor, e.g. `void foo(A,int)`.
///
/// Two methods with equal subsignatures in a subclass/superclass pair
/// override each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subsignature(pub String);

impl Subsignature {
    pub fn new(s: impl Into<String>) -> Self {
        Subsignature(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subsignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Subsignature {
    fn from(s: &str) -> Self {
        Subsignature(s.to_string())
    }
}

/// Statement identity: owning method plus position in its body
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct StmtId {
    pub method: MethodId,
    pub index: u32,
}

impl StmtId {
    pub fn new(method: MethodId, index: usize) -> Self {
        Self {
            method,
            index: index as u32,
        }
    }
}

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.method, self.index)
    }
}

/// Symbolic field reference, resolved against the class hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    /// Class the reference is written against (the field may live in a superclass)
    pub class: ClassId,
    pub name: String,
}

impl FieldRef {
    pub fn new(class: ClassId, name: impl Into<String>) -> Self {
        Self {
            class,
            name: name.into(),
        }
    }
}

/// Symbolic method reference: declaring class plus subsignature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub class: ClassId,
    pub subsignature: Subsignature,
}

impl MethodRef {
    pub fn new(class: ClassId, subsignature: impl Into<Subsignature>) -> Self {
        Self {
            class,
            subsignature: subsignature.into(),
        }
    }
}

/// Invocation instruction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvokeKind {
    Static,
    Special,
    Virtual,
    Interface,
    Dynamic,
}

impl InvokeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvokeKind::Static => "invokestatic",
            InvokeKind::Special => "invokespecial",
            InvokeKind::Virtual => "invokevirtual",
            InvokeKind::Interface => "invokeinterface",
            InvokeKind::Dynamic => "invokedynamic",
        }
    }
}

/// A call statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoke {
    pub kind: InvokeKind,
    pub method_ref: MethodRef,
    /// Receiver variable; `None` for static calls
    #[serde(default)]
    pub receiver: Option<VarId>,
    #[serde(default)]
    pub args: Vec<VarId>,
    /// Variable receiving the return value, if any
    #[serde(default)]
    pub result: Option<VarId>,
}

impl Invoke {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.kind == InvokeKind::Static
    }
}

/// IR statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Stmt {
    /// `lhs = new C` (also used for array allocations)
    New { lhs: VarId, class: ClassId },

    /// `lhs = rhs`
    Copy { lhs: VarId, rhs: VarId },

    /// `lhs = base.f`, or `lhs = C.f` when `base` is `None`
    LoadField {
        lhs: VarId,
        #[serde(default)]
        base: Option<VarId>,
        field: FieldRef,
    },

    /// `base.f = rhs`, or `C.f = rhs` when `base` is `None`
    StoreField {
        #[serde(default)]
        base: Option<VarId>,
        field: FieldRef,
        rhs: VarId,
    },

    /// `lhs = base[*]`
    LoadArray { lhs: VarId, base: VarId },

    /// `base[*] = rhs`
    StoreArray { base: VarId, rhs: VarId },

    /// Method invocation
    Invoke(Invoke),

    /// `return value`
    Return {
        #[serde(default)]
        value: Option<VarId>,
    },

    /// Anything irrelevant to pointer flow
    Nop,
}

impl Stmt {
    /// Variable defined by this statement
    pub fn def(&self) -> Option<VarId> {
        match self {
            Stmt::New { lhs, .. }
            | Stmt::Copy { lhs, .. }
            | Stmt::LoadField { lhs, .. }
            | Stmt::LoadArray { lhs, .. } => Some(*lhs),
            Stmt::Invoke(invoke) => invoke.result,
            Stmt::StoreField { .. } | Stmt::StoreArray { .. } | Stmt::Return { .. } | Stmt::Nop => {
                None
            }
        }
    }

    /// Variables read by this statement
    pub fn uses(&self) -> SmallVec<[VarId; 4]> {
        let mut uses = SmallVec::new();
        match self {
            Stmt::New { .. } | Stmt::Nop => {}
            Stmt::Copy { rhs, .. } => uses.push(*rhs),
            Stmt::LoadField { base, .. } => uses.extend(base.iter().copied()),
            Stmt::StoreField { base, rhs, .. } => {
                uses.extend(base.iter().copied());
                uses.push(*rhs);
            }
            Stmt::LoadArray { base, .. } => uses.push(*base),
            Stmt::StoreArray { base, rhs } => {
                uses.push(*base);
                uses.push(*rhs);
            }
            Stmt::Invoke(invoke) => {
                uses.extend(invoke.receiver.iter().copied());
                uses.extend(invoke.args.iter().copied());
            }
            Stmt::Return { value } => uses.extend(value.iter().copied()),
        }
        uses
    }

    pub fn as_invoke(&self) -> Option<&Invoke> {
        match self {
            Stmt::Invoke(invoke) => Some(invoke),
            _ => None,
        }
    }
}
