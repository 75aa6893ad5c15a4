//! Class hierarchy queries
//!
//! Built once from a [`Program`]; answers declared-method lookups, subtype
//! queries and field resolution. Only the dispatch resolver and the CHA
//! builder talk to it, the solver never does directly.

use super::program::{ClassId, FieldId, MethodId, Program};
use super::stmt::{FieldRef, Subsignature};
use crate::errors::{PtaError, Result};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    /// class → subsignature → method declared in that class
    declared_methods: FxHashMap<ClassId, FxHashMap<Subsignature, MethodId>>,

    /// (class, field name) → field declared in that class
    declared_fields: FxHashMap<(ClassId, String), FieldId>,

    superclass: Vec<Option<ClassId>>,
    interfaces: Vec<Vec<ClassId>>,
    is_interface: Vec<bool>,
    class_names: Vec<String>,
    method_is_abstract: Vec<bool>,

    direct_subclasses: FxHashMap<ClassId, Vec<ClassId>>,
    direct_subinterfaces: FxHashMap<ClassId, Vec<ClassId>>,
    direct_implementors: FxHashMap<ClassId, Vec<ClassId>>,
}

impl ClassHierarchy {
    /// Index a program. Assumes [`Program::validate`] passed.
    pub fn new(program: &Program) -> Self {
        let mut hierarchy = Self {
            superclass: program.classes.iter().map(|c| c.superclass).collect(),
            interfaces: program.classes.iter().map(|c| c.interfaces.clone()).collect(),
            is_interface: program.classes.iter().map(|c| c.is_interface).collect(),
            class_names: program.classes.iter().map(|c| c.name.clone()).collect(),
            method_is_abstract: program.methods.iter().map(|m| m.is_abstract).collect(),
            ..Default::default()
        };

        for m in program.method_ids() {
            let method = program.method(m);
            hierarchy
                .declared_methods
                .entry(method.declaring_class)
                .or_default()
                .insert(method.subsignature.clone(), m);
        }

        for (i, field) in program.fields.iter().enumerate() {
            hierarchy.declared_fields.insert(
                (field.declaring_class, field.name.clone()),
                FieldId(i as u32),
            );
        }

        for c in program.class_ids() {
            let class = program.class(c);
            if let Some(sup) = class.superclass {
                hierarchy.direct_subclasses.entry(sup).or_default().push(c);
            }
            for &iface in &class.interfaces {
                let index = if class.is_interface {
                    &mut hierarchy.direct_subinterfaces
                } else {
                    &mut hierarchy.direct_implementors
                };
                index.entry(iface).or_default().push(c);
            }
        }

        hierarchy
    }

    /// Method with the given subsignature declared directly in `class`
    #[inline]
    pub fn declared_method(&self, class: ClassId, subsignature: &Subsignature) -> Option<MethodId> {
        self.declared_methods.get(&class)?.get(subsignature).copied()
    }

    #[inline]
    pub fn superclass(&self, class: ClassId) -> Option<ClassId> {
        self.superclass.get(class.index()).copied().flatten()
    }

    #[inline]
    pub fn is_interface(&self, class: ClassId) -> bool {
        self.is_interface[class.index()]
    }

    #[inline]
    pub fn is_abstract(&self, method: MethodId) -> bool {
        self.method_is_abstract[method.index()]
    }

    pub fn class_name(&self, class: ClassId) -> &str {
        &self.class_names[class.index()]
    }

    pub fn direct_subclasses_of(&self, class: ClassId) -> &[ClassId] {
        self.direct_subclasses
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn direct_subinterfaces_of(&self, class: ClassId) -> &[ClassId] {
        self.direct_subinterfaces
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn direct_implementors_of(&self, class: ClassId) -> &[ClassId] {
        self.direct_implementors
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `sub` is `sup` or a (transitive) subclass / implementor of it
    pub fn is_subtype(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut stack = vec![sub];
        while let Some(c) = stack.pop() {
            if c == sup {
                return true;
            }
            stack.extend(self.superclass(c));
            stack.extend(self.interfaces[c.index()].iter().copied());
        }
        false
    }

    /// Resolve a field reference: the class itself, then its superclasses,
    /// then its interfaces (static constants).
    pub fn resolve_field(&self, field_ref: &FieldRef) -> Result<FieldId> {
        let mut stack = vec![field_ref.class];
        while let Some(c) = stack.pop() {
            if let Some(&f) = self.declared_fields.get(&(c, field_ref.name.clone())) {
                return Ok(f);
            }
            stack.extend(self.interfaces[c.index()].iter().rev().copied());
            stack.extend(self.superclass(c));
        }
        Err(PtaError::UnresolvedField {
            class: self.class_name(field_ref.class).to_string(),
            name: field_ref.name.clone(),
        })
    }
}
