//! Variable → statement index
//!
//! Instance field accesses, array accesses and instance calls are keyed by
//! their base (receiver) variable, so that the solver can materialize them
//! once the variable learns a new object. Field references are resolved here,
//! up front, so a malformed reference fails before solving starts.

use crate::errors::{PtaError, Result};
use crate::ir::{ClassHierarchy, FieldId, FieldRef, Program, Stmt, StmtId, VarId};
use rustc_hash::FxHashMap;

/// Accesses whose base is one variable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarAccesses {
    /// `base.f = rhs` as (f, rhs)
    pub store_fields: Vec<(FieldId, VarId)>,

    /// `lhs = base.f` as (lhs, f)
    pub load_fields: Vec<(VarId, FieldId)>,

    /// `base[*] = rhs`
    pub store_arrays: Vec<VarId>,

    /// `lhs = base[*]`
    pub load_arrays: Vec<VarId>,

    /// Instance calls with this variable as receiver
    pub invokes: Vec<StmtId>,
}

#[derive(Debug, Clone, Default)]
pub struct StmtIndex {
    by_var: FxHashMap<VarId, VarAccesses>,
    static_fields: FxHashMap<StmtId, FieldId>,
}

impl StmtIndex {
    /// Index every method of the program, reachable or not.
    ///
    /// Field references are resolved eagerly, so an unresolvable field in
    /// dead code still fails the run with [`PtaError::UnresolvedField`].
    pub fn new(program: &Program, hierarchy: &ClassHierarchy) -> Result<Self> {
        let mut index = Self::default();

        for m in program.method_ids() {
            for (i, stmt) in program.method(m).body.iter().enumerate() {
                let id = StmtId::new(m, i);
                match stmt {
                    Stmt::LoadField { lhs, base, field } => {
                        let f = resolve(program, hierarchy, field, base.is_none())?;
                        match base {
                            Some(base) => index.entry(*base).load_fields.push((*lhs, f)),
                            None => {
                                index.static_fields.insert(id, f);
                            }
                        }
                    }
                    Stmt::StoreField { base, field, rhs } => {
                        let f = resolve(program, hierarchy, field, base.is_none())?;
                        match base {
                            Some(base) => index.entry(*base).store_fields.push((f, *rhs)),
                            None => {
                                index.static_fields.insert(id, f);
                            }
                        }
                    }
                    Stmt::LoadArray { lhs, base } => index.entry(*base).load_arrays.push(*lhs),
                    Stmt::StoreArray { base, rhs } => index.entry(*base).store_arrays.push(*rhs),
                    Stmt::Invoke(invoke) => {
                        if let Some(receiver) = invoke.receiver {
                            index.entry(receiver).invokes.push(id);
                        }
                    }
                    Stmt::New { .. } | Stmt::Copy { .. } | Stmt::Return { .. } | Stmt::Nop => {}
                }
            }
        }

        Ok(index)
    }

    fn entry(&mut self, var: VarId) -> &mut VarAccesses {
        self.by_var.entry(var).or_default()
    }

    /// Accesses based on `var`, if any
    #[inline]
    pub fn accesses_of(&self, var: VarId) -> Option<&VarAccesses> {
        self.by_var.get(&var)
    }

    /// Resolved field of a static load/store statement
    #[inline]
    pub fn static_field_at(&self, stmt: StmtId) -> Option<FieldId> {
        self.static_fields.get(&stmt).copied()
    }
}

fn resolve(
    program: &Program,
    hierarchy: &ClassHierarchy,
    field_ref: &FieldRef,
    expect_static: bool,
) -> Result<FieldId> {
    let f = hierarchy.resolve_field(field_ref)?;
    let field = program.field(f);
    if field.is_static != expect_static {
        return Err(PtaError::malformed(format!(
            "field '{}.{}' is {}static but accessed as {}",
            hierarchy.class_name(field.declaring_class),
            field.name,
            if field.is_static { "" } else { "not " },
            if expect_static { "a static field" } else { "an instance field" },
        )));
    }
    Ok(f)
}
