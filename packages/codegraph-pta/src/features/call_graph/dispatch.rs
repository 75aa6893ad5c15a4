//! Virtual dispatch
//!
//! Shared by the on-the-fly solver and the CHA builder.

use crate::errors::{PtaError, Result};
use crate::ir::{ClassHierarchy, ClassId, Invoke, InvokeKind, MethodId, Subsignature};

/// First non-abstract method with `subsignature`, starting at `class` and
/// walking up the superclass chain
pub fn dispatch(
    hierarchy: &ClassHierarchy,
    class: ClassId,
    subsignature: &Subsignature,
) -> Option<MethodId> {
    let mut current = Some(class);
    while let Some(c) = current {
        if let Some(m) = hierarchy.declared_method(c, subsignature) {
            if !hierarchy.is_abstract(m) {
                return Some(m);
            }
        }
        current = hierarchy.superclass(c);
    }
    None
}

/// Target of `invoke` given the receiver's runtime type.
///
/// Static calls are looked up in the declaring class, special calls walk up
/// from the declaring class, everything else walks up from `runtime_type`.
/// `Ok(None)` means the call cannot be resolved (e.g. missing library code).
pub fn resolve_callee(
    hierarchy: &ClassHierarchy,
    runtime_type: Option<ClassId>,
    invoke: &Invoke,
) -> Result<Option<MethodId>> {
    let method_ref = &invoke.method_ref;
    match invoke.kind {
        InvokeKind::Static => Ok(hierarchy.declared_method(method_ref.class, &method_ref.subsignature)),
        InvokeKind::Special => Ok(dispatch(hierarchy, method_ref.class, &method_ref.subsignature)),
        InvokeKind::Virtual | InvokeKind::Interface | InvokeKind::Dynamic => {
            let class = runtime_type.ok_or_else(|| {
                PtaError::invariant(format!(
                    "{} of '{}' dispatched without a receiver type",
                    invoke.kind.as_str(),
                    method_ref.subsignature
                ))
            })?;
            Ok(dispatch(hierarchy, class, &method_ref.subsignature))
        }
    }
}
