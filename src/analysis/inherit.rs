//! Best-effort inheritance linking within a single module.
//!
//! Each base reference is resolved by exact name against the classes
//! collected in the same module. No method-resolution order is computed;
//! the ordered edges are recorded for downstream consumers that need one.
//! Unresolved bases are assumed external library classes and are reported
//! only as informational diagnostics, never errors.

use std::collections::HashSet;

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::model::{Declaration, InheritanceEdge};

/// Fill each class's edges from its base references, declared order
/// preserved. Returns one informational diagnostic per unresolved base.
pub fn link(declarations: &mut [Declaration], module_id: &str) -> Vec<Diagnostic> {
    let local_classes: HashSet<String> = declarations
        .iter()
        .filter_map(|d| d.as_class())
        .map(|c| c.name.clone())
        .collect();

    let mut diagnostics = Vec::new();
    for decl in declarations.iter_mut() {
        let Declaration::Class(class) = decl else {
            continue;
        };
        class.edges = class
            .bases
            .iter()
            .map(|base| {
                let resolved = local_classes.contains(base);
                if !resolved {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedBase,
                        module_id,
                        class.span.start_line,
                        format!(
                            "base class {:?} of {:?} is not declared in this module (assumed external)",
                            base, class.name
                        ),
                    ));
                }
                InheritanceEdge {
                    base: base.clone(),
                    resolved,
                }
            })
            .collect();
    }
    diagnostics
}
