//! Model assembly: folds the stage outputs into one immutable module.

use super::collect::Collected;
use super::diagnostics::Diagnostic;
use super::model::Module;
use super::{inherit, visibility};

/// Build the final module value from collector output.
///
/// Runs the visibility resolver and the inheritance linker, then freezes
/// everything into a [`Module`]. Invariants on the way out: every
/// top-level declaration has exactly one verdict, methods have none, and
/// every class carries one edge per declared base.
pub fn build(id: &str, collected: Collected) -> (Module, Vec<Diagnostic>) {
    let Collected {
        mut declarations,
        export_list,
        imports,
    } = collected;

    let mut diagnostics = Vec::new();
    let (unresolved_exports, export_diags) =
        visibility::resolve(&mut declarations, export_list.as_ref(), id);
    diagnostics.extend(export_diags);
    diagnostics.extend(inherit::link(&mut declarations, id));

    let module = Module {
        id: id.to_string(),
        imports,
        declarations,
        export_list,
        unresolved_exports,
    };

    debug_assert!(module.declarations.iter().all(|d| d.visibility().is_some()));
    debug_assert!(module
        .classes()
        .all(|c| c.edges.len() == c.bases.len() && c.methods.iter().all(|m| m.visibility.is_none())));

    (module, diagnostics)
}
