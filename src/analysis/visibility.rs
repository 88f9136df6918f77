//! Visibility resolution for top-level declarations.
//!
//! A two-branch decision rule, evaluated once per module: with an explicit
//! export list the list is authoritative and overrides naming convention
//! entirely; without one, a leading underscore marks a name private unless
//! it is a reserved dunder form. Methods are reached through their owning
//! class and get no module-level verdict.

use std::collections::HashSet;

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::model::{Declaration, ExportList, Visibility};

/// Reserved dunder form: leading and trailing double underscore.
pub fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Naming-convention verdict, used when no explicit export list exists.
pub fn convention_visibility(name: &str) -> Visibility {
    if name.starts_with('_') && !is_dunder(name) {
        Visibility::Private
    } else {
        Visibility::Public
    }
}

/// Assign a verdict to every top-level declaration.
///
/// Returns the dangling export names (listed in `__all__` with no matching
/// declaration, deduplicated, first-appearance order) and one warning per
/// dangling name.
pub fn resolve(
    declarations: &mut [Declaration],
    export_list: Option<&ExportList>,
    module_id: &str,
) -> (Vec<String>, Vec<Diagnostic>) {
    let Some(list) = export_list else {
        for decl in declarations.iter_mut() {
            decl.set_visibility(convention_visibility(decl.name()));
        }
        return (Vec::new(), Vec::new());
    };

    let exported: HashSet<&str> = list.names.iter().map(String::as_str).collect();
    for decl in declarations.iter_mut() {
        let verdict = if exported.contains(decl.name()) {
            Visibility::Public
        } else {
            Visibility::Private
        };
        decl.set_visibility(verdict);
    }

    let declared: HashSet<&str> = declarations.iter().map(|d| d.name()).collect();
    let mut seen = HashSet::new();
    let mut dangling = Vec::new();
    let mut diagnostics = Vec::new();
    for name in &list.names {
        if declared.contains(name.as_str()) || !seen.insert(name.as_str()) {
            continue;
        }
        dangling.push(name.clone());
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::DanglingExport,
            module_id,
            list.span.start_line,
            format!("__all__ lists {:?} but no matching declaration exists", name),
        ));
    }

    (dangling, diagnostics)
}
