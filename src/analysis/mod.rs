//! Structural analysis of Python source into a normalized symbol model.
//!
//! The pipeline runs in fixed stages over one module at a time:
//!
//! ```text
//! ┌─────────────┐    ┌───────────┐    ┌───────────────────────┐
//! │ Source text │───▶│ FrontEnd  │───▶│ Collector             │
//! └─────────────┘    │ (parse)   │    │ (declarations,        │
//!                    └───────────┘    │  export list)         │
//!                                     └───────────────────────┘
//!                                                │
//!                                                ▼
//!                    ┌───────────┐    ┌───────────────────────┐
//!                    │ Module    │◀───│ Builder               │
//!                    │ (frozen)  │    │ (visibility verdicts, │
//!                    └───────────┘    │  inheritance edges)   │
//!                                     └───────────────────────┘
//! ```
//!
//! Metadata extraction (docstrings, decorators, async markers, parameters)
//! happens inside the collector while it still holds the syntax tree; every
//! stage after that works on owned model values only.

mod builder;
mod collect;
mod context;
mod diagnostics;
mod frontend;
mod inherit;
mod metadata;
mod model;
mod visibility;

pub use context::AnalysisContext;
pub use diagnostics::{
    AnalysisError, Diagnostic, DiagnosticKind, ModuleAnalysis, Severity,
};
pub use frontend::{FrontEnd, ParsedSource};
pub use model::{
    AttributeDecl, ClassDecl, Declaration, DeclarationKind, ExportList, FunctionDecl,
    InheritanceEdge, Module, Parameter, Span, Visibility,
};

/// Analyze one Python module from raw source text.
///
/// Never fails: a module that cannot be parsed yields an empty model
/// carrying a single fatal syntax diagnostic, so batch callers always get
/// one result per input.
pub fn analyze_module(id: &str, source: &[u8]) -> ModuleAnalysis {
    let frontend = FrontEnd::new();

    let outcome = frontend
        .parse(id, source)
        .and_then(|parsed| collect::collect(&parsed));

    match outcome {
        Ok(collected) => {
            let (module, diagnostics) = builder::build(id, collected);
            ModuleAnalysis {
                module,
                diagnostics,
            }
        }
        Err(err) => ModuleAnalysis {
            module: Module::empty(id),
            diagnostics: vec![err.into_diagnostic(id)],
        },
    }
}
