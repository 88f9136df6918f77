//! Pysurface - static structural analyzer for Python source code.
//!
//! Pysurface parses Python modules with tree-sitter and distills each one
//! into a normalized symbol model: the declarations a module defines
//! (classes, functions, methods, module attributes), their visibility
//! resolved from `__all__` or naming convention, and per-declaration
//! metadata such as docstrings, decorators, async markers, parameters,
//! and inheritance edges.
//!
//! # Architecture
//!
//! - `analysis`: the parsing and model-building pipeline plus the batch
//!   context with caching and parallel execution
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: command-line surface

pub mod analysis;
pub mod cli;
pub mod report;

pub use analysis::{
    analyze_module, AnalysisContext, ClassDecl, Declaration, DeclarationKind, Diagnostic,
    DiagnosticKind, ExportList, FunctionDecl, Module, ModuleAnalysis, Parameter, Severity, Span,
    Visibility,
};
