//! Diagnostics returned alongside the symbol model.
//!
//! Nothing here is ever surfaced as an uncaught failure that halts a batch
//! run: fatal conditions (syntax errors, malformed trees) become Error
//! diagnostics on an empty module, so a caller analyzing N modules always
//! gets N independent results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{Module, Span};

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Diagnostic kinds the analyzer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The front-end could not produce a usable syntax tree. Fatal for
    /// the module: no declarations are collected.
    #[serde(rename = "syntax_error")]
    SyntaxError,
    /// The syntax tree is missing structure the collector depends on
    /// (malformed body, missing name). Fatal for the module.
    #[serde(rename = "structural_error")]
    StructuralError,
    /// An explicit export name has no matching declaration. Non-fatal.
    #[serde(rename = "dangling_export")]
    DanglingExport,
    /// A base-class reference could not be resolved locally. Expected
    /// and common (external base classes); informational only.
    #[serde(rename = "unresolved_base")]
    UnresolvedBase,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::SyntaxError => "syntax_error",
            DiagnosticKind::StructuralError => "structural_error",
            DiagnosticKind::DanglingExport => "dangling_export",
            DiagnosticKind::UnresolvedBase => "unresolved_base",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "syntax_error" => Some(DiagnosticKind::SyntaxError),
            "structural_error" => Some(DiagnosticKind::StructuralError),
            "dangling_export" => Some(DiagnosticKind::DanglingExport),
            "unresolved_base" => Some(DiagnosticKind::UnresolvedBase),
            _ => None,
        }
    }

    /// The severity every diagnostic of this kind carries.
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::SyntaxError | DiagnosticKind::StructuralError => Severity::Error,
            DiagnosticKind::DanglingExport => Severity::Warning,
            DiagnosticKind::UnresolvedBase => Severity::Info,
        }
    }

    /// Fatal kinds abort the module's analysis (never the batch).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::SyntaxError | DiagnosticKind::StructuralError
        )
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    /// Module identifier the diagnostic belongs to.
    pub module: String,
    /// Line number (1-indexed), 0 when no position applies.
    pub line: usize,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, module: &str, line: usize, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message,
            module: module.to_string(),
            line,
        }
    }
}

/// The analyzer's per-module result: the best-effort model plus everything
/// it has to say about it, in deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAnalysis {
    pub module: Module,
    pub diagnostics: Vec<Diagnostic>,
}

impl ModuleAnalysis {
    /// True if a fatal diagnostic aborted this module's analysis.
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind.is_fatal())
    }

    /// True if the module analyzed without any diagnostics at all.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Internal analysis failures. Converted to diagnostics at the pipeline
/// boundary; callers of `analyze_module` never see these as `Err`.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("syntax error at {span}: {message}")]
    Syntax { span: Span, message: String },

    #[error("malformed syntax tree at {span}: {message}")]
    Structural { span: Span, message: String },

    #[error("front-end failure: {0}")]
    Frontend(String),
}

impl AnalysisError {
    /// Convert into the diagnostic surfaced on the module's result.
    pub fn into_diagnostic(self, module: &str) -> Diagnostic {
        match self {
            AnalysisError::Syntax { span, message } => {
                Diagnostic::new(DiagnosticKind::SyntaxError, module, span.start_line, message)
            }
            AnalysisError::Structural { span, message } => Diagnostic::new(
                DiagnosticKind::StructuralError,
                module,
                span.start_line,
                message,
            ),
            AnalysisError::Frontend(message) => {
                Diagnostic::new(DiagnosticKind::StructuralError, module, 0, message)
            }
        }
    }
}
