//! The symbol model: the analyzer's sole externally observable output.
//!
//! A [`Module`] is built once per analyzed file and is immutable after the
//! model builder finishes, so it can be shared across consumers without
//! synchronization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// Kind of declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Function,
    Method,
    ModuleAttribute,
}

impl DeclarationKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::ModuleAttribute => "module_attribute",
        }
    }

    /// Check if this is a callable (function or method).
    pub fn is_callable(&self) -> bool {
        matches!(self, DeclarationKind::Function | DeclarationKind::Method)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Public/Private classification of a top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A function or method parameter.
///
/// Default value expressions are never evaluated or stored; only their
/// presence is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub has_default: bool,
}

/// An inheritance edge from a class to one declared base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceEdge {
    /// The literal base reference as written in source (e.g. "models.Model").
    pub base: String,
    /// True if the base names a class declared in the same module.
    /// Unresolved bases are assumed external and are not errors.
    pub resolved: bool,
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    /// `Function` for top-level definitions, `Method` inside a class.
    pub kind: DeclarationKind,
    pub span: Span,
    /// First string-literal statement of the body, if any.
    pub docstring: Option<String>,
    /// Decorator names in source order, call arguments stripped.
    pub decorators: Vec<String>,
    /// True iff the definition carries the `async` keyword.
    pub is_async: bool,
    pub params: Vec<Parameter>,
    /// Enclosing class name; absent for top-level functions.
    pub owner: Option<String>,
    /// Module-level verdict; methods carry none.
    pub visibility: Option<Visibility>,
}

/// A class declaration with its owned methods and base references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub kind: DeclarationKind,
    pub span: Span,
    pub docstring: Option<String>,
    pub decorators: Vec<String>,
    /// Base references in declared order, literal text as written.
    pub bases: Vec<String>,
    /// One edge per base, declared order. Filled by the inheritance linker.
    pub edges: Vec<InheritanceEdge>,
    /// Owned methods in source order.
    pub methods: Vec<FunctionDecl>,
    pub visibility: Option<Visibility>,
}

/// A module-level assignment (`name = expr`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDecl {
    pub name: String,
    pub kind: DeclarationKind,
    pub span: Span,
    pub visibility: Option<Visibility>,
}

/// A named, collectible construct. Closed set of variants with a shared
/// base contract (name, kind, span, visibility), dispatched by pattern
/// matching at each pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Declaration {
    Class(ClassDecl),
    Function(FunctionDecl),
    Attribute(AttributeDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(c) => &c.name,
            Declaration::Function(f) => &f.name,
            Declaration::Attribute(a) => &a.name,
        }
    }

    pub fn kind(&self) -> DeclarationKind {
        match self {
            Declaration::Class(c) => c.kind,
            Declaration::Function(f) => f.kind,
            Declaration::Attribute(a) => a.kind,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Declaration::Class(c) => &c.span,
            Declaration::Function(f) => &f.span,
            Declaration::Attribute(a) => &a.span,
        }
    }

    pub fn visibility(&self) -> Option<Visibility> {
        match self {
            Declaration::Class(c) => c.visibility,
            Declaration::Function(f) => f.visibility,
            Declaration::Attribute(a) => a.visibility,
        }
    }

    pub(crate) fn set_visibility(&mut self, verdict: Visibility) {
        match self {
            Declaration::Class(c) => c.visibility = Some(verdict),
            Declaration::Function(f) => f.visibility = Some(verdict),
            Declaration::Attribute(a) => a.visibility = Some(verdict),
        }
    }

    pub fn as_class(&self) -> Option<&ClassDecl> {
        match self {
            Declaration::Class(c) => Some(c),
            _ => None,
        }
    }
}

/// Explicit export list (`__all__`) exactly as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportList {
    /// Names verbatim: source order, duplicates preserved.
    pub names: Vec<String>,
    /// Span of the `__all__` assignment.
    pub span: Span,
}

impl ExportList {
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// One analyzed source file's complete structural model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Path or name used as the module's key; diagnostics only.
    pub id: String,
    /// Imported module names in source order, duplicates preserved.
    /// `import a.b` and `from a.b import c` both record `a.b`.
    pub imports: Vec<String>,
    /// Top-level declarations in exact source order.
    pub declarations: Vec<Declaration>,
    /// Explicit export list; absent means "infer from visibility rules".
    pub export_list: Option<ExportList>,
    /// Export names with no matching top-level declaration, first
    /// appearance order, deduplicated.
    pub unresolved_exports: Vec<String>,
}

impl Module {
    /// Create an empty module model (used when analysis fails fatally).
    pub fn empty(id: &str) -> Self {
        Self {
            id: id.to_string(),
            imports: Vec::new(),
            declarations: Vec::new(),
            export_list: None,
            unresolved_exports: Vec::new(),
        }
    }

    /// Find a top-level declaration by name.
    pub fn find_declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name() == name)
    }

    /// All class declarations in source order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.declarations.iter().filter_map(|d| d.as_class())
    }

    /// Names of all public top-level declarations, source order.
    pub fn public_names(&self) -> Vec<&str> {
        self.declarations
            .iter()
            .filter(|d| d.visibility().is_some_and(|v| v.is_public()))
            .map(|d| d.name())
            .collect()
    }
}
