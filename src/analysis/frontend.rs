//! Tree-sitter front-end for Python source.
//!
//! The front-end is the only component that touches the grammar crate.
//! Its contract: `parse(id, text)` yields a [`ParsedSource`] or a syntax
//! error identifying the first offending span. A tree containing ERROR or
//! MISSING nodes is treated as a syntax failure for the whole module; the
//! collector never sees a partially parsed tree.

use tree_sitter::{Language, Node, Parser, Tree};

use super::diagnostics::AnalysisError;
use super::model::Span;

/// A successfully parsed module, ready for the collector.
///
/// Keeps the source alongside the tree so later stages can extract node
/// text without re-reading anything.
pub struct ParsedSource {
    /// The tree-sitter parse tree.
    pub tree: Tree,
    /// The original source bytes (kept for node text extraction).
    pub source: Vec<u8>,
    /// Module identifier (path or name), used only for diagnostics.
    pub id: String,
}

impl ParsedSource {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Python front-end. Cheap to construct; a fresh tree-sitter parser is
/// created per parse since `tree_sitter::Parser` is not Sync.
pub struct FrontEnd {
    language: Language,
}

impl FrontEnd {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Parse one module's source text.
    ///
    /// Returns `AnalysisError::Syntax` when the tree contains ERROR or
    /// MISSING nodes; the span points at the first such node.
    pub fn parse(&self, id: &str, source: &[u8]) -> Result<ParsedSource, AnalysisError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| AnalysisError::Frontend(e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::Frontend(format!("no tree produced for {}", id)))?;

        let root = tree.root_node();
        if root.has_error() {
            let node = first_error_node(root).unwrap_or(root);
            let span = Span::from_node(node);
            let message = if node.is_missing() {
                format!("missing {} at line {}", node.kind(), span.start_line)
            } else {
                format!("invalid syntax at line {}", span.start_line)
            };
            return Err(AnalysisError::Syntax { span, message });
        }

        Ok(ParsedSource {
            tree,
            source: source.to_vec(),
            id: id.to_string(),
        })
    }
}

impl Default for FrontEnd {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    None
}
