//! Metadata extraction: docstrings, decorators, async markers, parameters.
//!
//! All extraction here is total on well-formed trees: absence is an
//! explicit `None` or empty vector, never an error.

use tree_sitter::Node;

use super::frontend::ParsedSource;
use super::model::Parameter;

/// The docstring of a definition body: the first statement iff it is a
/// string literal, with quotes and prefixes stripped.
pub fn docstring(parsed: &ParsedSource, body: Option<Node>) -> Option<String> {
    let first = body?.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }
    Some(string_literal_value(parsed, expr))
}

/// Decorator names in source order. Arguments are not parsed: a call
/// decorator like `@app.route('/x')` yields `app.route`.
pub fn decorators(parsed: &ParsedSource, decorated: Node) -> Vec<String> {
    let mut cursor = decorated.walk();
    decorated
        .children(&mut cursor)
        .filter(|n| n.kind() == "decorator")
        .filter_map(|d| d.named_child(0))
        .map(|expr| decorator_name(parsed, expr))
        .collect()
}

fn decorator_name(parsed: &ParsedSource, expr: Node) -> String {
    if expr.kind() == "call" {
        if let Some(function) = expr.child_by_field_name("function") {
            return parsed.node_text(function).to_string();
        }
    }
    parsed.node_text(expr).to_string()
}

/// True iff the definition's keyword sequence includes the `async` marker.
pub fn is_async(def: Node) -> bool {
    let mut cursor = def.walk();
    let found = def.children(&mut cursor).any(|c| c.kind() == "async");
    found
}

/// Parameter names with default-presence flags, source order.
///
/// `self` and `cls` are binding conventions rather than call surface and
/// are skipped. Splat parameters keep their literal text (`*args`,
/// `**kwargs`). Bare separators (`*`, `/`) are not parameters.
pub fn parameters(parsed: &ParsedSource, def: Node) -> Vec<Parameter> {
    let Some(params) = def.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        let (name, has_default) = match child.kind() {
            "identifier" => (parsed.node_text(child).to_string(), false),
            "typed_parameter" => match child.named_child(0) {
                Some(inner) => (parsed.node_text(inner).to_string(), false),
                None => continue,
            },
            "default_parameter" | "typed_default_parameter" => {
                match child.child_by_field_name("name") {
                    Some(name_node) => (parsed.node_text(name_node).to_string(), true),
                    None => continue,
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                (parsed.node_text(child).to_string(), false)
            }
            _ => continue,
        };

        if name == "self" || name == "cls" {
            continue;
        }
        out.push(Parameter { name, has_default });
    }
    out
}

/// Unquoted value of a string literal node.
///
/// Prefers the grammar's `string_content` children; falls back to
/// stripping prefixes and quote runs from the raw text.
pub fn string_literal_value(parsed: &ParsedSource, string_node: Node) -> String {
    let mut cursor = string_node.walk();
    let mut content: Option<String> = None;
    for child in string_node.children(&mut cursor) {
        match child.kind() {
            "string_content" => content
                .get_or_insert_with(String::new)
                .push_str(parsed.node_text(child)),
            "string_start" => {
                content.get_or_insert_with(String::new);
            }
            _ => {}
        }
    }
    content.unwrap_or_else(|| strip_quotes(parsed.node_text(string_node)))
}

fn strip_quotes(raw: &str) -> String {
    // Skip string prefixes like r, b, f, u (any case, any combination).
    let body = raw.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.starts_with(quote) && body.ends_with(quote) && body.len() >= 2 * quote.len() {
            return body[quote.len()..body.len() - quote.len()].to_string();
        }
    }
    body.to_string()
}
