//! Declaration collection: walks the syntax tree into an ordered registry.
//!
//! Only named class/function/method/module-assignment forms are collected;
//! anonymous and expression-only constructs are ignored. A function defined
//! conditionally (inside a module-level branch) is still collected as a
//! top-level declaration at its lexical position; no reachability reasoning
//! is attempted. A definition missing its name node is a front-end defect
//! and fails fast with a structural error; malformed regions are never
//! silently skipped.

use std::collections::HashSet;

use tree_sitter::Node;

use super::diagnostics::AnalysisError;
use super::frontend::ParsedSource;
use super::metadata;
use super::model::{
    AttributeDecl, ClassDecl, Declaration, DeclarationKind, ExportList, FunctionDecl, Span,
};

/// Raw collector output: declarations in exact source order plus the
/// imported module names and the explicit export list, when one was found.
pub struct Collected {
    pub declarations: Vec<Declaration>,
    pub export_list: Option<ExportList>,
    pub imports: Vec<String>,
}

/// Collect all declarations from a parsed module.
pub fn collect(parsed: &ParsedSource) -> Result<Collected, AnalysisError> {
    let mut collector = Collector {
        parsed,
        declarations: Vec::new(),
        export_list: None,
        seen: HashSet::new(),
    };
    collector.walk_block(parsed.tree.root_node())?;
    Ok(Collected {
        declarations: collector.declarations,
        export_list: collector.export_list,
        imports: imports(parsed),
    })
}

/// Imported module names anywhere in the file, source order. Both plain
/// imports and from-imports record the module path; aliases keep the
/// original name (`import numpy as np` records `numpy`).
fn imports(parsed: &ParsedSource) -> Vec<String> {
    let mut out = Vec::new();
    walk_imports(parsed, parsed.tree.root_node(), &mut out);
    out
}

fn walk_imports(parsed: &ParsedSource, node: Node, out: &mut Vec<String>) {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "dotted_name" => out.push(parsed.node_text(child).to_string()),
                    "aliased_import" => {
                        if let Some(name) = child.child_by_field_name("name") {
                            out.push(parsed.node_text(name).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        "import_from_statement" => {
            // module_name is a dotted_name or a relative_import
            if let Some(module) = node.child_by_field_name("module_name") {
                out.push(parsed.node_text(module).to_string());
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk_imports(parsed, child, out);
            }
        }
    }
}

struct Collector<'a> {
    parsed: &'a ParsedSource,
    declarations: Vec<Declaration>,
    export_list: Option<ExportList>,
    /// Top-level names already collected; first occurrence wins, keeping
    /// the (owner, name) pair unique within the module scope.
    seen: HashSet<String>,
}

impl<'a> Collector<'a> {
    fn walk_block(&mut self, block: Node) -> Result<(), AnalysisError> {
        let mut cursor = block.walk();
        for child in block.named_children(&mut cursor) {
            self.statement(child)?;
        }
        Ok(())
    }

    fn statement(&mut self, node: Node) -> Result<(), AnalysisError> {
        match node.kind() {
            "function_definition" => {
                let func = self.function(node, Vec::new(), Span::from_node(node), None)?;
                self.push(Declaration::Function(func));
            }
            "class_definition" => {
                let class = self.class(node, Vec::new(), Span::from_node(node))?;
                self.push(Declaration::Class(class));
            }
            "decorated_definition" => self.decorated(node)?,
            "expression_statement" => self.expression_statement(node),
            // Conditionally defined declarations still land at their
            // lexical position as top-level symbols.
            "if_statement" | "try_statement" | "for_statement" | "while_statement"
            | "with_statement" => self.walk_branches(node)?,
            _ => {}
        }
        Ok(())
    }

    /// Descend into the blocks of a module-level compound statement,
    /// including elif/else/except/finally clauses.
    fn walk_branches(&mut self, node: Node) -> Result<(), AnalysisError> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "block" => self.walk_block(child)?,
                "elif_clause" | "else_clause" | "except_clause" | "except_group_clause"
                | "finally_clause" => self.walk_branches(child)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn decorated(&mut self, node: Node) -> Result<(), AnalysisError> {
        let decorators = metadata::decorators(self.parsed, node);
        let def = node
            .child_by_field_name("definition")
            .ok_or_else(|| structural(node, "decorated definition without a definition"))?;
        let span = Span::from_node(node);
        match def.kind() {
            "function_definition" => {
                let func = self.function(def, decorators, span, None)?;
                self.push(Declaration::Function(func));
            }
            "class_definition" => {
                let class = self.class(def, decorators, span)?;
                self.push(Declaration::Class(class));
            }
            _ => {}
        }
        Ok(())
    }

    fn function(
        &self,
        def: Node,
        decorators: Vec<String>,
        span: Span,
        owner: Option<&str>,
    ) -> Result<FunctionDecl, AnalysisError> {
        let name_node = def
            .child_by_field_name("name")
            .ok_or_else(|| structural(def, "function definition without a name"))?;
        let name = self.parsed.node_text(name_node).to_string();

        Ok(FunctionDecl {
            name,
            kind: if owner.is_some() {
                DeclarationKind::Method
            } else {
                DeclarationKind::Function
            },
            span,
            docstring: metadata::docstring(self.parsed, def.child_by_field_name("body")),
            decorators,
            is_async: metadata::is_async(def),
            params: metadata::parameters(self.parsed, def),
            owner: owner.map(str::to_string),
            visibility: None,
        })
    }

    fn class(
        &self,
        def: Node,
        decorators: Vec<String>,
        span: Span,
    ) -> Result<ClassDecl, AnalysisError> {
        let name_node = def
            .child_by_field_name("name")
            .ok_or_else(|| structural(def, "class definition without a name"))?;
        let name = self.parsed.node_text(name_node).to_string();

        let bases = self.base_references(def);
        let body = def.child_by_field_name("body");
        let methods = match body {
            Some(block) => self.methods(block, &name)?,
            None => Vec::new(),
        };

        Ok(ClassDecl {
            name,
            kind: DeclarationKind::Class,
            span,
            docstring: metadata::docstring(self.parsed, body),
            decorators,
            bases,
            edges: Vec::new(), // filled by the inheritance linker
            methods,
            visibility: None,
        })
    }

    /// Base references from the class argument list, declared order.
    /// Keyword arguments (`metaclass=...`) are not bases.
    fn base_references(&self, class_def: Node) -> Vec<String> {
        let Some(superclasses) = class_def.child_by_field_name("superclasses") else {
            return Vec::new();
        };
        let mut cursor = superclasses.walk();
        superclasses
            .named_children(&mut cursor)
            .filter(|n| !matches!(n.kind(), "keyword_argument" | "comment"))
            .map(|n| self.parsed.node_text(n).to_string())
            .collect()
    }

    /// Methods directly in a class body, source order. Nested classes and
    /// class-level assignments are not methods and are not collected.
    fn methods(&self, block: Node, owner: &str) -> Result<Vec<FunctionDecl>, AnalysisError> {
        let mut methods = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = block.walk();
        for child in block.named_children(&mut cursor) {
            let method = match child.kind() {
                "function_definition" => {
                    self.function(child, Vec::new(), Span::from_node(child), Some(owner))?
                }
                "decorated_definition" => {
                    let Some(def) = child.child_by_field_name("definition") else {
                        continue;
                    };
                    if def.kind() != "function_definition" {
                        continue;
                    }
                    let decorators = metadata::decorators(self.parsed, child);
                    self.function(def, decorators, Span::from_node(child), Some(owner))?
                }
                _ => continue,
            };
            if seen.insert(method.name.clone()) {
                methods.push(method);
            }
        }
        Ok(methods)
    }

    fn expression_statement(&mut self, node: Node) {
        let Some(assign) = node.named_child(0).filter(|n| n.kind() == "assignment") else {
            return;
        };
        let Some(left) = assign.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }
        let name = self.parsed.node_text(left).to_string();

        if name == "__all__" {
            // The export list describes the module surface; it is not
            // itself part of it. First recognized assignment wins.
            if self.export_list.is_none() {
                self.export_list = self.export_list_from(assign);
            }
            return;
        }

        self.push(Declaration::Attribute(AttributeDecl {
            name,
            kind: DeclarationKind::ModuleAttribute,
            span: Span::from_node(assign),
            visibility: None,
        }));
    }

    /// Recognize `__all__ = [...]` or `__all__ = (...)` with string
    /// literal elements. Anything else means "no explicit export list".
    fn export_list_from(&self, assign: Node) -> Option<ExportList> {
        let right = assign.child_by_field_name("right")?;
        if !matches!(right.kind(), "list" | "tuple") {
            return None;
        }
        let mut names = Vec::new();
        let mut cursor = right.walk();
        for item in right.named_children(&mut cursor) {
            // non-string elements are not statically resolvable; skip them
            if item.kind() == "string" {
                names.push(metadata::string_literal_value(self.parsed, item));
            }
        }
        Some(ExportList {
            names,
            span: Span::from_node(assign),
        })
    }

    fn push(&mut self, decl: Declaration) {
        if self.seen.insert(decl.name().to_string()) {
            self.declarations.push(decl);
        }
    }
}

fn structural(node: Node, message: &str) -> AnalysisError {
    AnalysisError::Structural {
        span: Span::from_node(node),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::frontend::FrontEnd;

    fn collect_source(source: &str) -> Collected {
        let parsed = FrontEnd::new().parse("test.py", source.as_bytes()).unwrap();
        collect(&parsed).unwrap()
    }

    #[test]
    fn test_source_order_preserved() {
        let collected = collect_source(
            "z = 1\n\nclass B:\n    pass\n\ndef a():\n    pass\n\nclass A:\n    pass\n",
        );
        let names: Vec<&str> = collected.declarations.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["z", "B", "a", "A"]);
    }

    #[test]
    fn test_methods_grouped_under_class() {
        let collected = collect_source(
            "class Service:\n    def first(self):\n        pass\n\n    def second(self):\n        pass\n",
        );
        let class = collected.declarations[0].as_class().unwrap();
        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(class.methods[0].kind, DeclarationKind::Method);
        assert_eq!(class.methods[0].owner.as_deref(), Some("Service"));
    }

    #[test]
    fn test_conditional_definition_is_top_level() {
        let collected = collect_source(
            "if True:\n    def cond():\n        pass\nelse:\n    def other():\n        pass\n",
        );
        let names: Vec<&str> = collected.declarations.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["cond", "other"]);
        assert_eq!(collected.declarations[0].kind(), DeclarationKind::Function);
    }

    #[test]
    fn test_try_block_definitions() {
        let collected = collect_source(
            "try:\n    def attempt():\n        pass\nexcept ImportError:\n    def fallback():\n        pass\n",
        );
        let names: Vec<&str> = collected.declarations.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["attempt", "fallback"]);
    }

    #[test]
    fn test_module_attributes() {
        let collected = collect_source("app = create()\nlogger = logging.getLogger(__name__)\n");
        let names: Vec<&str> = collected.declarations.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["app", "logger"]);
        assert_eq!(
            collected.declarations[0].kind(),
            DeclarationKind::ModuleAttribute
        );
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let collected = collect_source("x = 1\nx = 2\n\ndef x():\n    pass\n");
        assert_eq!(collected.declarations.len(), 1);
        assert_eq!(
            collected.declarations[0].kind(),
            DeclarationKind::ModuleAttribute
        );
    }

    #[test]
    fn test_export_list_captured_verbatim() {
        let collected = collect_source("__all__ = ['b', 'a', 'b']\n\ndef a():\n    pass\n");
        let exports = collected.export_list.unwrap();
        assert_eq!(exports.names, vec!["b", "a", "b"]);
        // __all__ itself is not a declaration
        let names: Vec<&str> = collected.declarations.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_non_literal_export_list_ignored() {
        let collected = collect_source("__all__ = make_exports()\n");
        assert!(collected.export_list.is_none());
        assert!(collected.declarations.is_empty());
    }

    #[test]
    fn test_anonymous_constructs_ignored() {
        let collected = collect_source("f = lambda x: x\nprint('hi')\n[1, 2, 3]\n");
        let names: Vec<&str> = collected.declarations.iter().map(|d| d.name()).collect();
        // the lambda assignment is a module attribute; bare expressions vanish
        assert_eq!(names, vec!["f"]);
    }

    #[test]
    fn test_base_references_skip_keyword_arguments() {
        let collected =
            collect_source("class C(Base, metaclass=Meta):\n    pass\n");
        let class = collected.declarations[0].as_class().unwrap();
        assert_eq!(class.bases, vec!["Base"]);
    }

    #[test]
    fn test_nested_class_not_a_method() {
        let collected = collect_source(
            "class Post:\n    class Meta:\n        pass\n\n    def get_summary(self):\n        pass\n",
        );
        let class = collected.declarations[0].as_class().unwrap();
        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["get_summary"]);
    }

    #[test]
    fn test_imports_recorded_in_source_order() {
        let collected = collect_source(
            "import logging\nfrom flask import Flask, request\nimport numpy as np\nfrom . import utils\n\ndef f():\n    import json\n    return json\n",
        );
        assert_eq!(
            collected.imports,
            vec!["logging", "flask", "numpy", ".", "json"]
        );
        // imports are not declarations
        let names: Vec<&str> = collected.declarations.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["f"]);
    }

    #[test]
    fn test_multi_import_statement() {
        let collected = collect_source("import os, sys\nfrom django.db import models\n");
        assert_eq!(collected.imports, vec!["os", "sys", "django.db"]);
    }

    #[test]
    fn test_decorated_class_collected() {
        let collected = collect_source("@register\nclass Handler:\n    pass\n");
        let class = collected.declarations[0].as_class().unwrap();
        assert_eq!(class.name, "Handler");
        assert_eq!(class.decorators, vec!["register"]);
    }
}
