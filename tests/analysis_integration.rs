//! Integration tests for the analysis pipeline.
//!
//! These tests run the full pipeline over real Python fixtures in
//! testdata/ and validate the resulting symbol models.

use std::path::PathBuf;

use pysurface::analysis::{
    analyze_module, AnalysisContext, DeclarationKind, DiagnosticKind, ModuleAnalysis, Severity,
    Visibility,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn analyze_fixture(name: &str) -> ModuleAnalysis {
    let path = testdata_path().join(name);
    let source = std::fs::read(&path).expect("fixture should be readable");
    analyze_module(name, &source)
}

// =============================================================================
// Export list semantics (app.py has an explicit __all__)
// =============================================================================

#[test]
fn test_export_list_overrides_convention() {
    let analysis = analyze_fixture("app.py");
    let module = &analysis.module;

    let exports = module.export_list.as_ref().expect("app.py has __all__");
    assert_eq!(
        exports.names,
        vec!["UserService", "create_app", "fetch_external_data"]
    );

    // only listed names are public, in source order
    assert_eq!(
        module.public_names(),
        vec!["UserService", "create_app", "fetch_external_data"]
    );

    // unlisted module attributes become private despite clean names
    let app = module.find_declaration("app").expect("app attribute");
    assert_eq!(app.kind(), DeclarationKind::ModuleAttribute);
    assert_eq!(app.visibility(), Some(Visibility::Private));

    // __all__ itself is consumed, not a declaration
    assert!(module.find_declaration("__all__").is_none());

    assert!(module.unresolved_exports.is_empty());
}

#[test]
fn test_underscore_convention_without_export_list() {
    let analysis = analyze_module(
        "conv.py",
        b"def visible():\n    pass\n\ndef _hidden():\n    pass\n\n__version__ = '1.0'\n",
    );
    let module = &analysis.module;
    assert_eq!(module.public_names(), vec!["visible", "__version__"]);
    assert_eq!(
        module.find_declaration("_hidden").unwrap().visibility(),
        Some(Visibility::Private)
    );
}

#[test]
fn test_dangling_export_is_reported() {
    let analysis = analyze_module(
        "dangling.py",
        b"__all__ = ['real', 'ghost']\n\ndef real():\n    pass\n",
    );
    assert_eq!(analysis.module.unresolved_exports, vec!["ghost"]);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].kind, DiagnosticKind::DanglingExport);
    assert_eq!(analysis.diagnostics[0].severity, Severity::Warning);
    // a dangling export never fails the module
    assert!(!analysis.has_fatal());
}

// =============================================================================
// Metadata (docstrings, async, decorators, parameters)
// =============================================================================

#[test]
fn test_app_fixture_metadata() {
    let analysis = analyze_fixture("app.py");
    let module = &analysis.module;

    let service = module
        .find_declaration("UserService")
        .and_then(|d| d.as_class())
        .expect("UserService class");
    assert_eq!(
        service.docstring.as_deref(),
        Some("Handles user-related operations.")
    );

    let method_names: Vec<&str> = service.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(method_names, vec!["__init__", "get_user", "create_user"]);

    let create_user = &service.methods[2];
    assert!(create_user.is_async);
    assert_eq!(create_user.kind, DeclarationKind::Method);
    assert_eq!(create_user.owner.as_deref(), Some("UserService"));
    // self is stripped
    assert_eq!(create_user.params.len(), 1);
    assert_eq!(create_user.params[0].name, "data");

    let fetch = module.find_declaration("fetch_external_data").unwrap();
    let pysurface::analysis::Declaration::Function(fetch) = fetch else {
        panic!("expected function");
    };
    assert!(fetch.is_async);
    assert_eq!(
        fetch.docstring.as_deref(),
        Some("Fetches data from an external API.")
    );
    let params: Vec<(&str, bool)> = fetch
        .params
        .iter()
        .map(|p| (p.name.as_str(), p.has_default))
        .collect();
    assert_eq!(params, vec![("url", false), ("timeout", true)]);

    let create_app = module.find_declaration("create_app").unwrap();
    let pysurface::analysis::Declaration::Function(create_app) = create_app else {
        panic!("expected function");
    };
    assert!(!create_app.is_async);
    assert_eq!(create_app.params.len(), 1);
    assert!(create_app.params[0].has_default);
}

#[test]
fn test_decorated_definitions_are_unwrapped() {
    let analysis = analyze_module(
        "dec.py",
        b"@app.route('/users')\ndef list_users():\n    pass\n",
    );
    let module = &analysis.module;
    let decl = module.find_declaration("list_users").unwrap();
    let pysurface::analysis::Declaration::Function(f) = decl else {
        panic!("expected function");
    };
    assert_eq!(f.decorators, vec!["app.route"]);
    // span covers the decorated definition, starting at the decorator line
    assert_eq!(f.span.start_line, 1);
}

#[test]
fn test_fixture_imports_recorded() {
    let app = analyze_fixture("app.py");
    // includes the function-body aiohttp import
    assert_eq!(
        app.module.imports,
        vec!["flask", "models", "logging", "aiohttp"]
    );

    let models = analyze_fixture("models.py");
    assert_eq!(
        models.module.imports,
        vec!["django.db", "django.contrib.auth.models"]
    );
}

// =============================================================================
// Inheritance (models.py has only external bases)
// =============================================================================

#[test]
fn test_models_fixture_inheritance() {
    let analysis = analyze_fixture("models.py");
    let module = &analysis.module;

    let user = module
        .find_declaration("User")
        .and_then(|d| d.as_class())
        .expect("User class");
    assert_eq!(user.bases, vec!["AbstractUser"]);
    assert_eq!(user.edges.len(), 1);
    assert!(!user.edges[0].resolved);

    let post = module
        .find_declaration("Post")
        .and_then(|d| d.as_class())
        .expect("Post class");
    assert_eq!(post.bases, vec!["models.Model"]);
    assert!(!post.edges[0].resolved);

    // nested `class Meta` is not a top-level declaration or a method
    assert!(module.find_declaration("Meta").is_none());
    let method_names: Vec<&str> = post.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(method_names, vec!["get_summary", "__repr__"]);

    // external bases are informational only
    assert!(analysis
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::UnresolvedBase && d.severity == Severity::Info));
    assert_eq!(analysis.diagnostics.len(), 2);
}

#[test]
fn test_local_base_resolution_ignores_declaration_order() {
    let analysis = analyze_module(
        "order.py",
        b"class Derived(Base):\n    pass\n\nclass Base:\n    pass\n",
    );
    let derived = analysis
        .module
        .find_declaration("Derived")
        .and_then(|d| d.as_class())
        .unwrap();
    assert!(derived.edges[0].resolved);
    assert!(analysis.is_clean());
}

// =============================================================================
// Error handling
// =============================================================================

#[test]
fn test_broken_fixture_yields_empty_model() {
    let analysis = analyze_fixture("broken.py");
    assert!(analysis.module.declarations.is_empty());
    assert!(analysis.module.export_list.is_none());
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].kind, DiagnosticKind::SyntaxError);
    assert_eq!(analysis.diagnostics[0].severity, Severity::Error);
    assert!(analysis.has_fatal());
}

#[test]
fn test_batch_isolates_broken_modules() {
    let testdata = testdata_path();
    let files = vec![
        testdata.join("app.py"),
        testdata.join("broken.py"),
        testdata.join("models.py"),
    ];

    let ctx = AnalysisContext::new(&testdata);
    let analyses = ctx.analyze_files_parallel(&files).unwrap();

    // one result per input, sorted by module id
    assert_eq!(analyses.len(), 3);
    let ids: Vec<&str> = analyses.iter().map(|a| a.module.id.as_str()).collect();
    assert_eq!(ids, vec!["app.py", "broken.py", "models.py"]);

    assert!(!analyses[0].has_fatal());
    assert!(analyses[1].has_fatal());
    assert!(!analyses[2].has_fatal());
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_repeated_analysis_is_identical() {
    let testdata = testdata_path();
    let files = vec![
        testdata.join("app.py"),
        testdata.join("broken.py"),
        testdata.join("models.py"),
    ];

    let first = AnalysisContext::new(&testdata)
        .analyze_files(&files)
        .unwrap();
    let second = AnalysisContext::new(&testdata)
        .analyze_files_parallel(&files)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_declarations_in_source_order() {
    let analysis = analyze_fixture("app.py");
    let lines: Vec<usize> = analysis
        .module
        .declarations
        .iter()
        .map(|d| d.span().start_line)
        .collect();
    let mut sorted = lines.clone();
    sorted.sort_unstable();
    assert_eq!(lines, sorted);

    let names: Vec<&str> = analysis
        .module
        .declarations
        .iter()
        .map(|d| d.name())
        .collect();
    assert_eq!(
        names,
        vec![
            "app",
            "logger",
            "UserService",
            "create_app",
            "fetch_external_data",
            "_internal_helper"
        ]
    );
}
