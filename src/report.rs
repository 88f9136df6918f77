//! Output formatting for analysis results.
//!
//! Two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{Diagnostic, ModuleAnalysis, Severity, Visibility};

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub modules_scanned: usize,
    pub errors: usize,
    pub warnings: usize,
    pub modules: Vec<JsonModule>,
}

/// Per-module entry: the symbol model plus its diagnostics.
#[derive(Serialize, Deserialize)]
pub struct JsonModule {
    pub id: String,
    pub public: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    pub declarations: Vec<crate::analysis::Declaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_exports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<JsonDiagnostic>,
}

/// Flattened diagnostic entry.
#[derive(Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub kind: String,
    pub severity: String,
    pub line: usize,
    pub message: String,
}

/// Build the JSON report value from a batch of analyses.
pub fn build_json(path: &str, analyses: &[ModuleAnalysis]) -> JsonReport {
    let errors = count_severity(analyses, Severity::Error);
    let warnings = count_severity(analyses, Severity::Warning);

    let modules = analyses
        .iter()
        .map(|a| JsonModule {
            id: a.module.id.clone(),
            public: a
                .module
                .public_names()
                .into_iter()
                .map(String::from)
                .collect(),
            imports: a.module.imports.clone(),
            declarations: a.module.declarations.clone(),
            exports: a.module.export_list.as_ref().map(|l| l.names.clone()),
            unresolved_exports: a.module.unresolved_exports.clone(),
            diagnostics: a.diagnostics.iter().map(diagnostic_to_json).collect(),
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        modules_scanned: analyses.len(),
        errors,
        warnings,
        modules,
    }
}

/// Write results in JSON format to stdout.
pub fn write_json(path: &str, analyses: &[ModuleAnalysis]) -> anyhow::Result<()> {
    let report = build_json(path, analyses);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

fn diagnostic_to_json(d: &Diagnostic) -> JsonDiagnostic {
    JsonDiagnostic {
        kind: d.kind.as_str().to_string(),
        severity: d.severity.to_string(),
        line: d.line,
        message: d.message.clone(),
    }
}

fn count_severity(analyses: &[ModuleAnalysis], severity: Severity) -> usize {
    analyses
        .iter()
        .map(|a| a.count_by_severity(severity))
        .sum()
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, analyses: &[ModuleAnalysis]) {
    // Header
    println!();
    print!("  ");
    print!("{}", "pysurface".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    println!();

    for analysis in analyses {
        write_module(analysis);
    }

    write_summary(analyses);
    println!();
}

fn write_module(analysis: &ModuleAnalysis) {
    let module = &analysis.module;
    println!("  {}", module.id.blue().bold());

    if module.declarations.is_empty() && analysis.diagnostics.is_empty() {
        println!("    {}", "(no declarations)".dimmed());
        println!();
        return;
    }

    for decl in &module.declarations {
        let marker = match decl.visibility() {
            Some(Visibility::Public) => "+".green(),
            _ => "-".dimmed(),
        };
        print!("    {} ", marker);
        print!("{:<18}", decl.kind().as_str().dimmed());
        print!("{}", decl.name());
        print!("{}", format!(":{}", decl.span().start_line).dimmed());

        if let Some(class) = decl.as_class() {
            if !class.bases.is_empty() {
                print!("{}", format!(" ({})", class.bases.join(", ")).dimmed());
            }
        }
        println!();

        if let Some(class) = decl.as_class() {
            for method in &class.methods {
                let tag = if method.is_async { "async method" } else { "method" };
                print!("        {:<14}", tag.dimmed());
                println!("{}", method.name);
            }
        }
    }

    for diagnostic in &analysis.diagnostics {
        write_severity_tag(diagnostic.severity);
        print!("{:<18}", diagnostic.kind.as_str().dimmed());
        if diagnostic.line > 0 {
            print!("{}", format!(":{}", diagnostic.line).dimmed());
        }
        println!();
        println!("            {}", diagnostic.message);
    }

    println!();
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_summary(analyses: &[ModuleAnalysis]) {
    let errors = count_severity(analyses, Severity::Error);
    let warnings = count_severity(analyses, Severity::Warning);
    let declarations: usize = analyses.iter().map(|a| a.module.declarations.len()).sum();

    print!(
        "  {}",
        format!(
            "{} modules, {} declarations",
            analyses.len(),
            declarations
        )
        .dimmed()
    );

    if errors > 0 {
        print!("  {}", format!("{} error(s)", errors).red());
    }
    if warnings > 0 {
        print!("  {}", format!("{} warning(s)", warnings).yellow());
    }
    if errors == 0 && warnings == 0 {
        print!("  {}", "clean".green());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_module;

    #[test]
    fn test_json_report_counts() {
        let good = analyze_module("a.py", b"def f():\n    pass\n");
        let bad = analyze_module("b.py", b"class Broken(:\n");

        let report = build_json(".", &[good, bad]);
        assert_eq!(report.modules_scanned, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.warnings, 0);
        assert_eq!(report.modules[0].public, vec!["f"]);
        assert_eq!(report.modules[1].diagnostics.len(), 1);
        assert_eq!(report.modules[1].diagnostics[0].kind, "syntax_error");
    }

    #[test]
    fn test_json_report_serializes() {
        let analysis = analyze_module(
            "m.py",
            b"__all__ = ['Service']\n\nclass Service:\n    pass\n",
        );
        let report = build_json(".", &[analysis]);
        let json = serde_json::to_string_pretty(&report).unwrap();

        let parsed: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.modules.len(), 1);
        assert_eq!(
            parsed.modules[0].exports.as_deref(),
            Some(&["Service".to_string()][..])
        );
    }
}
