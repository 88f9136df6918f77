//! Command-line interface for pysurface.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analysis::{AnalysisContext, Severity};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never worth descending into.
const SKIP_DIRS: &[&str] = &[
    "__pycache__",
    "node_modules",
    "venv",
    ".venv",
    "site-packages",
    "build",
    "dist",
];

/// Static structural analyzer for Python codebases.
///
/// Pysurface parses Python sources and reports each module's declared
/// surface: classes, functions, methods, and module attributes, with
/// visibility resolved from `__all__` or naming convention, plus
/// docstrings, decorators, parameters, and inheritance edges.
#[derive(Parser)]
#[command(name = "pysurface")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze files and report the full symbol model
    Scan(ScanArgs),
    /// List only the public names of each module
    #[command(visible_alias = "public")]
    Api(ApiArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Analyze files sequentially instead of in parallel
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for the api command.
#[derive(Parser)]
pub struct ApiArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,
}

/// Collect Python files under a root, sorted for deterministic order.
fn collect_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            // The scan root is always entered, whatever its name.
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories
            if e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            if e.file_type().is_dir() && SKIP_DIRS.contains(&name.as_ref()) {
                return false;
            }
            true
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let ext = entry.path().extension().and_then(|e| e.to_str());
            if ext == Some("py") {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}

fn resolve_inputs(path: &Path) -> anyhow::Result<(PathBuf, Vec<PathBuf>)> {
    let abs_path = path.canonicalize()?;
    let metadata = std::fs::metadata(&abs_path)?;

    if metadata.is_dir() {
        let files = collect_files(&abs_path)?;
        Ok((abs_path, files))
    } else {
        let base = abs_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| abs_path.clone());
        Ok((base, vec![abs_path]))
    }
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let (base, files) = match resolve_inputs(&args.path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    if files.is_empty() {
        eprintln!("Warning: no Python files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let ctx = AnalysisContext::new(&base);
    let analyses = if args.sequential {
        ctx.analyze_files(&files)?
    } else {
        ctx.analyze_files_parallel(&files)?
    };

    let path_str = args.path.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&path_str, &analyses)?,
        _ => report::write_pretty(&path_str, &analyses),
    }

    let has_errors = analyses
        .iter()
        .any(|a| a.count_by_severity(Severity::Error) > 0);

    if has_errors {
        Ok(EXIT_FINDINGS)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the api command.
pub fn run_api(args: &ApiArgs) -> anyhow::Result<i32> {
    let (base, files) = match resolve_inputs(&args.path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    if files.is_empty() {
        eprintln!("Warning: no Python files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let ctx = AnalysisContext::new(&base);
    let analyses = ctx.analyze_files_parallel(&files)?;

    for analysis in &analyses {
        println!("{}", analysis.module.id);
        for name in analysis.module.public_names() {
            println!("  {}", name);
        }
    }

    let has_errors = analyses
        .iter()
        .any(|a| a.count_by_severity(Severity::Error) > 0);

    if has_errors {
        Ok(EXIT_FINDINGS)
    } else {
        Ok(EXIT_SUCCESS)
    }
}
