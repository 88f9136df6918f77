//! Batch analysis with content-hash keyed caching.
//!
//! The analyzer core is a pure function of source text, so the context
//! only needs a keyed store around it (absolute path to analysis result),
//! invalidated when a file's content hash changes. Analyzing many modules
//! is embarrassingly parallel: each pipeline owns its tree and builds its
//! own immutable module, so no locking is needed beyond the cache itself.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use super::{analyze_module, ModuleAnalysis};

/// Analysis context for a set of files.
pub struct AnalysisContext {
    /// Base directory for relative module identifiers.
    base_dir: PathBuf,
    /// Cached results, keyed by absolute path.
    cache: RwLock<HashMap<PathBuf, CachedEntry>>,
}

#[derive(Clone)]
struct CachedEntry {
    content_hash: String,
    analysis: ModuleAnalysis,
}

impl AnalysisContext {
    /// Create a new analysis context.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn content_hash(source: &[u8]) -> String {
        hex::encode(Sha256::digest(source))
    }

    /// Analyze a file, reusing the cached result while the content hash
    /// is unchanged.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<ModuleAnalysis> {
        let path = path.as_ref();
        let abs_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };

        let source = fs::read(&abs_path)?;
        let hash = Self::content_hash(&source);

        {
            let cache = self.cache.read().unwrap();
            if let Some(entry) = cache.get(&abs_path) {
                if entry.content_hash == hash {
                    return Ok(entry.analysis.clone());
                }
            }
        }

        let module_id = abs_path
            .strip_prefix(&self.base_dir)
            .unwrap_or(&abs_path)
            .to_string_lossy()
            .replace('\\', "/");
        let analysis = analyze_module(&module_id, &source);

        {
            let mut cache = self.cache.write().unwrap();
            cache.insert(
                abs_path,
                CachedEntry {
                    content_hash: hash,
                    analysis: analysis.clone(),
                },
            );
        }

        Ok(analysis)
    }

    /// Analyze multiple files sequentially.
    ///
    /// Unreadable files are reported and skipped rather than failing the
    /// batch. Results are sorted by module id for deterministic ordering.
    pub fn analyze_files(&self, paths: &[PathBuf]) -> anyhow::Result<Vec<ModuleAnalysis>> {
        let mut all = Vec::new();

        for path in paths {
            match self.analyze_file(path) {
                Ok(analysis) => all.push(analysis),
                Err(e) => {
                    eprintln!("Warning: failed to read {}: {}", path.display(), e);
                }
            }
        }

        all.sort_by(|a, b| a.module.id.cmp(&b.module.id));

        Ok(all)
    }

    /// Analyze multiple files in parallel.
    ///
    /// Uses rayon. Results are sorted by module id, so the output is
    /// identical to the sequential path.
    pub fn analyze_files_parallel(&self, paths: &[PathBuf]) -> anyhow::Result<Vec<ModuleAnalysis>> {
        let results: Vec<_> = paths.par_iter().map(|p| self.analyze_file(p)).collect();

        let mut all = Vec::new();
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(analysis) => all.push(analysis),
                Err(e) => {
                    eprintln!("Warning: failed to read {}: {}", path.display(), e);
                }
            }
        }

        all.sort_by(|a, b| a.module.id.cmp(&b.module.id));

        Ok(all)
    }

    /// Module identifiers currently held in the cache, sorted.
    pub fn analyzed_modules(&self) -> Vec<String> {
        let cache = self.cache.read().unwrap();
        let mut ids: Vec<_> = cache
            .values()
            .map(|e| e.analysis.module.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write().unwrap();
        cache.clear();
    }
}
