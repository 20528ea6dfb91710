// Analysis module: directory walking and the reports built from a parse pass

pub mod coverage;
pub mod metrics;
pub mod suggest;
pub mod validate;

pub use coverage::*;
pub use metrics::*;
pub use suggest::*;
pub use validate::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::{ModuleRecord, PythonParser};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Dependency and tooling directories never descended into
pub const EXCLUDED_DIRS: &[&str] = &[
    ".venv",
    "venv",
    "__pycache__",
    ".git",
    "node_modules",
    ".tox",
    ".eggs",
    "site-packages",
];

/// Result of analyzing a codebase
#[derive(Debug)]
pub struct AnalysisResult {
    /// One record per discovered file, failures included
    pub modules: Vec<ModuleRecord>,
    /// Docstring coverage
    pub report: CoverageReport,
    /// Complexity metrics
    pub metrics: ProjectMetrics,
}

impl AnalysisResult {
    /// Records of files that failed to read or parse
    pub fn failed_modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.iter().filter(|m| m.is_failed())
    }
}

/// Main analyzer that orchestrates the analysis pipeline
pub struct Analyzer {
    parser: PythonParser,
    exclude: Vec<glob::Pattern>,
    verbose: bool,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let parser = PythonParser::new()?;
        let exclude = config
            .analysis
            .exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            parser,
            exclude,
            verbose: false,
        })
    }

    /// Create analyzer with verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Analyze a file or directory
    pub fn analyze(&mut self, root: &Path) -> Result<AnalysisResult> {
        let modules = self.parse_all(root)?;
        let report = CoverageReport::from_modules(&modules);
        let metrics = ProjectMetrics::from_modules(&modules);

        Ok(AnalysisResult {
            modules,
            report,
            metrics,
        })
    }

    /// Parse every discovered file into a ModuleRecord. Only a missing root
    /// is an error; per-file failures are recorded on the file's record.
    pub fn parse_all(&mut self, root: &Path) -> Result<Vec<ModuleRecord>> {
        let files = self.discover_files(root)?;
        let walk_root = root.is_dir();

        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| Error::other(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-");
            pb.set_style(style);
            Some(pb)
        } else {
            None
        };

        let mut modules = Vec::with_capacity(files.len());
        for path in &files {
            if let Some(ref pb) = progress {
                let msg = path.file_name().unwrap_or_default().to_string_lossy().to_string();
                pb.set_message(msg);
                pb.inc(1);
            }

            let mut module = self.parser.parse_file(path);
            if walk_root {
                module.module_name = dotted_module_name(path, root);
            }
            modules.push(module);
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Parsing complete");
        }

        debug!(
            "Parsed {} files ({} failed)",
            modules.len(),
            modules.iter().filter(|m| m.is_failed()).count()
        );
        Ok(modules)
    }

    /// Discover all Python files under `root`, sorted
    pub fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_excluded_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "py") {
                continue;
            }
            if self.should_exclude(path, root) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Check if a path matches any configured exclude pattern
    fn should_exclude(&self, path: &Path, root: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| EXCLUDED_DIRS.contains(&name))
}

/// Convert a file path to a dotted module name relative to `root`
fn dotted_module_name(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut parts: Vec<&str> = relative.iter().filter_map(|s| s.to_str()).collect();

    if let Some(last) = parts.last_mut() {
        *last = last.trim_end_matches(".py");
    }

    if parts.last() == Some(&"__init__") && parts.len() > 1 {
        parts.pop();
    }

    parts.join(".")
}
