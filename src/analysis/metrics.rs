// Metrics calculation for code analysis
//
// Calculates per-file and project-wide complexity metrics:
// - Complexity and max nesting per function and method
// - Average and maximum complexity per file
// - Maintainability index (100 - avg complexity * 10, floored at 0)
// - Project ranking of functions by complexity

use crate::parser::{FunctionRecord, ModuleRecord};
use serde::{Deserialize, Serialize};

/// Metrics for a single function or method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub name: String,
    /// `Class.method` for methods
    pub qualified_name: String,
    pub line: usize,
    pub complexity: u32,
    pub max_nesting: u32,
}

impl FunctionMetrics {
    pub fn from_record(func: &FunctionRecord) -> Self {
        Self {
            name: func.name.clone(),
            qualified_name: func.qualified_name(),
            line: func.line_start,
            complexity: func.complexity,
            max_nesting: func.max_nesting,
        }
    }
}

/// Metrics for a single file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    /// File path as discovered
    pub path: String,
    /// Top-level functions then methods
    pub functions: Vec<FunctionMetrics>,
    /// Mean complexity, 0.0 without functions
    pub avg_complexity: f64,
    /// Highest complexity, 0 without functions
    pub max_complexity: u32,
    /// `None` when the file has no functions
    pub maintainability_index: Option<f64>,
}

impl FileMetrics {
    /// Calculate metrics from a parsed module
    pub fn from_module(module: &ModuleRecord) -> Self {
        let functions: Vec<FunctionMetrics> = module
            .all_functions()
            .map(FunctionMetrics::from_record)
            .collect();

        let avg_complexity = average_complexity(&functions);
        let max_complexity = functions.iter().map(|f| f.complexity).max().unwrap_or(0);
        let maintainability_index = if functions.is_empty() {
            None
        } else {
            Some(maintainability_index(avg_complexity))
        };

        Self {
            path: module.path.display().to_string(),
            functions,
            avg_complexity,
            max_complexity,
            maintainability_index,
        }
    }
}

/// `max(0, 100 - avg * 10)` rounded to one decimal
pub fn maintainability_index(avg_complexity: f64) -> f64 {
    let index = (100.0 - avg_complexity * 10.0).max(0.0);
    (index * 10.0).round() / 10.0
}

fn average_complexity(functions: &[FunctionMetrics]) -> f64 {
    if functions.is_empty() {
        return 0.0;
    }
    let total: u32 = functions.iter().map(|f| f.complexity).sum();
    total as f64 / functions.len() as f64
}

/// A function ranked in the project view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedFunction {
    pub path: String,
    #[serde(flatten)]
    pub metrics: FunctionMetrics,
}

/// Project-wide metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    /// Total files analyzed
    pub file_count: usize,
    /// Total functions and methods
    pub function_count: usize,
    /// Mean complexity over every function
    pub avg_complexity: f64,
    /// Per-file breakdown in walk order
    pub files: Vec<FileMetrics>,
    /// Every function, most complex first
    pub ranked: Vec<RankedFunction>,
}

impl ProjectMetrics {
    /// Calculate project-wide metrics from a parse pass
    pub fn from_modules(modules: &[ModuleRecord]) -> Self {
        let files: Vec<FileMetrics> = modules.iter().map(FileMetrics::from_module).collect();

        let mut ranked: Vec<RankedFunction> = files
            .iter()
            .flat_map(|file| {
                file.functions.iter().map(move |f| RankedFunction {
                    path: file.path.clone(),
                    metrics: f.clone(),
                })
            })
            .collect();
        // Stable sort keeps walk order among equals
        ranked.sort_by(|a, b| b.metrics.complexity.cmp(&a.metrics.complexity));

        let function_count = ranked.len();
        let avg_complexity = if function_count == 0 {
            0.0
        } else {
            let total: u32 = ranked.iter().map(|r| r.metrics.complexity).sum();
            total as f64 / function_count as f64
        };

        Self {
            file_count: files.len(),
            function_count,
            avg_complexity,
            files,
            ranked,
        }
    }

    /// The `n` most complex functions
    pub fn top(&self, n: usize) -> &[RankedFunction] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}
