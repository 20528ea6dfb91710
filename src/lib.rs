//! docsight - Measure and improve docstring coverage in Python codebases
//!
//! Parses Python sources with tree-sitter into per-file fact records,
//! then derives coverage reports, style validation, complexity metrics
//! and boilerplate docstring suggestions from them.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod writeback;

// Re-export main types
pub use analysis::{AnalysisResult, Analyzer, CoverageReport, DocStyle, ValidationResult};
pub use config::Config;
pub use error::{Error, Result};
pub use output::ScanOutput;
pub use parser::{ClassRecord, FunctionRecord, ModuleRecord, PythonParser};
pub use writeback::{DocTarget, DocstringWriter, LineSplicer};
