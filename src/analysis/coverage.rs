// Docstring coverage aggregation
//
// Rolls per-entity docstring presence into project tallies, a per-file
// breakdown of raw counts, and one issue line per undocumented entity.

use crate::parser::ModuleRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `round(part / whole * 100, 2)`, or exactly 0.0 when `whole` is 0
pub fn coverage_percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let percent = part as f64 / whole as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

/// Documented/total counts for one entity kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub total: usize,
    pub documented: usize,
    pub coverage_percent: f64,
}

impl Tally {
    pub fn new(total: usize, documented: usize) -> Self {
        Self {
            total,
            documented,
            coverage_percent: coverage_percent(documented, total),
        }
    }
}

/// Project-wide coverage for modules, classes, and functions/methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub modules: Tally,
    pub classes: Tally,
    pub functions_and_methods: Tally,
}

impl CoverageSummary {
    /// Compute the summary from a parse pass
    pub fn from_modules(modules: &[ModuleRecord]) -> Self {
        let module_total = modules.len();
        let module_with = modules.iter().filter(|m| m.has_docstring).count();

        let mut class_total = 0;
        let mut class_with = 0;
        let mut func_total = 0;
        let mut func_with = 0;

        for module in modules {
            for class in &module.classes {
                class_total += 1;
                if class.has_docstring {
                    class_with += 1;
                }
            }
            for func in module.all_functions() {
                func_total += 1;
                if func.has_docstring {
                    func_with += 1;
                }
            }
        }

        Self {
            modules: Tally::new(module_total, module_with),
            classes: Tally::new(class_total, class_with),
            functions_and_methods: Tally::new(func_total, func_with),
        }
    }
}

/// Raw per-file counts; consumers compute their own percentages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub has_module_docstring: bool,
    pub num_classes: usize,
    pub num_classes_with_docstrings: usize,
    /// Top-level functions plus methods
    pub num_functions: usize,
    pub num_functions_with_docstrings: usize,
}

impl FileCoverage {
    pub fn from_module(module: &ModuleRecord) -> Self {
        Self {
            has_module_docstring: module.has_docstring,
            num_classes: module.classes.len(),
            num_classes_with_docstrings: module.classes.iter().filter(|c| c.has_docstring).count(),
            num_functions: module.function_count(),
            num_functions_with_docstrings: module.all_functions().filter(|f| f.has_docstring).count(),
        }
    }
}

/// Kind of documentable entity, each with a stable issue code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Module,
    Class,
    Method,
    Function,
}

impl EntityKind {
    /// Issue code consumed by reporting tools
    pub fn code(self) -> &'static str {
        match self {
            EntityKind::Module => "D100",
            EntityKind::Class => "D101",
            EntityKind::Method => "D102",
            EntityKind::Function => "D103",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Module => "public module",
            EntityKind::Class => "public class",
            EntityKind::Method => "public method",
            EntityKind::Function => "public function",
        }
    }
}

/// A missing docstring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDocstring {
    pub path: String,
    pub line: usize,
    pub kind: EntityKind,
    pub name: String,
}

impl fmt::Display for MissingDocstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} Missing docstring in {} '{}'",
            self.path,
            self.line,
            self.kind.code(),
            self.kind.label(),
            self.name
        )
    }
}

/// Every undocumented module, class, method, and function. Per module the
/// order is: module, then each class followed by its methods, then
/// top-level functions.
pub fn missing_docstrings(modules: &[ModuleRecord]) -> Vec<MissingDocstring> {
    let mut missing = Vec::new();

    for module in modules {
        let path = module.path.display().to_string();
        let mut push = |line: usize, kind: EntityKind, name: &str| {
            missing.push(MissingDocstring {
                path: path.clone(),
                line,
                kind,
                name: name.to_string(),
            });
        };

        if !module.has_docstring {
            push(1, EntityKind::Module, &module.module_name);
        }

        for class in &module.classes {
            if !class.has_docstring {
                push(class.line_start, EntityKind::Class, &class.name);
            }
            for method in class.methods.iter().filter(|m| !m.has_docstring) {
                push(method.line_start, EntityKind::Method, &method.name);
            }
        }

        for func in module.functions.iter().filter(|f| !f.has_docstring) {
            push(func.line_start, EntityKind::Function, &func.name);
        }
    }

    missing
}

/// The coverage report handed to reporting collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub summary: CoverageSummary,
    pub per_file: BTreeMap<String, FileCoverage>,
    pub issues: Vec<String>,
}

impl CoverageReport {
    /// Build the report from a parse pass
    pub fn from_modules(modules: &[ModuleRecord]) -> Self {
        let per_file = modules
            .iter()
            .map(|m| (m.path.display().to_string(), FileCoverage::from_module(m)))
            .collect();

        let issues = missing_docstrings(modules)
            .iter()
            .map(ToString::to_string)
            .collect();

        Self {
            summary: CoverageSummary::from_modules(modules),
            per_file,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ClassRecord, FunctionRecord};
    use std::path::PathBuf;

    fn documented(mut func: FunctionRecord) -> FunctionRecord {
        func.has_docstring = true;
        func.docstring = Some("Doc.".to_string());
        func
    }

    fn make_module() -> ModuleRecord {
        let mut module = ModuleRecord::new(PathBuf::from("pkg/shapes.py"), "shapes".to_string());
        module.has_docstring = true;

        let mut class = ClassRecord::new("Circle", 3);
        class.add_method(documented(FunctionRecord::new("__init__", 4)));
        class.add_method(FunctionRecord::new("area", 7));
        module.classes.push(class);

        module.functions.push(documented(FunctionRecord::new("make", 10)));
        module.functions.push(FunctionRecord::new("helper", 14));
        module
    }

    #[test]
    fn test_coverage_percent_zero_total() {
        assert_eq!(coverage_percent(0, 0), 0.0);
    }

    #[test]
    fn test_coverage_percent_rounding() {
        assert_eq!(coverage_percent(1, 2), 50.0);
        assert_eq!(coverage_percent(1, 3), 33.33);
        assert_eq!(coverage_percent(2, 3), 66.67);
        assert_eq!(coverage_percent(3, 3), 100.0);
    }

    #[test]
    fn test_summary_counts() {
        let modules = vec![make_module()];
        let summary = CoverageSummary::from_modules(&modules);

        assert_eq!(summary.modules, Tally::new(1, 1));
        assert_eq!(summary.classes.total, 1);
        assert_eq!(summary.classes.documented, 0);
        assert_eq!(summary.classes.coverage_percent, 0.0);
        assert_eq!(summary.functions_and_methods.total, 4);
        assert_eq!(summary.functions_and_methods.documented, 2);
        assert_eq!(summary.functions_and_methods.coverage_percent, 50.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = CoverageSummary::from_modules(&[]);
        assert_eq!(summary.modules.total, 0);
        assert_eq!(summary.modules.coverage_percent, 0.0);
        assert_eq!(summary.classes.coverage_percent, 0.0);
        assert_eq!(summary.functions_and_methods.coverage_percent, 0.0);
    }

    #[test]
    fn test_failed_module_counts_as_undocumented_module() {
        let failed = ModuleRecord::failed(
            PathBuf::from("bad.py"),
            "bad".to_string(),
            "SyntaxError: invalid syntax (line 1, column 1)",
        );
        let summary = CoverageSummary::from_modules(&[failed]);
        assert_eq!(summary.modules, Tally::new(1, 0));
        assert_eq!(summary.functions_and_methods.total, 0);
    }

    #[test]
    fn test_per_file_raw_counts() {
        let coverage = FileCoverage::from_module(&make_module());
        assert!(coverage.has_module_docstring);
        assert_eq!(coverage.num_classes, 1);
        assert_eq!(coverage.num_classes_with_docstrings, 0);
        assert_eq!(coverage.num_functions, 4);
        assert_eq!(coverage.num_functions_with_docstrings, 2);
    }

    #[test]
    fn test_issue_lines() {
        let mut module = make_module();
        module.has_docstring = false;
        let issues = CoverageReport::from_modules(&[module]).issues;

        assert_eq!(
            issues,
            vec![
                "pkg/shapes.py:1 D100 Missing docstring in public module 'shapes'",
                "pkg/shapes.py:3 D101 Missing docstring in public class 'Circle'",
                "pkg/shapes.py:7 D102 Missing docstring in public method 'area'",
                "pkg/shapes.py:14 D103 Missing docstring in public function 'helper'",
            ]
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            EntityKind::Module.code(),
            EntityKind::Class.code(),
            EntityKind::Method.code(),
            EntityKind::Function.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_eq!(a.len(), 4);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_report_is_idempotent() {
        let modules = vec![make_module()];
        let first = CoverageReport::from_modules(&modules);
        let second = CoverageReport::from_modules(&modules);
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_serializes_contract_fields() {
        let report = CoverageReport::from_modules(&[make_module()]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["summary"]["functions_and_methods"]["coverage_percent"], 50.0);
        assert_eq!(value["per_file"]["pkg/shapes.py"]["num_functions"], 4);
        assert!(value["issues"].is_array());

        let back: CoverageReport = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }
}
