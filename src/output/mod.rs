// Output generation module

pub mod templates;

pub use templates::*;

use crate::analysis::{AnalysisResult, CoverageReport, SuggestionSet, Tally};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::parser::ModuleRecord;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// The saved scan result: coverage report plus docstring suggestions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanOutput {
    pub coverage_report: CoverageReport,
    pub docstring_suggestions: SuggestionSet,
}

impl ScanOutput {
    pub fn new(result: &AnalysisResult, suggestions: Option<SuggestionSet>) -> Self {
        Self {
            coverage_report: result.report.clone(),
            docstring_suggestions: suggestions.unwrap_or_default(),
        }
    }
}

/// A file that could not be read or parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub path: String,
    pub message: String,
}

impl ParseFailure {
    /// One entry per parse error, in walk order
    pub fn collect(modules: &[ModuleRecord]) -> Vec<Self> {
        modules
            .iter()
            .flat_map(|m| {
                m.parse_errors.iter().map(move |e| ParseFailure {
                    path: m.path.display().to_string(),
                    message: e.clone(),
                })
            })
            .collect()
    }
}

/// Render a scan in the requested format
pub fn render(
    output: &ScanOutput,
    failures: &[ParseFailure],
    format: OutputFormat,
    project_name: &str,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)? + "\n"),
        OutputFormat::Markdown => TemplateEngine::new()?.render_report(output, failures, project_name),
        OutputFormat::Text => Ok(render_text(output, failures, project_name)),
    }
}

/// Plain text: summary, parse errors, then one line per issue
pub fn render_text(output: &ScanOutput, failures: &[ParseFailure], project_name: &str) -> String {
    let summary = &output.coverage_report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "Docstring coverage for {}", project_name);
    let _ = writeln!(out, "  {:<24}{}", "Modules:", tally_line(&summary.modules));
    let _ = writeln!(out, "  {:<24}{}", "Classes:", tally_line(&summary.classes));
    let _ = writeln!(
        out,
        "  {:<24}{}",
        "Functions and methods:",
        tally_line(&summary.functions_and_methods)
    );

    if !failures.is_empty() {
        out.push_str("\nParse errors:\n");
        for failure in failures {
            let _ = writeln!(out, "  {}: {}", failure.path, failure.message);
        }
    }

    let issues = &output.coverage_report.issues;
    if !issues.is_empty() {
        out.push('\n');
        for issue in issues {
            out.push_str(issue);
            out.push('\n');
        }
    }

    out
}

fn tally_line(tally: &Tally) -> String {
    format!(
        "{}/{} ({:.2}%)",
        tally.documented, tally.total, tally.coverage_percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FunctionRecord;
    use std::path::PathBuf;

    fn sample() -> (ScanOutput, Vec<ParseFailure>) {
        let mut module = ModuleRecord::new(PathBuf::from("calc.py"), "calc".to_string());
        module.has_docstring = true;
        let mut add = FunctionRecord::new("add", 3);
        add.has_docstring = true;
        module.functions.push(add);
        module.functions.push(FunctionRecord::new("sub", 7));
        let broken = ModuleRecord::failed(
            PathBuf::from("broken.py"),
            "broken".to_string(),
            "SyntaxError: invalid syntax (line 1, column 8)",
        );
        let modules = vec![module, broken];

        let output = ScanOutput {
            coverage_report: CoverageReport::from_modules(&modules),
            docstring_suggestions: SuggestionSet::new(),
        };
        (output, ParseFailure::collect(&modules))
    }

    #[test]
    fn test_collect_failures() {
        let (_, failures) = sample();
        assert_eq!(
            failures,
            vec![ParseFailure {
                path: "broken.py".to_string(),
                message: "SyntaxError: invalid syntax (line 1, column 8)".to_string(),
            }]
        );
    }

    #[test]
    fn test_render_text() {
        let (output, failures) = sample();
        let text = render_text(&output, &failures, "Calc");

        assert!(text.starts_with("Docstring coverage for Calc\n"));
        assert!(text.contains("  Modules:                1/2 (50.00%)\n"));
        assert!(text.contains("  Functions and methods:  1/2 (50.00%)\n"));
        assert!(text.contains("Parse errors:\n  broken.py: SyntaxError"));
        assert!(text.contains("\ncalc.py:7 D103 Missing docstring in public function 'sub'\n"));
        assert!(text.ends_with("broken.py:1 D100 Missing docstring in public module 'broken'\n"));
    }

    #[test]
    fn test_render_json_shape() {
        let (output, failures) = sample();
        let json = render(&output, &failures, OutputFormat::Json, "Calc").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value["coverage_report"]["summary"]["functions_and_methods"]["coverage_percent"],
            50.0
        );
        assert!(value["docstring_suggestions"].as_object().unwrap().is_empty());

        let back: ScanOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }

    #[test]
    fn test_render_markdown() {
        let (output, failures) = sample();
        let md = render(&output, &failures, OutputFormat::Markdown, "Calc").unwrap();
        assert!(md.contains("# Calc docstring coverage"));
        assert!(md.contains("## Parse errors"));
    }
}
