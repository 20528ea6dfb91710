// Docstring style validation
//
// Checks a function's docstring for the structural marker its expected style
// requires. The Google check is context-insensitive: a missing Args section
// is flagged even for functions without parameters.

use crate::parser::{FunctionRecord, ModuleRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Docstring conventions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocStyle {
    #[default]
    Google,
    Numpy,
    Rest,
}

impl DocStyle {
    /// Parse a style name case-insensitively, falling back to Google
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "google" => DocStyle::Google,
            "numpy" => DocStyle::Numpy,
            "rest" => DocStyle::Rest,
            other => {
                debug!(style = other, "Unrecognized docstring style, using google");
                DocStyle::Google
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocStyle::Google => "google",
            DocStyle::Numpy => "numpy",
            DocStyle::Rest => "rest",
        }
    }
}

impl From<String> for DocStyle {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<DocStyle> for String {
    fn from(style: DocStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for DocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one docstring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NEEDS_FIX")]
    NeedsFix,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("OK"),
            Status::NeedsFix => f.write_str("NEEDS_FIX"),
        }
    }
}

pub const MISSING_DOCSTRING: &str = "Missing docstring";
const VALID_REASON: &str = "Docstring valid";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: Status,
    /// First issue, or "Docstring valid" when there are none
    pub reason: String,
    pub issues: Vec<String>,
}

impl ValidationResult {
    fn from_issues(issues: Vec<String>) -> Self {
        let (status, reason) = match issues.first() {
            Some(first) => (Status::NeedsFix, first.clone()),
            None => (Status::Ok, VALID_REASON.to_string()),
        };
        Self {
            status,
            reason,
            issues,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Validate a function's docstring against the expected style
pub fn validate(func: &FunctionRecord, style: DocStyle) -> ValidationResult {
    let text = match func.docstring.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return ValidationResult::from_issues(vec![MISSING_DOCSTRING.to_string()]),
    };

    let mut issues = Vec::new();
    match style {
        DocStyle::Google => {
            if !text.contains("Args:") && !text.contains("Arguments:") {
                issues.push("Not Google style (missing Args section)".to_string());
            }
        }
        DocStyle::Numpy => {
            if !text.contains("Parameters") {
                issues.push("Not NumPy style (missing Parameters section)".to_string());
            }
        }
        DocStyle::Rest => {
            if !text.contains(":param") {
                issues.push("Not reST style (missing :param)".to_string());
            }
        }
    }

    ValidationResult::from_issues(issues)
}

/// Validation outcome for one function of a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionValidation {
    pub qualified_name: String,
    pub line: usize,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Validate every function and method of a module in report order
pub fn validate_module(module: &ModuleRecord, style: DocStyle) -> Vec<FunctionValidation> {
    module
        .all_functions()
        .map(|func| FunctionValidation {
            qualified_name: func.qualified_name(),
            line: func.line_start,
            result: validate(func, style),
        })
        .collect()
}
