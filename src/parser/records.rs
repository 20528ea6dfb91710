// Fact records extracted from parsed Python files
//
// One ModuleRecord is produced per source file per parse pass. Records are
// plain data: they are built once by the extractor and never mutated after.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Inclusive 1-based line range of a literal, plus the byte column just
/// past its closing quote on the last line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
    pub end_column: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize, end_column: usize) -> Self {
        Self {
            start,
            end,
            end_column,
        }
    }
}

/// A parsed Python file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleRecord {
    /// File path as discovered
    pub path: PathBuf,
    /// Module name derived from path
    pub module_name: String,
    /// Whether the module has a docstring
    pub has_docstring: bool,
    /// Raw module docstring text
    pub docstring: Option<String>,
    /// Fully qualified imported names
    pub imports: Vec<String>,
    /// Read or syntax errors; non-empty means no facts were extracted
    pub parse_errors: Vec<String>,
    /// Top-level classes in source order
    pub classes: Vec<ClassRecord>,
    /// Top-level functions in source order
    pub functions: Vec<FunctionRecord>,
}

impl ModuleRecord {
    /// Create an empty record for a path
    pub fn new(path: PathBuf, module_name: String) -> Self {
        Self {
            path,
            module_name,
            has_docstring: false,
            docstring: None,
            imports: Vec::new(),
            parse_errors: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Create a record for a file that could not be read or parsed
    pub fn failed(path: PathBuf, module_name: String, error: impl Into<String>) -> Self {
        let mut record = Self::new(path, module_name);
        record.parse_errors.push(error.into());
        record
    }

    /// Whether the file failed to read or parse
    pub fn is_failed(&self) -> bool {
        !self.parse_errors.is_empty()
    }

    /// Top-level functions followed by every class's methods
    pub fn all_functions(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.functions
            .iter()
            .chain(self.classes.iter().flat_map(|c| c.methods.iter()))
    }

    /// Number of top-level functions plus methods
    pub fn function_count(&self) -> usize {
        self.functions.len() + self.classes.iter().map(|c| c.methods.len()).sum::<usize>()
    }
}

/// A class definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassRecord {
    /// Class name
    pub name: String,
    /// Line of the `class` keyword
    pub line_start: usize,
    /// Line of the last body statement
    pub line_end: usize,
    /// Line of the first body statement
    pub body_line: usize,
    pub has_docstring: bool,
    pub docstring: Option<String>,
    pub docstring_span: Option<LineSpan>,
    /// Directly nested methods in source order
    pub methods: Vec<FunctionRecord>,
}

impl ClassRecord {
    pub fn new(name: &str, line_start: usize) -> Self {
        Self {
            name: name.to_string(),
            line_start,
            line_end: line_start,
            body_line: line_start,
            has_docstring: false,
            docstring: None,
            docstring_span: None,
            methods: Vec::new(),
        }
    }

    /// Attach a method, binding it to this class
    pub fn add_method(&mut self, mut method: FunctionRecord) {
        method.is_method = true;
        method.class_name = Some(self.name.clone());
        self.methods.push(method);
    }
}

/// A function or method definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionRecord {
    /// Function name
    pub name: String,
    /// Line of the `def` keyword
    pub line_start: usize,
    /// Line of the last body statement
    pub line_end: usize,
    /// Line of the first body statement
    pub body_line: usize,
    pub has_docstring: bool,
    /// Docstring content between the quotes, verbatim
    pub docstring: Option<String>,
    pub docstring_span: Option<LineSpan>,
    /// Parameter names in declaration order
    pub parameters: Vec<String>,
    /// Return annotation as written
    pub return_type: Option<String>,
    /// Additive branch count, starting at 1
    pub complexity: u32,
    /// Deepest nesting of branching constructs
    pub max_nesting: u32,
    pub is_method: bool,
    /// Owning class for methods
    pub class_name: Option<String>,
}

impl FunctionRecord {
    pub fn new(name: &str, line_start: usize) -> Self {
        Self {
            name: name.to_string(),
            line_start,
            line_end: line_start,
            body_line: line_start,
            has_docstring: false,
            docstring: None,
            docstring_span: None,
            parameters: Vec::new(),
            return_type: None,
            complexity: 1,
            max_nesting: 0,
            is_method: false,
            class_name: None,
        }
    }

    /// `Class.method` for methods, the bare name otherwise
    pub fn qualified_name(&self) -> String {
        match &self.class_name {
            Some(class) => format!("{}.{}", class, self.name),
            None => self.name.clone(),
        }
    }

}

/// Convert a file path to a module name: the stem, or the package
/// directory for `__init__.py`
pub fn path_to_module_name(path: &Path) -> String {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    if stem == "__init__" {
        path.parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| stem.to_string())
    } else {
        stem.to_string()
    }
}
