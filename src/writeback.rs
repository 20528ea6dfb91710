// Docstring write-back seam
//
// The analysis core only reports where documentation lives. Writers take a
// `DocTarget` and replacement text and splice it into source; `LineSplicer`
// does this on in-memory lines and never touches the filesystem.

use crate::error::{Error, Result};
use crate::parser::{ClassRecord, FunctionRecord, LineSpan};

/// Location of a definition's documentation block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocTarget {
    /// Line of the `def` / `class` keyword
    pub def_line: usize,
    /// Line of the first body statement
    pub body_line: usize,
    /// Lines of the existing docstring literal
    pub docstring_span: Option<LineSpan>,
}

impl From<&FunctionRecord> for DocTarget {
    fn from(func: &FunctionRecord) -> Self {
        Self {
            def_line: func.line_start,
            body_line: func.body_line,
            docstring_span: func.docstring_span,
        }
    }
}

impl From<&ClassRecord> for DocTarget {
    fn from(class: &ClassRecord) -> Self {
        Self {
            def_line: class.line_start,
            body_line: class.body_line,
            docstring_span: class.docstring_span,
        }
    }
}

/// Writes docstring text into source at a target
pub trait DocstringWriter {
    fn apply(&mut self, target: &DocTarget, text: &str) -> Result<()>;
}

/// In-memory line splicer over one source file.
///
/// Every edit shifts the lines below it, so targets from a single parse pass
/// must be applied bottom-up.
#[derive(Debug, Clone)]
pub struct LineSplicer {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl LineSplicer {
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.lines().map(String::from).collect(),
            trailing_newline: source.ends_with('\n'),
        }
    }

    /// The edited source text
    pub fn source(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    fn line(&self, line: usize) -> Result<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
            .ok_or_else(|| Error::write_back(format!("line {} is out of range", line)))
    }
}

impl DocstringWriter for LineSplicer {
    fn apply(&mut self, target: &DocTarget, text: &str) -> Result<()> {
        if target.body_line <= target.def_line {
            return Err(Error::write_back(format!(
                "body of the definition on line {} shares its line",
                target.def_line
            )));
        }

        // Code after the old literal on its last line (`; x = 1`, a comment)
        // is carried over onto the new block's last line
        let (start, end, tail) = match target.docstring_span {
            Some(span) => {
                let last = self.line(span.end)?;
                let tail = last.get(span.end_column..).unwrap_or_default().to_string();
                (span.start, span.end, tail)
            }
            None => (target.body_line, target.body_line - 1, String::new()),
        };
        let indent = leading_whitespace(self.line(start)?).to_string();

        let mut block = quote_block(text, &indent);
        if !tail.trim().is_empty() {
            if let Some(last) = block.last_mut() {
                last.push_str(&tail);
            }
        }
        self.lines.splice(start - 1..end, block);
        Ok(())
    }
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Render `text` as a non-raw triple-quoted block at `indent`. Backslashes
/// and embedded `"""` are escaped; text ending in a quote gets its closing
/// delimiter on a line of its own.
fn quote_block(text: &str, indent: &str) -> Vec<String> {
    let text = text
        .trim()
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"");
    let mut lines: Vec<&str> = text.lines().collect();

    if lines.len() <= 1 && !text.ends_with('"') {
        return vec![format!("{indent}\"\"\"{text}\"\"\"")];
    }

    let first = lines.remove(0);
    let mut block = vec![format!("{indent}\"\"\"{first}")];
    for line in lines {
        if line.trim().is_empty() {
            block.push(String::new());
        } else {
            block.push(format!("{indent}{line}"));
        }
    }
    block.push(format!("{indent}\"\"\""));
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PythonParser;
    use std::path::Path;

    fn parse(source: &str) -> crate::parser::ModuleRecord {
        let mut parser = PythonParser::new().unwrap();
        parser.parse_source(source, Path::new("edit.py"))
    }

    #[test]
    fn test_insert_single_line() {
        let source = "def add(a, b):\n    return a + b\n";
        let module = parse(source);
        let target = DocTarget::from(&module.functions[0]);
        assert_eq!(target.body_line, 2);
        assert_eq!(target.docstring_span, None);

        let mut splicer = LineSplicer::new(source);
        splicer.apply(&target, "Add two numbers.").unwrap();
        assert_eq!(
            splicer.source(),
            "def add(a, b):\n    \"\"\"Add two numbers.\"\"\"\n    return a + b\n"
        );
    }

    #[test]
    fn test_insert_multi_line_into_method() {
        let source = "class Acc:\n    def total(self, xs):\n        return sum(xs)\n";
        let module = parse(source);
        let method = &module.classes[0].methods[0];

        let mut splicer = LineSplicer::new(source);
        splicer
            .apply(&method.into(), "Sum values.\n\nArgs:\n    xs (Any): Values.")
            .unwrap();

        let edited = splicer.source();
        assert_eq!(
            edited,
            "class Acc:\n    def total(self, xs):\n        \"\"\"Sum values.\n\n        Args:\n            xs (Any): Values.\n        \"\"\"\n        return sum(xs)\n"
        );

        let reparsed = parse(&edited);
        let method = &reparsed.classes[0].methods[0];
        assert!(method.has_docstring);
        assert_eq!(method.line_end, 8);
    }

    #[test]
    fn test_replace_existing_docstring() {
        let source = "def f(x):\n    \"\"\"Old.\n\n    Still old.\n    \"\"\"\n    return x\n";
        let module = parse(source);
        let target = DocTarget::from(&module.functions[0]);
        assert_eq!(target.docstring_span, Some(LineSpan::new(2, 5, 7)));

        let mut splicer = LineSplicer::new(source);
        splicer.apply(&target, "New.").unwrap();
        assert_eq!(splicer.source(), "def f(x):\n    \"\"\"New.\"\"\"\n    return x\n");

        let reparsed = parse(&splicer.source());
        assert_eq!(reparsed.functions[0].docstring.as_deref(), Some("New."));
    }

    #[test]
    fn test_class_target() {
        let source = "class Point:\n    x = 0\n";
        let module = parse(source);
        let mut splicer = LineSplicer::new(source);
        splicer.apply(&(&module.classes[0]).into(), "Point class.").unwrap();
        assert_eq!(splicer.source(), "class Point:\n    \"\"\"Point class.\"\"\"\n    x = 0\n");
    }

    #[test]
    fn test_rejects_body_on_definition_line() {
        let source = "def f(): return 1\n";
        let module = parse(source);
        let mut splicer = LineSplicer::new(source);
        let err = splicer
            .apply(&DocTarget::from(&module.functions[0]), "Doc.")
            .unwrap_err();
        assert!(matches!(err, Error::WriteBack(_)));
        assert_eq!(splicer.source(), source);
    }

    #[test]
    fn test_out_of_range_target() {
        let mut splicer = LineSplicer::new("x = 1\n");
        let target = DocTarget {
            def_line: 3,
            body_line: 4,
            docstring_span: None,
        };
        assert!(splicer.apply(&target, "Doc.").is_err());
    }

    #[test]
    fn test_bottom_up_edits() {
        let source = "def a():\n    pass\n\ndef b():\n    pass\n";
        let module = parse(source);
        let mut splicer = LineSplicer::new(source);
        for func in module.functions.iter().rev() {
            splicer.apply(&func.into(), &format!("{} function.", func.name)).unwrap();
        }

        let reparsed = parse(&splicer.source());
        assert!(reparsed.functions.iter().all(|f| f.has_docstring));
        assert_eq!(reparsed.functions[1].docstring.as_deref(), Some("b function."));
    }

    #[test]
    fn test_embedded_quotes_are_escaped() {
        let block = quote_block("Say \"\"\"hi\"\"\".", "");
        assert_eq!(block, vec!["\"\"\"Say \\\"\\\"\\\"hi\\\"\\\"\\\".\"\"\""]);
    }

    #[test]
    fn test_replace_keeps_code_after_docstring() {
        let source = "def f(x):\n    \"\"\"Old.\"\"\"; y = x\n    return y\n";
        let module = parse(source);
        let target = DocTarget::from(&module.functions[0]);
        assert_eq!(target.docstring_span, Some(LineSpan::new(2, 2, 14)));

        let mut splicer = LineSplicer::new(source);
        splicer.apply(&target, "New.").unwrap();
        let edited = splicer.source();
        assert_eq!(edited, "def f(x):\n    \"\"\"New.\"\"\"; y = x\n    return y\n");

        let reparsed = parse(&edited);
        assert!(reparsed.parse_errors.is_empty());
        assert_eq!(reparsed.functions[0].docstring.as_deref(), Some("New."));
    }

    #[test]
    fn test_replace_multi_line_keeps_trailing_comment() {
        let source = "def f():\n    '''Old.\n    '''  # keep\n    return 1\n";
        let module = parse(source);
        let mut splicer = LineSplicer::new(source);
        splicer
            .apply(&DocTarget::from(&module.functions[0]), "New.\n\nMore.")
            .unwrap();
        assert_eq!(
            splicer.source(),
            "def f():\n    \"\"\"New.\n\n    More.\n    \"\"\"  # keep\n    return 1\n"
        );
    }

    #[test]
    fn test_text_ending_in_quote_reparses() {
        let source = "def f(x):\n    return x\n";
        let module = parse(source);
        let mut splicer = LineSplicer::new(source);
        splicer
            .apply(&DocTarget::from(&module.functions[0]), "Return \"x\"")
            .unwrap();

        let edited = splicer.source();
        assert_eq!(
            edited,
            "def f(x):\n    \"\"\"Return \"x\"\n    \"\"\"\n    return x\n"
        );
        let reparsed = parse(&edited);
        assert!(reparsed.parse_errors.is_empty());
        assert!(reparsed.functions[0]
            .docstring
            .as_deref()
            .unwrap()
            .starts_with("Return \"x\""));
    }

    #[test]
    fn test_backslashes_are_escaped() {
        let block = quote_block("Match \\d+ digits.", "    ");
        assert_eq!(block, vec!["    \"\"\"Match \\\\d+ digits.\"\"\"".to_string()]);

        let source = "def f(s):\n    return s\n";
        let module = parse(source);
        let mut splicer = LineSplicer::new(source);
        splicer
            .apply(&DocTarget::from(&module.functions[0]), "Match \\d+ digits.")
            .unwrap();
        let reparsed = parse(&splicer.source());
        assert!(reparsed.parse_errors.is_empty());
        assert_eq!(
            reparsed.functions[0].docstring.as_deref(),
            Some("Match \\\\d+ digits.")
        );
    }
}
