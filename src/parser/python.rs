// Python parser using tree-sitter
//
// Produces exactly one ModuleRecord per file. Read failures and syntax errors
// become the record's parse error; a failed file carries no other facts.

use crate::error::{Error, Result};
use crate::parser::complexity;
use crate::parser::records::*;
use crate::parser::syntax::{self, SyntaxKind};
use std::path::{Path, PathBuf};
use tracing::debug;
use tree_sitter::{Node, Parser};

/// Parser for Python source files
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse a Python file. Never fails: unreadable or invalid files yield a
    /// record with a single parse error.
    pub fn parse_file(&mut self, path: &Path) -> ModuleRecord {
        match std::fs::read_to_string(path) {
            Ok(source) => self.parse_source(&source, path),
            Err(e) => {
                let err = Error::file_access(path, &e);
                debug!("Cannot read {}: {}", path.display(), err);
                ModuleRecord::failed(path.to_path_buf(), path_to_module_name(path), err.to_string())
            }
        }
    }

    /// Parse Python source text that was read from `path`
    pub fn parse_source(&mut self, source: &str, path: &Path) -> ModuleRecord {
        let module_name = path_to_module_name(path);
        match self.extract(source, path.to_path_buf(), module_name.clone()) {
            Ok(module) => module,
            Err(e) => {
                debug!("Failed to parse {}: {}", path.display(), e);
                ModuleRecord::failed(path.to_path_buf(), module_name, e.to_string())
            }
        }
    }

    fn extract(&mut self, source: &str, path: PathBuf, module_name: String) -> Result<ModuleRecord> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse source"))?;

        let root = tree.root_node();
        if let Some(err) = syntax_error(&root) {
            return Err(err);
        }

        let src = source.as_bytes();
        let mut module = ModuleRecord::new(path, module_name);

        if let Some(doc) = leading_docstring(&root, src) {
            module.has_docstring = true;
            module.docstring = Some(doc.text);
        }

        collect_imports(&root, src, &mut module.imports);

        for stmt in syntax::statements(&root) {
            match definition_of(&stmt) {
                Some(def) if SyntaxKind::of(&def) == SyntaxKind::ClassDef => {
                    if let Some(class) = parse_class(&def, src) {
                        module.classes.push(class);
                    }
                }
                Some(def) => {
                    if let Some(func) = parse_function(&def, &stmt, src, false) {
                        module.functions.push(func);
                    }
                }
                None => {}
            }
        }

        Ok(module)
    }
}

/// Unwrap a possibly decorated class or function definition
fn definition_of<'tree>(node: &Node<'tree>) -> Option<Node<'tree>> {
    match SyntaxKind::of(node) {
        SyntaxKind::ClassDef | SyntaxKind::FunctionDef => Some(*node),
        SyntaxKind::Decorated => node.child_by_field_name("definition").filter(|def| {
            matches!(SyntaxKind::of(def), SyntaxKind::ClassDef | SyntaxKind::FunctionDef)
        }),
        _ => None,
    }
}

/// Syntax error at the first ERROR or MISSING node, or at the first
/// Python 2 statement the grammar still accepts
fn syntax_error(root: &Node) -> Option<Error> {
    let Some(node) = first_error(root) else {
        return root.has_error().then(|| Error::syntax("invalid syntax", 1, 1));
    };

    let pos = node.start_position();
    let message = if SyntaxKind::of(&node) == SyntaxKind::Python2Statement {
        let keyword = node.kind().trim_end_matches("_statement");
        format!("Missing parentheses in call to '{}'", keyword)
    } else if node.is_missing() {
        format!("expected '{}'", node.kind())
    } else {
        "invalid syntax".to_string()
    };
    Some(Error::syntax(message, pos.row + 1, pos.column + 1))
}

fn first_error<'tree>(node: &Node<'tree>) -> Option<Node<'tree>> {
    if node.is_error() || node.is_missing() || SyntaxKind::of(node) == SyntaxKind::Python2Statement {
        return Some(*node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
    children.iter().find_map(first_error)
}

/// A docstring literal found as the first statement of a body
struct Docstring {
    text: String,
    span: LineSpan,
}

/// Docstring of a module or block: the first statement, if it is a bare
/// string literal
fn leading_docstring(body: &Node, source: &[u8]) -> Option<Docstring> {
    let first = syntax::statements(body).into_iter().next()?;
    if SyntaxKind::of(&first) != SyntaxKind::ExpressionStatement || first.named_child_count() != 1 {
        return None;
    }
    let expr = first.named_child(0)?;
    let text = string_literal_text(&expr, source)?;
    Some(Docstring {
        text,
        span: LineSpan::new(
            syntax::start_line(&first),
            syntax::end_line(&first),
            first.end_position().column,
        ),
    })
}

/// Content of a plain string literal between its quotes, verbatim.
/// f-strings and byte strings are not documentation.
fn string_literal_text(node: &Node, source: &[u8]) -> Option<String> {
    match SyntaxKind::of(node) {
        SyntaxKind::String => {
            let text = node.utf8_text(source).ok()?;
            let quote_at = text.find(['"', '\''])?;
            let prefix = text[..quote_at].to_ascii_lowercase();
            if prefix.contains('f') || prefix.contains('b') {
                return None;
            }
            let quoted = &text[quote_at..];
            let delim = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
                3
            } else {
                1
            };
            if quoted.len() < delim * 2 {
                return None;
            }
            Some(quoted[delim..quoted.len() - delim].to_string())
        }
        SyntaxKind::ConcatenatedString => {
            let mut cursor = node.walk();
            let parts: Option<Vec<String>> = node
                .named_children(&mut cursor)
                .filter(|part| SyntaxKind::of(part) != SyntaxKind::Comment)
                .map(|part| string_literal_text(&part, source))
                .collect();
            parts.map(|p| p.concat())
        }
        _ => None,
    }
}

/// Collect imports from the whole tree in document order
fn collect_imports(node: &Node, source: &[u8], imports: &mut Vec<String>) {
    match SyntaxKind::of(node) {
        SyntaxKind::Import => {
            imports.extend(imported_names(node, source));
        }
        SyntaxKind::ImportFrom => {
            let module = node
                .child_by_field_name("module_name")
                .map(|m| from_module(&m, source))
                .unwrap_or_default();
            let mut names = imported_names(node, source);
            if has_wildcard(node) {
                names.push("*".to_string());
            }
            imports.extend(names.into_iter().map(|name| qualify(&module, &name)));
        }
        SyntaxKind::FutureImport => {
            imports.extend(
                imported_names(node, source)
                    .into_iter()
                    .map(|name| qualify("__future__", &name)),
            );
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_imports(&child, source, imports);
            }
        }
    }
}

/// Names bound by the `name` fields of an import statement (aliases dropped)
fn imported_names(node: &Node, source: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    let names = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|name| {
            let target = if name.kind() == "aliased_import" {
                name.child_by_field_name("name")?
            } else {
                name
            };
            dotted_text(&target, source)
        })
        .collect();
    names
}

fn has_wildcard(node: &Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import");
    found
}

/// Module part of `from X import ...`; leading dots are not part of it
fn from_module(node: &Node, source: &[u8]) -> String {
    if node.kind() == "relative_import" {
        let mut cursor = node.walk();
        let dotted = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "dotted_name");
        dotted.and_then(|d| dotted_text(&d, source)).unwrap_or_default()
    } else {
        dotted_text(node, source).unwrap_or_default()
    }
}

fn dotted_text(node: &Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;
    Some(text.chars().filter(|c| !c.is_whitespace()).collect())
}

fn qualify(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", module, name)
    }
}

/// Parse a class definition; only directly nested functions become methods
fn parse_class(node: &Node, source: &[u8]) -> Option<ClassRecord> {
    let name = node.child_by_field_name("name")?.utf8_text(source).ok()?;
    let mut class = ClassRecord::new(name, syntax::start_line(node));

    if let Some(body) = node.child_by_field_name("body") {
        let (body_line, line_end) = body_lines(&body, node);
        class.body_line = body_line;
        class.line_end = line_end;

        if let Some(doc) = leading_docstring(&body, source) {
            class.has_docstring = true;
            class.docstring = Some(doc.text);
            class.docstring_span = Some(doc.span);
        }

        for stmt in syntax::statements(&body) {
            let def = match definition_of(&stmt) {
                Some(def) if SyntaxKind::of(&def) == SyntaxKind::FunctionDef => def,
                _ => continue,
            };
            if let Some(method) = parse_function(&def, &stmt, source, true) {
                class.add_method(method);
            }
        }
    }

    Some(class)
}

/// Parse a function definition. `outer` is the decorated wrapper when
/// present; complexity covers decorators, defaults and annotations too.
fn parse_function(node: &Node, outer: &Node, source: &[u8], is_method: bool) -> Option<FunctionRecord> {
    let name = node.child_by_field_name("name")?.utf8_text(source).ok()?;
    let mut func = FunctionRecord::new(name, syntax::start_line(node));
    func.is_method = is_method;

    if let Some(params) = node.child_by_field_name("parameters") {
        func.parameters = parse_parameters(&params, source, is_method);
    }

    if let Some(ret) = node.child_by_field_name("return_type") {
        func.return_type = Some(ret.utf8_text(source).ok()?.to_string());
    }

    if let Some(body) = node.child_by_field_name("body") {
        let (body_line, line_end) = body_lines(&body, node);
        func.body_line = body_line;
        func.line_end = line_end;

        if let Some(doc) = leading_docstring(&body, source) {
            func.has_docstring = true;
            func.docstring = Some(doc.text);
            func.docstring_span = Some(doc.span);
        }
    }

    let measured = complexity::measure(outer, source);
    func.complexity = measured.score;
    func.max_nesting = measured.max_nesting;

    Some(func)
}

/// (first body statement line, last body statement line); both fall back to
/// the definition line when the body has no statements
fn body_lines(body: &Node, def: &Node) -> (usize, usize) {
    let stmts = syntax::statements(body);
    let start = syntax::start_line(def);
    let first = stmts.first().map(|s| syntax::start_line(s)).unwrap_or(start);
    let last = stmts.last().map(|s| syntax::end_line(s)).unwrap_or(start);
    (first, last)
}

/// Parameter names in declaration order. A method's leading `self`/`cls`
/// is implicit and skipped.
///
/// Every named kind is included: positional-only, regular, `*args`,
/// keyword-only and `**kwargs` (bare names, no stars). Tools that list only
/// regular positional arguments will report fewer names, so generated
/// `Args:` sections here also describe `args`, `kwargs` and keyword-only
/// parameters.
fn parse_parameters(node: &Node, source: &[u8], is_method: bool) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        let name = match child.kind() {
            "identifier" => child.utf8_text(source).ok().map(str::to_string),
            "default_parameter" | "typed_default_parameter" => child
                .child_by_field_name("name")
                .filter(|n| n.kind() == "identifier")
                .and_then(|n| n.utf8_text(source).ok())
                .map(str::to_string),
            "typed_parameter" => child.named_child(0).and_then(|n| splat_or_name(&n, source)),
            "list_splat_pattern" | "dictionary_splat_pattern" => splat_or_name(&child, source),
            _ => None,
        };
        if let Some(name) = name {
            names.push(name);
        }
    }

    if is_method && matches!(names.first().map(String::as_str), Some("self") | Some("cls")) {
        names.remove(0);
    }

    names
}

/// Name of an identifier or of the identifier inside `*x` / `**x`
fn splat_or_name(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" => node.utf8_text(source).ok().map(str::to_string),
        "list_splat_pattern" | "dictionary_splat_pattern" => {
            let inner = node.named_child(0)?;
            if inner.kind() == "identifier" {
                inner.utf8_text(source).ok().map(str::to_string)
            } else {
                None
            }
        }
        _ => None,
    }
}
