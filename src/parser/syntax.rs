// Closed classification of tree-sitter-python node kinds
//
// Traversals match on `SyntaxKind` instead of comparing kind strings inline,
// so the set of constructs that affect complexity is one enumerated list.

use tree_sitter::Node;

/// Constructs that add one to complexity and one level of nesting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// `if` statement
    If,
    /// `elif` clause, an `if` nested in the preceding branch's else arm
    Elif,
    /// `for` / `async for`
    For,
    /// `while`
    While,
    /// `with` / `async with`
    With,
    /// `try` with its handlers
    Try,
    /// A chain of `and` / `or` with the same operator
    BoolOp,
    /// `a if cond else b`
    IfExp,
}

/// Node kinds the extractor and complexity analyzer care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Module,
    ClassDef,
    FunctionDef,
    Decorated,
    Block,
    ExpressionStatement,
    String,
    ConcatenatedString,
    Import,
    ImportFrom,
    FutureImport,
    Comment,
    Else,
    /// `print x` / `exec code`: accepted by the grammar, invalid in Python 3
    Python2Statement,
    Branch(Branch),
    Other,
}

impl SyntaxKind {
    /// Classify a node
    pub fn of(node: &Node) -> Self {
        Self::from_kind(node.kind())
    }

    /// Classify a tree-sitter kind name
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "module" => SyntaxKind::Module,
            "class_definition" => SyntaxKind::ClassDef,
            "function_definition" => SyntaxKind::FunctionDef,
            "decorated_definition" => SyntaxKind::Decorated,
            "block" => SyntaxKind::Block,
            "expression_statement" => SyntaxKind::ExpressionStatement,
            "string" => SyntaxKind::String,
            "concatenated_string" => SyntaxKind::ConcatenatedString,
            "import_statement" => SyntaxKind::Import,
            "import_from_statement" => SyntaxKind::ImportFrom,
            "future_import_statement" => SyntaxKind::FutureImport,
            "comment" => SyntaxKind::Comment,
            "else_clause" => SyntaxKind::Else,
            "print_statement" | "exec_statement" => SyntaxKind::Python2Statement,
            "if_statement" => SyntaxKind::Branch(Branch::If),
            "elif_clause" => SyntaxKind::Branch(Branch::Elif),
            "for_statement" => SyntaxKind::Branch(Branch::For),
            "while_statement" => SyntaxKind::Branch(Branch::While),
            "with_statement" => SyntaxKind::Branch(Branch::With),
            "try_statement" => SyntaxKind::Branch(Branch::Try),
            "boolean_operator" => SyntaxKind::Branch(Branch::BoolOp),
            "conditional_expression" => SyntaxKind::Branch(Branch::IfExp),
            _ => SyntaxKind::Other,
        }
    }
}

/// 1-based line where a node starts
pub fn start_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// 1-based line of the last character of a node
pub fn end_line(node: &Node) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row
    } else {
        end.row + 1
    }
}

/// Named children that are statements (comments skipped)
pub fn statements<'tree>(node: &Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    let stmts = node
        .named_children(&mut cursor)
        .filter(|child| SyntaxKind::of(child) != SyntaxKind::Comment)
        .collect();
    stmts
}
