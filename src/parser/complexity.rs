// Complexity and nesting for a function subtree
//
// Complexity is 1 plus one per branching construct found anywhere under the
// definition, nested definitions included. This is an additive count, not
// McCabe edge counting. Nesting is the deepest stack of branching
// constructs; `elif` arms nest under the arm before them and an `else` arm
// sits at the depth of the last `elif`.

use crate::parser::syntax::{Branch, SyntaxKind};
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// Complexity measurements for one function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    /// 1 + number of branching constructs
    pub score: u32,
    /// Deepest nesting of branching constructs, 0 when there are none
    pub max_nesting: u32,
}

impl Default for Complexity {
    fn default() -> Self {
        Self {
            score: 1,
            max_nesting: 0,
        }
    }
}

/// Measure a function definition node (or its decorated wrapper)
pub fn measure(node: &Node, source: &[u8]) -> Complexity {
    let mut walker = ComplexityWalker {
        source,
        result: Complexity::default(),
    };
    walker.walk(node, 0);
    walker.result
}

struct ComplexityWalker<'src> {
    source: &'src [u8],
    result: Complexity,
}

impl<'src> ComplexityWalker<'src> {
    fn hit(&mut self, depth: u32) {
        self.result.score += 1;
        self.result.max_nesting = self.result.max_nesting.max(depth);
    }

    fn walk(&mut self, node: &Node, depth: u32) {
        match SyntaxKind::of(node) {
            SyntaxKind::Branch(Branch::If) => self.walk_if(node, depth),
            SyntaxKind::Branch(Branch::BoolOp) => {
                self.hit(depth + 1);
                let operator = bool_operator(node, self.source);
                self.walk_bool_chain(node, operator, depth + 1);
            }
            SyntaxKind::Branch(_) => {
                self.hit(depth + 1);
                self.walk_children(node, depth + 1);
            }
            _ => self.walk_children(node, depth),
        }
    }

    fn walk_children(&mut self, node: &Node, depth: u32) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(&child, depth);
        }
    }

    /// `if` / `elif` / `else`: each `elif` is one level deeper than the arm
    /// before it, and `else` belongs to the innermost arm.
    fn walk_if(&mut self, node: &Node, depth: u32) {
        let depth = depth + 1;
        self.hit(depth);

        let mut arm_depth = depth;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match SyntaxKind::of(&child) {
                SyntaxKind::Branch(Branch::Elif) => {
                    arm_depth += 1;
                    self.hit(arm_depth);
                    self.walk_children(&child, arm_depth);
                }
                SyntaxKind::Else => self.walk_children(&child, arm_depth),
                _ => self.walk(&child, depth),
            }
        }
    }

    /// `a and b and c` is one construct; the left operand of a boolean
    /// operator with the same operator continues the chain.
    fn walk_bool_chain(&mut self, node: &Node, operator: Option<&str>, depth: u32) {
        let left_id = node.child_by_field_name("left").map(|n| n.id());
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let continues_chain = Some(child.id()) == left_id
                && SyntaxKind::of(&child) == SyntaxKind::Branch(Branch::BoolOp)
                && bool_operator(&child, self.source) == operator;
            if continues_chain {
                self.walk_bool_chain(&child, operator, depth);
            } else {
                self.walk(&child, depth);
            }
        }
    }
}

fn bool_operator<'src>(node: &Node, source: &'src [u8]) -> Option<&'src str> {
    node.child_by_field_name("operator")
        .and_then(|op| op.utf8_text(source).ok())
}
