//! Depth-first rewriting of a syntax tree.
//!
//! A [`Walker`] holds at most one visitor per [`NodeKind`]. A visitor receives the node
//! mutably and may edit it in place, or return a replacement. A replacement takes the
//! node's place and is not visited further. Otherwise the walker descends into the
//! node's children, in source order.
//!
//! ```rust
//! # use glsl_parse::{compile, reconstruct, syntax::*, walk::Walker};
//! let nodes = compile("float x = a + b;").unwrap();
//! let nodes = Walker::new()
//!     .on(NodeKind::Variable, |node| {
//!         let Node::Variable(var) = node else { return None };
//!         Some(Variable::from(var.name.to_uppercase()).into())
//!     })
//!     .walk(nodes);
//! assert_eq!(reconstruct(&nodes), "float x = A + B;");
//! ```

use std::collections::HashMap;

use crate::syntax::{Node, NodeKind};

type Visitor<'a> = Box<dyn FnMut(&mut Node) -> Option<Node> + 'a>;

#[derive(Default)]
pub struct Walker<'a> {
    visitors: HashMap<NodeKind, Visitor<'a>>,
}

impl<'a> Walker<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the visitor for `kind`, replacing any previous one.
    pub fn on(mut self, kind: NodeKind, visitor: impl FnMut(&mut Node) -> Option<Node> + 'a) -> Self {
        self.visitors.insert(kind, Box::new(visitor));
        self
    }

    pub fn walk(&mut self, mut nodes: Vec<Node>) -> Vec<Node> {
        self.visit_all(&mut nodes);
        nodes
    }

    pub fn visit(&mut self, node: &mut Node) {
        if let Some(visitor) = self.visitors.get_mut(&node.kind()) {
            if let Some(replacement) = visitor(node) {
                *node = replacement;
                return;
            }
        }
        self.visit_children(node);
    }

    fn visit_all(&mut self, nodes: &mut [Node]) {
        for node in nodes {
            self.visit(node);
        }
    }

    fn visit_children(&mut self, node: &mut Node) {
        match node {
            Node::Precision(_)
            | Node::EmptyStatement(_)
            | Node::Break(_)
            | Node::Float(_)
            | Node::Int(_)
            | Node::Variable(_)
            | Node::Chunk(_) => {}
            Node::VariableDecl(decl) => {
                if let Some(value) = &mut decl.value {
                    self.visit(value);
                }
            }
            Node::VariableAssign(assign) => self.visit(&mut assign.value),
            Node::PropertyAssign(assign) => {
                self.visit(&mut assign.target);
                self.visit(&mut assign.value);
            }
            Node::ExpressionStatement(stmt) => self.visit(&mut stmt.value),
            Node::FunctionDecl(decl) => self.visit_all(&mut decl.body),
            Node::If(stmt) => {
                self.visit(&mut stmt.condition);
                self.visit_all(&mut stmt.body);
                for else_if in &mut stmt.else_ifs {
                    self.visit(&mut else_if.condition);
                    self.visit_all(&mut else_if.body);
                }
                if let Some(body) = &mut stmt.else_body {
                    self.visit_all(body);
                }
            }
            Node::For(stmt) => {
                self.visit(&mut stmt.init);
                self.visit(&mut stmt.check);
                self.visit(&mut stmt.increment);
                self.visit_all(&mut stmt.body);
            }
            Node::Return(stmt) => {
                if let Some(value) = &mut stmt.value {
                    self.visit(value);
                }
            }
            Node::Parenthesized(expr) => self.visit(&mut expr.value),
            Node::Unary(expr) => self.visit(&mut expr.value),
            Node::Call(expr) => {
                self.visit(&mut expr.callee);
                self.visit_all(&mut expr.args);
            }
            Node::Binary(expr) => self.visit_all(&mut expr.operands),
            Node::Property(expr) => self.visit(&mut expr.value),
            Node::Crement(expr) => self.visit(&mut expr.value),
        }
    }
}

/// Walk `nodes` with `walker`, see [`Walker::walk`].
pub fn walk(nodes: Vec<Node>, walker: &mut Walker) -> Vec<Node> {
    walker.walk(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, reconstruct, syntax::*};

    fn names(source: &str) -> Vec<String> {
        let mut seen = Vec::new();
        let nodes = compile(source).unwrap();
        Walker::new()
            .on(NodeKind::Variable, |node| {
                if let Node::Variable(var) = node {
                    seen.push(var.name.clone());
                }
                None
            })
            .walk(nodes);
        seen
    }

    #[test]
    fn source_order() {
        assert_eq!(
            names("void main() { if (a) { b(c); } else if (d) { e = f.g; } else { return h + i; } }"),
            ["a", "b", "c", "d", "f", "h", "i"]
        );
        assert_eq!(
            names("void main() { for (int i = j; k < l; m++) { n; } }"),
            ["j", "k", "l", "m", "n"]
        );
    }

    #[test]
    fn replacements_are_not_visited() {
        let nodes = compile("float x = f(a);").unwrap();
        let mut visited = 0;
        let nodes = Walker::new()
            .on(NodeKind::Call, |_| Some(Chunk::from("g(a)").into()))
            .on(NodeKind::Variable, |_| {
                visited += 1;
                None
            })
            .walk(nodes);
        assert_eq!(visited, 0);
        assert_eq!(reconstruct(&nodes), "float x = g(a);");
    }

    #[test]
    fn edits_in_place_are_visited() {
        let nodes = compile("const float x;").unwrap();
        let mut chunks = 0;
        let nodes = walk(
            nodes,
            &mut Walker::new()
                .on(NodeKind::VariableDecl, |node| {
                    if let Node::VariableDecl(decl) = node {
                        decl.value = Some(Box::new(Chunk::from("3.0").into()));
                    }
                    None
                })
                .on(NodeKind::Chunk, |_| {
                    chunks += 1;
                    None
                }),
        );
        assert_eq!(chunks, 1);
        assert_eq!(reconstruct(&nodes), "const float x = 3.0;");
    }
}
