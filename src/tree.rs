//! Expression tree produced by the parser.

use std::cell::Cell;
use std::fmt::{Display, Formatter, Write};
use std::rc::Rc;

use crate::node::{Arity, NodeKind};

/// Bit mask of a literal, shared by every node referencing the same value.
///
/// The mask is zero until the truth-table compiler assigns bit positions.
pub type MaskCell = Rc<Cell<u32>>;

#[derive(Debug, Clone)]
pub enum Node {
    /// Operator application. Unary operators only have a left child.
    Op {
        kind: NodeKind,
        offset: usize,
        /// Height of this subtree, literals counting as 1.
        depth: usize,
        left: Box<Node>,
        right: Option<Box<Node>>,
    },
    /// Integer literal.
    Literal { value: u32, offset: usize, mask: MaskCell },
}

impl Node {
    pub fn literal(value: u32, offset: usize, mask: MaskCell) -> Self {
        Node::Literal { value, offset, mask }
    }

    /// # Panics
    ///
    /// Panics if `kind` is not a unary operator.
    pub fn unary(kind: NodeKind, offset: usize, operand: Node) -> Self {
        assert_eq!(kind.arity(), Arity::Unary, "{} is not unary", kind);
        Node::Op {
            kind,
            offset,
            depth: operand.depth() + 1,
            left: Box::new(operand),
            right: None,
        }
    }

    /// # Panics
    ///
    /// Panics if `kind` is not a binary operator.
    pub fn binary(kind: NodeKind, offset: usize, lhs: Node, rhs: Node) -> Self {
        assert_eq!(kind.arity(), Arity::Binary, "{} is not binary", kind);
        Node::Op {
            kind,
            offset,
            depth: lhs.depth().max(rhs.depth()) + 1,
            left: Box::new(lhs),
            right: Some(Box::new(rhs)),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Op { kind, .. } => *kind,
            Node::Literal { .. } => NodeKind::Literal,
        }
    }

    /// Byte offset of the token in the source expression.
    pub fn offset(&self) -> usize {
        match self {
            Node::Op { offset, .. } | Node::Literal { offset, .. } => *offset,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Op { depth, .. } => *depth,
            Node::Literal { .. } => 1,
        }
    }

    /// Evaluate for one truth-table row: a literal is true iff its mask bit is set in `row`.
    pub fn eval(&self, row: u32) -> bool {
        match self {
            Node::Literal { mask, .. } => row & mask.get() != 0,
            Node::Op { kind, left, right, .. } => {
                let lhs = left.eval(row);
                let rhs = right.as_ref().map(|right| right.eval(row));
                kind.apply(lhs, rhs)
            }
        }
    }

    /// Render the tree in-order, one node per line, children indented by four spaces.
    pub fn pretty(&self) -> String {
        let mut s = String::new();
        self.pretty_into(&mut s, 0);
        s
    }

    fn pretty_into(&self, s: &mut String, depth: usize) {
        match self {
            Node::Literal { value, .. } => {
                let _ = writeln!(s, "{:indent$}{}", "", value, indent = depth * 4);
            }
            Node::Op { kind, left, right, .. } => {
                left.pretty_into(s, depth + 1);
                let _ = writeln!(s, "{:indent$}{}", "", kind.name(), indent = depth * 4);
                if let Some(right) = right {
                    right.pretty_into(s, depth + 1);
                }
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Literal { value, .. } => write!(f, "{}", value),
            Node::Op { kind, left, right: None, .. } => write!(f, "{}{}", kind.characters(), left),
            Node::Op {
                kind,
                left,
                right: Some(right),
                ..
            } => write!(f, "({} {} {})", left, kind.characters(), right),
        }
    }
}
