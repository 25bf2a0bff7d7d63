//! Token/node kinds and their static metadata.
//!
//! Every kind carries its spelling(s), a display name, and, for operators,
//! the precedence, associativity and arity used by the shunting-yard parser.
//!
//! ```text
//! kind     chars      name      prec  assoc  arity
//! Or       |          or        1     left   binary
//! Xor      ^          xor       2     left   binary   (feature "xor")
//! And      &          and       3     left   binary
//! Not      !          not       4     right  unary
//! ```
//!
//! Literals start with a non-zero digit; the rest of the literal (which may
//! contain zeros) is consumed by the numeric parser.

use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// Sentinel for unclassified characters.
    Invalid,
    Or,
    Xor,
    And,
    Not,
    LParen,
    RParen,
    Literal,
    Ignorable,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Assoc {
    None,
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Arity {
    None,
    Unary,
    Binary,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Invalid,
        NodeKind::Or,
        NodeKind::Xor,
        NodeKind::And,
        NodeKind::Not,
        NodeKind::LParen,
        NodeKind::RParen,
        NodeKind::Literal,
        NodeKind::Ignorable,
    ];

    /// Characters classified as this kind.
    pub fn characters(self) -> &'static str {
        match self {
            NodeKind::Invalid => "",
            NodeKind::Or => "|",
            NodeKind::Xor if cfg!(feature = "xor") => "^",
            NodeKind::Xor => "",
            NodeKind::And => "&",
            NodeKind::Not => "!",
            NodeKind::LParen => "(",
            NodeKind::RParen => ")",
            NodeKind::Literal => "123456789",
            NodeKind::Ignorable => " ",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Invalid => "<invalid>",
            NodeKind::Or => "or",
            NodeKind::Xor => "xor",
            NodeKind::And => "and",
            NodeKind::Not => "not",
            NodeKind::LParen => "(",
            NodeKind::RParen => ")",
            NodeKind::Literal => "<symbol>",
            NodeKind::Ignorable => "<ignorables>",
        }
    }

    /// Binding strength; higher binds tighter. Zero for non-operators.
    pub fn precedence(self) -> u8 {
        match self {
            NodeKind::Or => 1,
            NodeKind::Xor => 2,
            NodeKind::And => 3,
            NodeKind::Not => 4,
            _ => 0,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            NodeKind::Or | NodeKind::Xor | NodeKind::And => Assoc::Left,
            NodeKind::Not => Assoc::Right,
            _ => Assoc::None,
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            NodeKind::Or | NodeKind::Xor | NodeKind::And => Arity::Binary,
            NodeKind::Not => Arity::Unary,
            _ => Arity::None,
        }
    }

    pub fn is_operator(self) -> bool {
        self.arity() != Arity::None
    }

    /// Whether an operator already on the stack (`self`) must be reduced
    /// before pushing `incoming`.
    pub fn yields_to(self, incoming: NodeKind) -> bool {
        self.is_operator()
            && (incoming.precedence() < self.precedence()
                || (incoming.assoc() == Assoc::Left && incoming.precedence() == self.precedence()))
    }

    /// Combine operand values.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not an operator, or if `rhs` does not match the arity.
    pub fn apply(self, lhs: bool, rhs: Option<bool>) -> bool {
        match (self, rhs) {
            (NodeKind::Or, Some(rhs)) => lhs || rhs,
            (NodeKind::Xor, Some(rhs)) => lhs ^ rhs,
            (NodeKind::And, Some(rhs)) => lhs && rhs,
            (NodeKind::Not, None) => !lhs,
            _ => panic!("Cannot apply {} to {:?}", self.name(), (lhs, rhs)),
        }
    }

    /// Classify an input byte.
    pub fn classify(byte: u8) -> NodeKind {
        classes()[byte as usize]
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Character classification table, built on first use.
fn classes() -> &'static [NodeKind; 256] {
    static CLASSES: OnceLock<[NodeKind; 256]> = OnceLock::new();
    CLASSES.get_or_init(|| {
        let mut table = [NodeKind::Invalid; 256];
        for kind in NodeKind::ALL {
            for c in kind.characters().bytes() {
                table[c as usize] = kind;
            }
        }
        table
    })
}
