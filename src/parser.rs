//! Shunting-yard parser.
//!
//! Tokens are recognised one byte at a time through the character
//! classification table of [`NodeKind::classify`]. Two bounded stacks drive
//! the algorithm:
//!
//! - the *operator* stack holds operators and open parentheses awaiting
//!   their operands,
//! - the *output* stack holds finished subtrees.
//!
//! "Reducing" an operator pops it, pops one (unary) or two (binary) subtrees
//! from the output stack, and pushes the combined subtree back. The height of
//! a reduced subtree is bounded by the stack size as well: a long chain such
//! as `1|1|1|...` never fills either stack but still nests one level per
//! operator.
//!
//! Integer literals are interned into an ordered [symbol table][SymbolTable]
//! keyed directly by their value; all nodes of the same value share one
//! [mask cell][MaskCell].

use log::debug;

use crate::error::ParseError;
use crate::node::{Arity, NodeKind};
use crate::parsenum::parse_u32;
use crate::stack::Stack;
use crate::table::OrderedTable;
use crate::tree::{MaskCell, Node};

/// Distinct literal values of an expression, in ascending order.
pub type SymbolTable = OrderedTable<u32, MaskCell>;

/// A successfully parsed expression: the tree and its literals.
#[derive(Debug)]
pub struct ParseResult {
    pub root: Node,
    pub symbols: SymbolTable,
}

/// Operator or parenthesis waiting on the operator stack.
#[derive(Debug, Copy, Clone)]
struct Pending {
    kind: NodeKind,
    offset: usize,
}

fn discard_node(node: Node) {
    debug!("DISCARD(output) {}", node);
}

fn discard_operator(op: Pending) {
    debug!("DISCARD(operators) {} at {}", op.kind, op.offset);
}

struct Parser<'a> {
    expr: &'a str,
    output: Stack<Node>,
    operators: Stack<Pending>,
    symbols: SymbolTable,
    max_stack_size: usize,
}

/// Parse an expression, with each stack holding at most `max_stack_size`
/// elements and the tree at most `max_stack_size` levels deep.
pub fn parse(expr: &str, max_stack_size: usize) -> Result<ParseResult, ParseError> {
    debug!("EXPR is >{}<", expr);
    Parser {
        expr,
        output: Stack::bounded(max_stack_size).with_dtor(discard_node),
        operators: Stack::bounded(max_stack_size).with_dtor(discard_operator),
        symbols: SymbolTable::direct(),
        max_stack_size,
    }
    .run()
}

impl Parser<'_> {
    fn run(mut self) -> Result<ParseResult, ParseError> {
        let expr = self.expr;
        let bytes = expr.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            let kind = NodeKind::classify(bytes[pos]);
            match kind {
                NodeKind::Invalid => {
                    let ch = expr[pos..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                    return Err(ParseError::InvalidCharacter { ch, offset: pos });
                }
                NodeKind::Ignorable => {
                    pos += 1;
                }
                NodeKind::LParen => {
                    self.push_operator(Pending { kind, offset: pos })?;
                    pos += 1;
                }
                NodeKind::RParen => {
                    // e.g. missing lvalue: '|)', missing rvalue: '3&)'
                    loop {
                        match self.operators.pop() {
                            None => return Err(ParseError::UnmatchedClose { offset: pos }),
                            Some(op) if op.kind == NodeKind::LParen => {
                                debug!("POP(operators) (");
                                break;
                            }
                            Some(op) => self.reduce(op)?,
                        }
                    }
                    pos += 1;
                }
                NodeKind::Or | NodeKind::Xor | NodeKind::And | NodeKind::Not => {
                    // Unary operators bind to what follows: nothing to reduce yet.
                    if kind.arity() == Arity::Binary {
                        // e.g. missing lvalue: '&&', missing rvalue: '1&&'
                        while let Some(&top) = self.operators.top() {
                            if !top.kind.yields_to(kind) {
                                break;
                            }
                            self.operators.pop();
                            self.reduce(top)?;
                        }
                    }
                    self.push_operator(Pending { kind, offset: pos })?;
                    pos += 1;
                }
                NodeKind::Literal => {
                    pos += self.parse_literal(pos)?;
                }
            }
        }

        // e.g. missing lvalue: '1|(&3)', missing rvalue: '(1|3)&(2)|'
        while let Some(op) = self.operators.pop() {
            if op.kind == NodeKind::LParen {
                return Err(ParseError::UnmatchedOpen { offset: op.offset });
            }
            self.reduce(op)?;
        }

        let root = self.output.pop().ok_or(ParseError::EmptyExpression)?;
        debug!("POP(output) {}", root.kind());
        if let Some(next) = self.output.top() {
            // e.g. '3 4'
            return Err(ParseError::RemainingElement { offset: next.offset() });
        }

        Ok(ParseResult {
            root,
            symbols: self.symbols,
        })
    }

    fn push_operator(&mut self, op: Pending) -> Result<(), ParseError> {
        debug!("PUSH(operators) {}", op.kind);
        self.operators.push(op).map_err(|_| ParseError::StackOverflow {
            stack: "operators",
            limit: self.max_stack_size,
        })
    }

    fn push_output(&mut self, node: Node) -> Result<(), ParseError> {
        debug!("PUSH(output) {}", node.kind());
        self.output.push(node).map_err(|_| ParseError::StackOverflow {
            stack: "output",
            limit: self.max_stack_size,
        })
    }

    /// Apply an operator (already popped) to the subtrees on top of the output stack.
    fn reduce(&mut self, op: Pending) -> Result<(), ParseError> {
        debug!("POP(operators) {}", op.kind);
        let operand = self
            .output
            .pop()
            .ok_or(ParseError::LvalueExpected { offset: op.offset })?;
        let node = match op.kind.arity() {
            Arity::Binary => {
                let lhs = self
                    .output
                    .pop()
                    .ok_or(ParseError::RvalueExpected { offset: op.offset })?;
                Node::binary(op.kind, op.offset, lhs, operand)
            }
            _ => Node::unary(op.kind, op.offset, operand),
        };
        if node.depth() > self.max_stack_size {
            return Err(ParseError::TooDeep {
                offset: op.offset,
                limit: self.max_stack_size,
            });
        }
        self.push_output(node)
    }

    /// Read the literal starting at `pos`, intern it, and return the number of bytes consumed.
    fn parse_literal(&mut self, pos: usize) -> Result<usize, ParseError> {
        let parsed = parse_u32(&self.expr.as_bytes()[pos..]);
        match parsed.error {
            Some(source) if !parsed.is_number() => {
                return Err(ParseError::InvalidNumber { offset: pos, source });
            }
            _ => {}
        }
        let value = parsed.value;
        debug!("SYMBOL: {}", value);

        let mask = match self.symbols.direct_get(value) {
            Some(mask) => mask.clone(),
            None => {
                let mask = MaskCell::default();
                self.symbols.direct_put(value, mask.clone());
                mask
            }
        };
        self.push_output(Node::literal(value, pos, mask))?;

        Ok(parsed.consumed)
    }
}
