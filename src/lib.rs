//! # qint-rs: Truth-table signatures for integer queries
//!
//! **`qint-rs`** compiles small boolean expressions over integer literals into a
//! **canonical signature**: an opaque byte string that lists the literals used
//! and the truth value of the expression for every combination of them being
//! present or absent.
//!
//! ## Why signatures?
//!
//! Two expressions that are logically equivalent over the same literals
//! compile to *byte-identical* signatures. A host (e.g. a database indexing
//! sets of integers) can therefore test equivalence by comparing bytes, and
//! test membership of a set without re-parsing the expression.
//!
//! ## Grammar
//!
//! | Operator | Name | Precedence | Associativity |
//! |----------|------|------------|---------------|
//! | `\|`     | or   | 1          | left          |
//! | `^`      | xor  | 2          | left (feature `xor`) |
//! | `&`      | and  | 3          | left          |
//! | `!`      | not  | 4          | right, unary  |
//!
//! Literals are decimal integers without leading zeros, parentheses group,
//! and spaces are ignored.
//!
//! ## Basic Usage
//!
//! ```rust
//! use qint_rs::compile::Compiler;
//! use qint_rs::limits::Limits;
//! use qint_rs::signature::SignatureKind;
//!
//! let compiler = Compiler::new(Limits::default());
//!
//! let a = compiler.compile("1 & (2 | 3)", false, false).unwrap();
//! let b = compiler.compile("(1 & 2) | (1 & 3)", false, false).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.literals(), vec![1, 2, 3]);
//!
//! // Membership without the expression:
//! assert!(a.matches(&[1, 3]));
//! assert!(!a.matches(&[2, 3]));
//!
//! // Constant expressions collapse.
//! let t = compiler.compile("7 | !7", false, false).unwrap();
//! assert_eq!(t.kind(), SignatureKind::Tautology);
//! assert_eq!(t.as_bytes(), &[0, 0, 0, 0, 0xFF]);
//! ```
//!
//! ## Core Components
//!
//! - **[`parser`]**: Shunting-yard parser building a [`tree::Node`] and the symbol table.
//! - **[`signature`]**: Bit assignment, truth table enumeration and the [`Signature`] format.
//! - **[`table`]**: The ordered hash table backing the symbol table.
//! - **[`compile`]**: The [`Compiler`] entry point and its policy for constant expressions.

pub mod compile;
pub mod error;
pub mod limits;
pub mod node;
pub mod parsenum;
pub mod parser;
pub mod signature;
pub mod stack;
pub mod table;
pub mod tree;
pub mod utils;

pub use compile::{compile, Compiler};
pub use error::{CompileError, LimitsError, ParseError, SignatureError};
pub use limits::Limits;
pub use signature::{Signature, SignatureKind};
