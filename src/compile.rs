//! Compilation entry point.

use log::{debug, warn};

use crate::error::{CompileError, ParseError};
use crate::limits::Limits;
use crate::parser::{parse, ParseResult};
use crate::signature::{compute_signature, Signature, SignatureKind};

/// Compiles expressions into signatures under fixed [`Limits`].
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    limits: Limits,
}

impl Compiler {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parse an expression without compiling it.
    pub fn parse(&self, expr: &str) -> Result<ParseResult, ParseError> {
        parse(expr, self.limits.max_stack_size())
    }

    /// Compile an expression into its signature.
    ///
    /// Expressions known to be always false (always true) are reported as
    /// [`CompileError::AlwaysFalse`] ([`CompileError::AlwaysTrue`]) when the
    /// corresponding flag is set, and only logged otherwise.
    pub fn compile(
        &self,
        expr: &str,
        throw_on_always_false: bool,
        throw_on_always_true: bool,
    ) -> Result<Signature, CompileError> {
        let parsed = self.parse(expr)?;
        self.compile_parsed(parsed, throw_on_always_false, throw_on_always_true)
    }

    /// Same as [`compile`][Self::compile], for an expression parsed by [`parse`][Self::parse].
    pub fn compile_parsed(
        &self,
        parsed: ParseResult,
        throw_on_always_false: bool,
        throw_on_always_true: bool,
    ) -> Result<Signature, CompileError> {
        let ParseResult { root, mut symbols } = parsed;

        if symbols.len() > self.limits.max_symbols() {
            return Err(CompileError::TooManySymbols {
                count: symbols.len(),
                max: self.limits.max_symbols(),
            });
        }

        let signature = compute_signature(&root, &mut symbols);
        debug!("SIGNATURE: {}", signature);

        match signature.kind() {
            SignatureKind::Contradiction if throw_on_always_false => return Err(CompileError::AlwaysFalse),
            SignatureKind::Contradiction => warn!("Expression is known to be always false: {}", root),
            SignatureKind::Tautology if throw_on_always_true => return Err(CompileError::AlwaysTrue),
            SignatureKind::Tautology => warn!("Expression is known to be always true: {}", root),
            SignatureKind::Table => {}
        }

        Ok(signature)
    }
}

/// Compile with default limits, logging (not failing on) constant expressions.
pub fn compile(expr: &str) -> Result<Signature, CompileError> {
    Compiler::default().compile(expr, false, false)
}
