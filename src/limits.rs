//! Resource limits supplied by the host.

use crate::error::LimitsError;

/// Hard cap on distinct literals: bits in a mask cell minus one.
pub const MAX_SYMBOLS_CAP: usize = u32::BITS as usize - 1;

/// Smallest allowed value for [`Limits::max_symbols`].
pub const MIN_SYMBOLS: usize = 2;

/// Resource limits for compiling one expression.
///
/// Exceeding a limit is reported as a resource error, never retried.
/// Values are only set through [`Limits::new`], so `max_symbols` always lies
/// in `2..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_symbols: usize,
    max_stack_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_symbols: 16,
            max_stack_size: 256,
        }
    }
}

impl Limits {
    /// Create limits with custom values.
    pub fn new(max_symbols: usize, max_stack_size: usize) -> Result<Self, LimitsError> {
        if !(MIN_SYMBOLS..=MAX_SYMBOLS_CAP).contains(&max_symbols) {
            return Err(LimitsError::MaxSymbolsOutOfRange {
                value: max_symbols,
                min: MIN_SYMBOLS,
                max: MAX_SYMBOLS_CAP,
            });
        }
        Ok(Self {
            max_symbols,
            max_stack_size,
        })
    }

    /// Maximum number of distinct integers in an expression.
    pub fn max_symbols(&self) -> usize {
        self.max_symbols
    }

    /// Maximum depth of each parser stack and of the expression tree.
    pub fn max_stack_size(&self) -> usize {
        self.max_stack_size
    }

    /// The largest limits allowed.
    pub fn permissive() -> Self {
        Self {
            max_symbols: MAX_SYMBOLS_CAP,
            max_stack_size: 4096,
        }
    }
}
