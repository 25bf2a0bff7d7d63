//! Truth-table compilation and the signature byte format.
//!
//! ```text
//! [u32 BE count n][n × u32 BE literal, ascending][ceil(2^n / 8) bytes bitmap]
//! [0, 0, 0, 0][0xFF]      always true
//! [0, 0, 0, 0][0x00]      always false
//! ```
//!
//! Literal bit positions are assigned in descending key order: the largest
//! literal gets bit 0. Row `i` of the truth table is stored in byte `i / 8`
//! under mask `1 << (i % 8)`.

use std::fmt::{Debug, Display, Formatter};

use log::debug;

use crate::error::SignatureError;
use crate::limits::MAX_SYMBOLS_CAP;
use crate::parser::SymbolTable;
use crate::table::Visit;
use crate::tree::Node;

pub const HEADER_LEN: usize = 4;
pub const LITERAL_LEN: usize = 4;

/// Collapse marker of an always-true expression.
pub const MARKER_TRUE: u8 = 0xFF;
/// Collapse marker of an always-false expression.
pub const MARKER_FALSE: u8 = 0x00;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SignatureKind {
    /// True for every combination of literals.
    Tautology,
    /// False for every combination of literals.
    Contradiction,
    /// Literal list and truth table.
    Table,
}

/// Number of bitmap bytes for `n` literals.
pub fn bitmap_len(n: usize) -> usize {
    ((1u64 << n).div_ceil(8)) as usize
}

/// Assign bit positions to the literals and enumerate the truth table of `root`.
///
/// # Panics
///
/// Panics if the table holds more than [`MAX_SYMBOLS_CAP`] literals.
pub fn compute_signature(root: &Node, symbols: &mut SymbolTable) -> Signature {
    let n = symbols.len();
    assert!(n <= MAX_SYMBOLS_CAP, "{} literals do not fit in a mask cell", n);

    let mut bit = 0u32;
    symbols.foreach_reverse(|value, mask| {
        debug!("BIT: {} -> {}", value, bit);
        mask.set(1 << bit);
        bit += 1;
        Visit::CONTINUE
    });

    let rows = 1u64 << n;
    let mut bitmap = vec![0u8; bitmap_len(n)];
    let mut all_true = true;
    let mut all_false = true;
    for row in 0..rows {
        if root.eval(row as u32) {
            bitmap[(row / 8) as usize] |= 1 << (row % 8);
            all_false = false;
        } else {
            all_true = false;
        }
    }
    debug!(
        "TRUTH TABLE: {} literals, {} rows, always true = {}, always false = {}",
        n, rows, all_true, all_false
    );

    if all_true {
        return Signature::tautology();
    }
    if all_false {
        return Signature::contradiction();
    }

    let mut bytes = Vec::with_capacity(HEADER_LEN + n * LITERAL_LEN + bitmap.len());
    bytes.extend_from_slice(&(n as u32).to_be_bytes());
    for (value, _) in symbols.iter() {
        bytes.extend_from_slice(&value.to_be_bytes());
    }
    bytes.extend_from_slice(&bitmap);
    Signature(bytes)
}

/// Canonical compiled form of an expression.
///
/// Equal signatures mean logically equivalent expressions over the same
/// literals.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn tautology() -> Self {
        Signature(vec![0, 0, 0, 0, MARKER_TRUE])
    }

    pub fn contradiction() -> Self {
        Signature(vec![0, 0, 0, 0, MARKER_FALSE])
    }

    /// Validate the layout of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let count = match bytes {
            [a, b, c, d, ..] => u32::from_be_bytes([*a, *b, *c, *d]) as usize,
            _ => return Err(SignatureError::Truncated { len: bytes.len() }),
        };

        if count == 0 {
            return match bytes[HEADER_LEN..] {
                [MARKER_TRUE] | [MARKER_FALSE] => Ok(Signature(bytes.to_vec())),
                [marker] => Err(SignatureError::InvalidMarker { marker }),
                [] => Err(SignatureError::Truncated { len: bytes.len() }),
                _ => Err(SignatureError::LengthMismatch {
                    expected: HEADER_LEN + 1,
                    actual: bytes.len(),
                }),
            };
        }

        if count > MAX_SYMBOLS_CAP {
            return Err(SignatureError::TooManyLiterals {
                count,
                max: MAX_SYMBOLS_CAP,
            });
        }
        let expected = HEADER_LEN + count * LITERAL_LEN + bitmap_len(count);
        if bytes.len() != expected {
            return Err(SignatureError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let signature = Signature(bytes.to_vec());
        let literals = signature.literals();
        if let Some(index) = literals.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SignatureError::UnsortedLiterals { index: index + 1 });
        }
        Ok(signature)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of literals in the header (zero when collapsed).
    pub fn count(&self) -> usize {
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&self.0[..HEADER_LEN]);
        u32::from_be_bytes(header) as usize
    }

    pub fn kind(&self) -> SignatureKind {
        match (self.count(), self.0.get(HEADER_LEN)) {
            (0, Some(&MARKER_TRUE)) => SignatureKind::Tautology,
            (0, _) => SignatureKind::Contradiction,
            _ => SignatureKind::Table,
        }
    }

    /// Literal values, ascending. Empty when collapsed.
    pub fn literals(&self) -> Vec<u32> {
        let end = HEADER_LEN + self.count() * LITERAL_LEN;
        self.0[HEADER_LEN..end]
            .chunks_exact(LITERAL_LEN)
            .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Truth table bytes. Empty when collapsed.
    pub fn bitmap(&self) -> &[u8] {
        match self.kind() {
            SignatureKind::Table => &self.0[HEADER_LEN + self.count() * LITERAL_LEN..],
            _ => &[],
        }
    }

    /// Whether the expression holds for a set of present integers.
    ///
    /// Integers not listed in the signature are ignored.
    pub fn matches(&self, present: &[u32]) -> bool {
        match self.kind() {
            SignatureKind::Tautology => true,
            SignatureKind::Contradiction => false,
            SignatureKind::Table => {
                let literals = self.literals();
                let n = literals.len();
                let row = literals
                    .iter()
                    .enumerate()
                    .filter(|(_, literal)| present.contains(literal))
                    .fold(0usize, |row, (j, _)| row | 1 << (n - 1 - j));
                self.bitmap()[row / 8] & (1 << (row % 8)) != 0
            }
        }
    }

    /// Uppercase hexadecimal rendering of the bytes.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02X}", b)).collect()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Signature> for Vec<u8> {
    fn from(signature: Signature) -> Self {
        signature.0
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::parser::parse;

    fn signature(expr: &str) -> Signature {
        let mut result = parse(expr, 256).unwrap();
        compute_signature(&result.root, &mut result.symbols)
    }

    #[test]
    fn test_bitmap_len() {
        assert_eq!(bitmap_len(0), 1);
        assert_eq!(bitmap_len(1), 1);
        assert_eq!(bitmap_len(3), 1);
        assert_eq!(bitmap_len(4), 2);
        assert_eq!(bitmap_len(31), 1 << 28);
    }

    #[test]
    fn test_single_literal() {
        let sig = signature("5");
        assert_eq!(sig.as_bytes(), &[0, 0, 0, 1, 0, 0, 0, 5, 0b10]);
        assert_eq!(sig.kind(), SignatureKind::Table);
        assert_eq!(sig.literals(), vec![5]);
        assert_eq!(sig.bitmap(), &[0b10]);
    }

    #[test]
    fn test_bit_assignment() {
        let mut result = parse("10 & !20", 256).unwrap();
        let sig = compute_signature(&result.root, &mut result.symbols);
        // The largest literal gets bit 0.
        assert_eq!(result.symbols.direct_get(20).unwrap().get(), 0b01);
        assert_eq!(result.symbols.direct_get(10).unwrap().get(), 0b10);
        // Only row 0b10 (10 present, 20 absent) is true.
        assert_eq!(sig.as_bytes(), &[0, 0, 0, 2, 0, 0, 0, 10, 0, 0, 0, 20, 0b0100]);
    }

    #[test]
    fn test_collapse() {
        assert_eq!(signature("1|!1"), Signature::tautology());
        assert_eq!(signature("1&!1"), Signature::contradiction());
        assert_eq!(signature("(1|!1)&(2|3)").literals(), vec![1, 2, 3]);
        assert_eq!(signature("1|!1").kind(), SignatureKind::Tautology);
        assert_eq!(signature("1&!1").kind(), SignatureKind::Contradiction);
        assert!(signature("1|!1").literals().is_empty());
        assert!(signature("1|!1").bitmap().is_empty());
    }

    #[test]
    fn test_multi_byte_bitmap() {
        let sig = signature("1&2&3&4");
        assert_eq!(sig.len(), 4 + 16 + 2);
        // Only the last row is true.
        assert_eq!(sig.bitmap(), &[0x00, 0x80]);
    }

    #[test]
    fn test_matches() {
        let sig = signature("10 & !20");
        assert!(sig.matches(&[10]));
        assert!(sig.matches(&[10, 99]));
        assert!(!sig.matches(&[10, 20]));
        assert!(!sig.matches(&[20]));
        assert!(!sig.matches(&[]));

        let sig = signature("1 | 2 & 3");
        assert!(sig.matches(&[1]));
        assert!(sig.matches(&[3, 2]));
        assert!(!sig.matches(&[2]));

        assert!(Signature::tautology().matches(&[]));
        assert!(!Signature::contradiction().matches(&[1, 2, 3]));
    }

    #[test]
    fn test_hex() {
        let sig = signature("5");
        assert_eq!(sig.to_hex(), "000000010000000502");
        assert_eq!(sig.to_string(), "000000010000000502");
        assert_eq!(format!("{:?}", Signature::tautology()), "Signature(00000000FF)");
    }

    #[test]
    fn test_from_bytes() {
        let sig = signature("1&(2|3)");
        assert_eq!(Signature::from_bytes(sig.as_bytes()), Ok(sig.clone()));
        assert_eq!(Signature::from_bytes(&[0, 0, 0, 0, 0xFF]), Ok(Signature::tautology()));
        assert_eq!(Signature::from_bytes(&[0, 0, 0, 0, 0x00]), Ok(Signature::contradiction()));

        assert_eq!(Signature::from_bytes(&[0, 0, 0]), Err(SignatureError::Truncated { len: 3 }));
        assert_eq!(Signature::from_bytes(&[0, 0, 0, 0]), Err(SignatureError::Truncated { len: 4 }));
        assert_eq!(
            Signature::from_bytes(&[0, 0, 0, 0, 0x7F]),
            Err(SignatureError::InvalidMarker { marker: 0x7F })
        );
        assert_eq!(
            Signature::from_bytes(&[0, 0, 0, 32]),
            Err(SignatureError::TooManyLiterals { count: 32, max: 31 })
        );
        assert_eq!(
            Signature::from_bytes(&[0, 0, 0, 1, 0, 0, 0, 5]),
            Err(SignatureError::LengthMismatch { expected: 9, actual: 8 })
        );
        assert_eq!(
            Signature::from_bytes(&[0, 0, 0, 2, 0, 0, 0, 5, 0, 0, 0, 3, 0x04]),
            Err(SignatureError::UnsortedLiterals { index: 1 })
        );
    }

    #[test]
    fn test_into_bytes() {
        let bytes: Vec<u8> = signature("5").into();
        assert_eq!(bytes, signature("5").into_bytes());
        assert_eq!(signature("5").as_ref(), &bytes[..]);
    }
}
