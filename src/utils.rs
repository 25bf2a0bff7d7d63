//! Hash and comparison functions for [`OrderedTable`][crate::table::OrderedTable] keys.

use std::cmp::Ordering;

/// Identity hash: the integer key is its own hash.
pub fn value_hash(key: &u32) -> u64 {
    *key as u64
}

/// Natural order of `u32` keys.
pub fn uint32_cmp(a: &u32, b: &u32) -> Ordering {
    a.cmp(b)
}

/// [djb2][djb2] variant (xor flavour) over the raw bytes, case-sensitive.
///
/// ```text
/// h = 5381; for c in s: h = (h * 33) ^ c
/// ```
///
/// [djb2]: http://www.cse.yorku.ca/~oz/hash.html
pub fn ascii_hash_cs(key: &String) -> u64 {
    key.bytes().fold(5381u64, |h, c| h.wrapping_add(h << 5) ^ c as u64)
}

/// Same as [`ascii_hash_cs`], with ASCII letters folded to upper case.
pub fn ascii_hash_ci(key: &String) -> u64 {
    key.bytes()
        .fold(5381u64, |h, c| h.wrapping_add(h << 5) ^ c.to_ascii_uppercase() as u64)
}

/// Byte-wise comparison.
pub fn ascii_cmp_cs(a: &String, b: &String) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

/// Byte-wise comparison ignoring ASCII case.
pub fn ascii_cmp_ci(a: &String, b: &String) -> Ordering {
    let a = a.bytes().map(|c| c.to_ascii_lowercase());
    let b = b.bytes().map(|c| c.to_ascii_lowercase());
    a.cmp(b)
}
