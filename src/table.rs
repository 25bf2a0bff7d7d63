//! Ordered hash table.
//!
//! An associative container combining O(1) amortized lookup with a traversal
//! order that is kept sorted by a user-supplied comparator at all times.
//!
//! # Layout
//!
//! Entries live in a single `Vec`, addressed by index. Index `0` is the sentry
//! and never holds an entry, so `0` doubles as the "null" link. Every entry
//! takes part in two doubly linked lists:
//!
//! ```text
//! buckets[h & mask] → e7 ⇄ e2 ⇄ e9          (bucket chain, same masked hash)
//! head → e2 ⇄ e9 ⇄ e4 ⇄ e7 ← tail           (global list, comparator order)
//! ```
//!
//! Insertion scans the global list from the head for the first entry whose
//! key is not less than the new key and links the new entry right before it.
//! Removal unlinks an entry from both lists in O(1) given its index.
//!
//! # Resizing
//!
//! The bucket array has a power-of-two capacity, never below 8. When the
//! number of entries reaches the capacity, the capacity doubles and every
//! bucket chain is rebuilt by walking the global list, which itself is left
//! untouched.

use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

use bitflags::bitflags;
use log::debug;

use crate::stack::Dtor;
use crate::utils::{ascii_cmp_ci, ascii_cmp_cs, ascii_hash_ci, ascii_hash_cs, uint32_cmp, value_hash};

/// Smallest bucket array size.
pub const MIN_CAPACITY: usize = 8;

pub type HashFn<K> = fn(&K) -> u64;
pub type CmpFn<K> = fn(&K, &K) -> Ordering;
pub type DupFn<K> = fn(&K) -> K;

/// Null link.
const NIL: usize = 0;

bitflags! {
    /// Answer of a [`foreach`][OrderedTable::foreach] visitor.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Visit: u8 {
        /// Keep going.
        const CONTINUE = 1 << 0;
        /// Remove the visited entry (destructors are called).
        const DELETE = 1 << 1;
        /// Stop the traversal after this entry.
        const STOP = 1 << 2;
    }
}

bitflags! {
    /// Modifiers for [`put_ex`][OrderedTable::put_ex].
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct PutFlags: u8 {
        /// Keep the existing value when the key is already present.
        const PRESERVE = 1 << 0;
    }
}

/// Outcome of a put operation.
#[derive(Debug, Eq, PartialEq)]
pub enum Put<'a, V> {
    /// A new entry was created.
    Inserted,
    /// The key existed and its value was overwritten.
    Replaced,
    /// The key existed and [`PutFlags::PRESERVE`] kept its value.
    Preserved(&'a V),
}

impl<V> Put<'_, V> {
    /// Whether the table was mutated.
    pub fn mutated(&self) -> bool {
        !matches!(self, Put::Preserved(_))
    }
}

struct Entry<K, V> {
    hash: u64,
    key: K,
    value: V,
    bucket_prev: usize,
    bucket_next: usize,
    prev: usize,
    next: usize,
}

pub struct OrderedTable<K, V> {
    data: Vec<Option<Entry<K, V>>>,
    /// Vacant slots of `data`, reused before growing it.
    free: Vec<usize>,

    buckets: Vec<usize>,
    bitmask: u64,

    /// Smallest entry in comparator order.
    head: usize,
    /// Largest entry in comparator order.
    tail: usize,
    /// Number of entries.
    count: usize,

    hf: HashFn<K>,
    cf: CmpFn<K>,
    key_dup: Option<DupFn<K>>,
    key_dtor: Option<Dtor<K>>,
    value_dtor: Option<Dtor<V>>,
}

fn nearest_power(requested: usize) -> usize {
    requested
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .unwrap_or(1 << (usize::BITS - 1))
}

impl<K, V> OrderedTable<K, V> {
    /// Create a table with the minimal capacity.
    pub fn new(hf: HashFn<K>, cf: CmpFn<K>) -> Self {
        Self::with_capacity(MIN_CAPACITY, hf, cf)
    }

    /// Create a table whose capacity is `capacity` rounded up to a power of two (at least 8).
    pub fn with_capacity(capacity: usize, hf: HashFn<K>, cf: CmpFn<K>) -> Self {
        let capacity = nearest_power(capacity);
        Self {
            data: vec![None], // 0th slot is the sentry
            free: Vec::new(),
            buckets: vec![NIL; capacity],
            bitmask: (capacity - 1) as u64,
            head: NIL,
            tail: NIL,
            count: 0,
            hf,
            cf,
            key_dup: None,
            key_dtor: None,
            value_dtor: None,
        }
    }

    /// Duplicate keys with `dup` when they are inserted.
    pub fn with_key_dup(mut self, dup: DupFn<K>) -> Self {
        self.key_dup = Some(dup);
        self
    }

    /// Call `dtor` on keys removed from the table.
    pub fn with_key_dtor(mut self, dtor: Dtor<K>) -> Self {
        self.key_dtor = Some(dtor);
        self
    }

    /// Call `dtor` on values removed or overwritten.
    pub fn with_value_dtor(mut self, dtor: Dtor<V>) -> Self {
        self.value_dtor = Some(dtor);
        self
    }

    /// Get the size of the bucket array.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }
    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.count
    }
    /// Check if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Hash a key with the table's hash function.
    pub fn hash(&self, key: &K) -> u64 {
        (self.hf)(key)
    }

    fn bucket_index(&self, hash: u64) -> usize {
        (hash & self.bitmask) as usize
    }

    fn entry(&self, index: usize) -> &Entry<K, V> {
        assert_ne!(index, NIL, "Index is 0");
        match &self.data[index] {
            Some(entry) => entry,
            None => panic!("Slot {} is vacant", index),
        }
    }

    fn entry_mut(&mut self, index: usize) -> &mut Entry<K, V> {
        assert_ne!(index, NIL, "Index is 0");
        match &mut self.data[index] {
            Some(entry) => entry,
            None => panic!("Slot {} is vacant", index),
        }
    }

    /// Find the index of the entry with the given hash and key.
    fn find(&self, hash: u64, key: &K) -> usize {
        let mut index = self.buckets[self.bucket_index(hash)];
        while index != NIL {
            let entry = self.entry(index);
            if entry.hash == hash && (self.cf)(key, &entry.key) == Ordering::Equal {
                return index;
            }
            index = entry.bucket_next;
        }
        NIL
    }

    /// Store an entry into a vacant slot and return its index.
    fn alloc(&mut self, entry: Entry<K, V>) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.data[index] = Some(entry);
                index
            }
            None => {
                self.data.push(Some(entry));
                self.data.len() - 1
            }
        }
    }

    /// Put a value with a precomputed hash.
    pub fn quick_put_ex(&mut self, flags: PutFlags, hash: u64, key: K, value: V) -> Put<'_, V> {
        let found = self.find(hash, &key);
        if found != NIL {
            if flags.contains(PutFlags::PRESERVE) {
                return Put::Preserved(&self.entry(found).value);
            }
            let old = std::mem::replace(&mut self.entry_mut(found).value, value);
            if let Some(dtor) = self.value_dtor {
                dtor(old);
            }
            return Put::Replaced;
        }

        let key = match self.key_dup {
            Some(dup) => dup(&key),
            None => key,
        };

        // First entry not less than the new key.
        let mut cursor = self.head;
        while cursor != NIL && (self.cf)(&key, &self.entry(cursor).key) == Ordering::Greater {
            cursor = self.entry(cursor).next;
        }
        let (prev, next) = if cursor == NIL {
            (self.tail, NIL)
        } else {
            (self.entry(cursor).prev, cursor)
        };

        let bucket = self.bucket_index(hash);
        let bucket_next = self.buckets[bucket];
        let index = self.alloc(Entry {
            hash,
            key,
            value,
            bucket_prev: NIL,
            bucket_next,
            prev,
            next,
        });

        // Bucket: prepend.
        if bucket_next != NIL {
            self.entry_mut(bucket_next).bucket_prev = index;
        }
        self.buckets[bucket] = index;

        // Global: link between `prev` and `next`.
        if prev != NIL {
            self.entry_mut(prev).next = index;
        } else {
            self.head = index;
        }
        if next != NIL {
            self.entry_mut(next).prev = index;
        } else {
            self.tail = index;
        }

        self.count += 1;
        self.maybe_resize();

        Put::Inserted
    }

    /// Put a value, honouring `flags`.
    pub fn put_ex(&mut self, flags: PutFlags, key: K, value: V) -> Put<'_, V> {
        let hash = self.hash(&key);
        self.quick_put_ex(flags, hash, key, value)
    }

    /// Insert or overwrite. Returns whether the table was mutated.
    pub fn put(&mut self, key: K, value: V) -> bool {
        self.put_ex(PutFlags::empty(), key, value).mutated()
    }

    /// Get a value with a precomputed hash.
    pub fn quick_get(&self, hash: u64, key: &K) -> Option<&V> {
        match self.find(hash, key) {
            NIL => None,
            index => Some(&self.entry(index).value),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.quick_get(self.hash(key), key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(self.hash(key), key) {
            NIL => None,
            index => Some(&mut self.entry_mut(index).value),
        }
    }

    /// Check membership with a precomputed hash.
    pub fn quick_contains(&self, hash: u64, key: &K) -> bool {
        self.find(hash, key) != NIL
    }

    pub fn contains(&self, key: &K) -> bool {
        self.quick_contains(self.hash(key), key)
    }

    /// Remove the entry at `index` from both lists and release its slot.
    fn unlink(&mut self, index: usize) -> Entry<K, V> {
        let entry = match self.data[index].take() {
            Some(entry) => entry,
            None => panic!("Slot {} is vacant", index),
        };

        if entry.bucket_prev != NIL {
            self.entry_mut(entry.bucket_prev).bucket_next = entry.bucket_next;
        } else {
            let bucket = self.bucket_index(entry.hash);
            self.buckets[bucket] = entry.bucket_next;
        }
        if entry.bucket_next != NIL {
            self.entry_mut(entry.bucket_next).bucket_prev = entry.bucket_prev;
        }

        if entry.prev != NIL {
            self.entry_mut(entry.prev).next = entry.next;
        } else {
            self.head = entry.next;
        }
        if entry.next != NIL {
            self.entry_mut(entry.next).prev = entry.prev;
        } else {
            self.tail = entry.prev;
        }

        self.free.push(index);
        self.count -= 1;

        entry
    }

    fn discard(&self, entry: Entry<K, V>, call_dtors: bool) {
        if !call_dtors {
            return;
        }
        if let Some(dtor) = self.value_dtor {
            dtor(entry.value);
        }
        if let Some(dtor) = self.key_dtor {
            dtor(entry.key);
        }
    }

    /// Remove an entry with a precomputed hash. Returns whether it existed.
    pub fn quick_delete(&mut self, hash: u64, key: &K, call_dtors: bool) -> bool {
        match self.find(hash, key) {
            NIL => false,
            index => {
                let entry = self.unlink(index);
                self.discard(entry, call_dtors);
                true
            }
        }
    }

    pub fn delete(&mut self, key: &K, call_dtors: bool) -> bool {
        self.quick_delete(self.hash(key), key, call_dtors)
    }

    /// Remove all entries, calling destructors. The capacity is kept.
    pub fn clear(&mut self) {
        let mut index = self.head;
        while index != NIL {
            let entry = match self.data[index].take() {
                Some(entry) => entry,
                None => panic!("Slot {} is vacant", index),
            };
            index = entry.next;
            self.discard(entry, true);
        }
        self.data.truncate(1);
        self.free.clear();
        self.buckets.fill(NIL);
        self.head = NIL;
        self.tail = NIL;
        self.count = 0;
    }

    /// Visit entries in ascending order.
    ///
    /// The visitor may ask for the current entry to be deleted and/or for the
    /// traversal to stop.
    pub fn foreach<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> Visit,
    {
        let mut index = self.head;
        while index != NIL {
            let entry = self.entry_mut(index);
            let next = entry.next;
            let visit = f(&entry.key, &mut entry.value);
            if visit.contains(Visit::DELETE) {
                let entry = self.unlink(index);
                self.discard(entry, true);
            }
            if visit.contains(Visit::STOP) {
                break;
            }
            index = next;
        }
    }

    /// Visit entries in descending order. See [`foreach`][Self::foreach].
    pub fn foreach_reverse<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> Visit,
    {
        let mut index = self.tail;
        while index != NIL {
            let entry = self.entry_mut(index);
            let prev = entry.prev;
            let visit = f(&entry.key, &mut entry.value);
            if visit.contains(Visit::DELETE) {
                let entry = self.unlink(index);
                self.discard(entry, true);
            }
            if visit.contains(Visit::STOP) {
                break;
            }
            index = prev;
        }
    }

    /// Iterate over `(key, value)` pairs in comparator order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: self,
            front: self.head,
            back: self.tail,
            remaining: self.count,
        }
    }

    fn maybe_resize(&mut self) {
        if self.count < self.capacity() {
            return;
        }
        let Some(capacity) = self.capacity().checked_mul(2) else {
            return;
        };
        debug!("resize: {} -> {} (count = {})", self.capacity(), capacity, self.count);
        self.buckets = vec![NIL; capacity];
        self.bitmask = (capacity - 1) as u64;
        self.rehash();
    }

    /// Rebuild all bucket chains from the global list.
    fn rehash(&mut self) {
        self.buckets.fill(NIL);
        let mut index = self.head;
        while index != NIL {
            let bucket = self.bucket_index(self.entry(index).hash);
            let first = self.buckets[bucket];
            let entry = self.entry_mut(index);
            entry.bucket_prev = NIL;
            entry.bucket_next = first;
            let next = entry.next;
            if first != NIL {
                self.entry_mut(first).bucket_prev = index;
            }
            self.buckets[bucket] = index;
            index = next;
        }
    }
}

impl<V> OrderedTable<u32, V> {
    /// Table over `u32` keys that are their own hash.
    pub fn direct() -> Self {
        Self::new(value_hash, uint32_cmp)
    }

    pub fn direct_put(&mut self, hash: u32, value: V) -> bool {
        self.direct_put_ex(PutFlags::empty(), hash, value).mutated()
    }

    pub fn direct_put_ex(&mut self, flags: PutFlags, hash: u32, value: V) -> Put<'_, V> {
        self.quick_put_ex(flags, hash as u64, hash, value)
    }

    pub fn direct_get(&self, hash: u32) -> Option<&V> {
        self.quick_get(hash as u64, &hash)
    }

    pub fn direct_contains(&self, hash: u32) -> bool {
        self.quick_contains(hash as u64, &hash)
    }

    pub fn direct_delete(&mut self, hash: u32, call_dtors: bool) -> bool {
        self.quick_delete(hash as u64, &hash, call_dtors)
    }
}

impl<V> OrderedTable<String, V> {
    /// String keys, case-sensitive.
    pub fn ascii_cs() -> Self {
        Self::new(ascii_hash_cs, ascii_cmp_cs)
    }

    /// String keys, ASCII case-insensitive.
    pub fn ascii_ci() -> Self {
        Self::new(ascii_hash_ci, ascii_cmp_ci)
    }
}

impl<K, V> Drop for OrderedTable<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Debug, V: Debug> Debug for OrderedTable<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Double-ended iterator over an [`OrderedTable`] in comparator order.
pub struct Iter<'a, K, V> {
    table: &'a OrderedTable<K, V>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.table.entry(self.front);
        self.front = entry.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.table.entry(self.back);
        self.back = entry.prev;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a OrderedTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
