use std::ops::{Index, IndexMut};

use crate::utils::MyHash;

/// Initial number of buckets.
const INIT_BUCKETS: usize = 128;
/// Maximum ratio of entries to buckets before the bucket array doubles.
const GOOD_LOAD: f64 = 0.5;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    hash: u64,
    next: Option<usize>,
}

impl<T> Entry<T> {
    /// Create a new cell with the given value.
    fn new(value: T, hash: u64) -> Self {
        Self {
            value,
            hash,
            next: None,
        }
    }
}

/// Hash table with separate chaining and insertion-ordered storage.
///
/// Values live in a plain `Vec` in insertion order; each bucket heads a chain
/// threaded through the entries' `next` links. Lookups take the structural
/// hash of the key and an equality predicate, so chains may hold colliding
/// values that are told apart by a full comparison.
#[derive(Debug, Clone)]
pub struct Table<T> {
    data: Vec<Entry<T>>,

    buckets: Vec<Option<usize>>,
    bitmask: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new table sized for about `expected` values.
    pub fn with_capacity(expected: usize) -> Self {
        let wanted = (expected as f64 / GOOD_LOAD).ceil() as usize;
        let buckets_size = wanted.max(INIT_BUCKETS).next_power_of_two();
        Self {
            data: Vec::with_capacity(expected),
            buckets: vec![None; buckets_size],
            bitmask: (buckets_size - 1) as u64,
        }
    }

    /// Get the number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of buckets.
    pub fn buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        &self.data[index].value
    }
    /// Get the mutable reference to the value at the given index.
    ///
    /// The caller must not change the part of the value that is hashed.
    pub fn value_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index].value
    }

    /// Iterate over the values in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.data.iter(),
        }
    }

    fn bucket_index(&self, hash: u64) -> usize {
        (hash & self.bitmask) as usize
    }

    /// Find the index of the value with the given hash that satisfies `eq`.
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<usize> {
        let mut cursor = self.buckets[self.bucket_index(hash)];
        while let Some(index) = cursor {
            let entry = &self.data[index];
            if entry.hash == hash && eq(&entry.value) {
                return Some(index);
            }
            cursor = entry.next;
        }
        None
    }

    /// Append a value to its bucket and return its index.
    ///
    /// Does not check for duplicates; use [`find`][Self::find] first.
    pub fn insert(&mut self, hash: u64, value: T) -> usize {
        if (self.data.len() + 1) as f64 > self.buckets.len() as f64 * GOOD_LOAD {
            self.grow();
        }

        let index = self.data.len();
        let bucket_index = self.bucket_index(hash);
        let mut entry = Entry::new(value, hash);
        // Push to the front of the chain.
        entry.next = self.buckets[bucket_index];
        self.buckets[bucket_index] = Some(index);
        self.data.push(entry);
        index
    }

    /// Keep only the values satisfying the predicate, preserving their order.
    ///
    /// Indices of the kept values shift down past the removed ones.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.data.retain(|e| keep(&e.value));
        self.rethread();
    }

    /// Double the bucket array and rethread every chain.
    fn grow(&mut self) {
        let buckets_size = self.buckets.len() * 2;
        self.buckets.resize(buckets_size, None);
        self.bitmask = (buckets_size - 1) as u64;
        self.rethread();
    }

    fn rethread(&mut self) {
        self.buckets.fill(None);
        for index in 0..self.data.len() {
            let bucket_index = self.bucket_index(self.data[index].hash);
            self.data[index].next = self.buckets[bucket_index];
            self.buckets[bucket_index] = Some(index);
        }
    }

    /// Length of the chain in the bucket of the given hash.
    pub fn chain_len(&self, hash: u64) -> usize {
        let mut len = 0;
        let mut cursor = self.buckets[self.bucket_index(hash)];
        while let Some(index) = cursor {
            len += 1;
            cursor = self.data[index].next;
        }
        len
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    /// Put a value into the table and return its index.
    ///
    /// An equal value already in the table is reused.
    pub fn put(&mut self, value: T) -> usize {
        let hash = value.hash();
        match self.find(hash, |v| v == &value) {
            Some(index) => index,
            None => self.insert(hash, value),
        }
    }
}

pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, Entry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| &e.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct IntoIter<T> {
    inner: std::vec::IntoIter<Entry<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| e.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> IntoIterator for Table<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.data.into_iter(),
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}

impl<T> IndexMut<usize> for Table<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.value_mut(index)
    }
}
