//! Process-wide duplicate-content index.
//!
//! Files are keyed by `(size, digest)`: the size bucket keeps membership
//! tests to a short linear scan over digests of identically sized files.

use hashbrown::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::stats::HashValue;

/// Bucketed `(size, digest)` index shared by the scanner-stage workers.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    hashes: Mutex<HashMap<u64, Vec<HashValue>>>,
}

impl DuplicateIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, Vec<HashValue>>> {
        self.hashes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Has `(bytes, hash)` been seen in this run?
    #[must_use]
    pub fn check(&self, bytes: u64, hash: HashValue) -> bool {
        self.lock()
            .get(&bytes)
            .is_some_and(|bucket| bucket.contains(&hash))
    }

    /// Record `(bytes, hash)` as seen.
    pub fn add(&self, bytes: u64, hash: HashValue) {
        self.lock().entry(bytes).or_default().push(hash);
    }

    /// Membership test and insert under one lock: returns true if the pair
    /// was already present, otherwise records it and returns false.
    pub fn check_and_add(&self, bytes: u64, hash: HashValue) -> bool {
        let mut hashes = self.lock();
        let bucket = hashes.entry(bytes).or_default();
        if bucket.contains(&hash) {
            return true;
        }
        bucket.push(hash);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_then_add() {
        let index = DuplicateIndex::new();
        let hash = HashValue(42);
        assert!(!index.check(10, hash));
        index.add(10, hash);
        assert!(index.check(10, hash));
    }

    #[test]
    fn test_same_hash_different_size_is_distinct() {
        let index = DuplicateIndex::new();
        let hash = HashValue(42);
        index.add(10, hash);
        assert!(!index.check(11, hash));
    }

    #[test]
    fn test_check_and_add_reports_presence() {
        let index = DuplicateIndex::new();
        let hash = HashValue(7);
        assert!(!index.check_and_add(3, hash));
        assert!(index.check_and_add(3, hash));
        assert!(!index.check_and_add(3, HashValue(8)));
    }

    #[test]
    fn test_concurrent_check_and_add_admits_one() {
        use std::sync::Arc;

        let index = Arc::new(DuplicateIndex::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let index = Arc::clone(&index);
                std::thread::spawn(move || index.check_and_add(100, HashValue(1)))
            })
            .collect();
        let fresh = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|duplicate| !duplicate)
            .count();
        assert_eq!(fresh, 1);
    }
}
