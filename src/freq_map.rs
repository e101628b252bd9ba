//! Weighted frequency map
//!
//! A string-keyed accumulating hash table built for frequency counting.
//! Keys hash with the classic multiplicative string hash (seed 5381,
//! `h = 33*h + byte`) into a power-of-two array of buckets; each bucket is
//! a separately grown list of entries.
//!
//! # Growth
//!
//! Two independent growth domains:
//!
//! - **Bucket array**: doubled by a full rehash once
//!   `count * 100 > length * 75` (75% load factor, integer math).
//! - **Bucket entries**: reserved 16 at a time, then doubled whenever the
//!   filled count reaches a power of two >= 16 (see [`bucket_needs_growth`]).
//!
//! Every allocation goes through `try_reserve_exact`, so running out of
//! memory surfaces as [`FreqError::AllocationFailure`] instead of an abort.

use crate::error::{FreqError, Result};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// Capacity used by [`FrequencyMap::new`]
pub const DEFAULT_CAPACITY: usize = 10;

/// Smallest bucket array and smallest per-bucket entry allocation
pub const RESIZE_MIN: usize = 16;

/// Load factor threshold, in percent
const MAX_LOAD_PERCENT: usize = 75;

/// Multiplicative string hash (seed 5381, `h = 33*h + byte`)
///
/// # Example
/// ```
/// use freqscan::freq_map::hash_key;
///
/// assert_eq!(hash_key(b""), 5381);
/// assert_eq!(hash_key(b"a"), 5381 * 33 + 97);
/// ```
pub fn hash_key(key: &[u8]) -> usize {
    key.iter()
        .fold(5381usize, |h, &b| h.wrapping_mul(33).wrapping_add(b as usize))
}

/// Round `x` up to a power of two, never below [`RESIZE_MIN`]
pub fn next_size(x: usize) -> usize {
    x.max(RESIZE_MIN).next_power_of_two()
}

/// Occupancy-driven growth trigger for a bucket holding `filled` entries
///
/// A bucket is reallocated to the next power of two right before an append
/// when its filled count is itself a power of two >= [`RESIZE_MIN`]
/// (16, 32, 64, ...).
pub fn bucket_needs_growth(filled: usize) -> bool {
    filled >= RESIZE_MIN && filled.is_power_of_two()
}

/// A key and its accumulated weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy)]
enum Update {
    Replace,
    Add,
}

/// Entries sharing one hash slot. Unallocated until the first insert.
#[derive(Debug, Clone, Default)]
struct Bucket {
    entries: Vec<Pair>,
}

impl Bucket {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|pair| pair.key == key)
    }

    fn is_allocated(&self) -> bool {
        self.entries.capacity() > 0
    }

    /// Append a new entry, reserving storage per the growth policy first
    fn append(&mut self, key: &str, weight: f64) -> Result<()> {
        let filled = self.entries.len();
        let target = if !self.is_allocated() {
            Some(next_size(1))
        } else if bucket_needs_growth(filled) || filled == self.entries.capacity() {
            // A cloned bucket holds no spare capacity
            Some(next_size(filled + 1))
        } else {
            None
        };

        if let Some(target) = target {
            let additional = target.saturating_sub(filled);
            self.entries
                .try_reserve_exact(additional)
                .map_err(|e| FreqError::allocation(target, e))?;
        }

        self.entries.push(Pair {
            key: owned_key(key)?,
            weight,
        });
        Ok(())
    }
}

fn owned_key(key: &str) -> Result<String> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(key.len())
        .map_err(|e| FreqError::allocation(key.len(), e))?;
    owned.push_str(key);
    Ok(owned)
}

fn allocate_buckets(length: usize) -> Result<Vec<Bucket>> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(length)
        .map_err(|e| FreqError::allocation(length, e))?;
    buckets.resize_with(length, Bucket::default);
    Ok(buckets)
}

/// String → weight accumulating hash table
///
/// # Example
/// ```
/// use freqscan::freq_map::FrequencyMap;
///
/// let mut map = FrequencyMap::new()?;
/// map.increment("th", 2.0)?;
/// map.increment("th", 0.5)?;
/// map.put("he", 1.0)?;
///
/// assert_eq!(map.get("th"), Some(2.5));
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.export_sorted()[0].key, "th");
/// # Ok::<(), freqscan::error::FreqError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyMap {
    buckets: Vec<Bucket>,
    /// Number of distinct keys
    count: usize,
}

impl FrequencyMap {
    /// Create an empty map with [`DEFAULT_CAPACITY`]
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty map with at least `capacity` buckets (minimum 16)
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            buckets: allocate_buckets(next_size(capacity))?,
            count: 0,
        })
    }

    /// Re-initialize this map in place, discarding any previous contents
    pub fn init(&mut self, capacity: usize) -> Result<()> {
        *self = Self::with_capacity(capacity)?;
        Ok(())
    }

    /// Release all storage. The map must be re-[`init`](Self::init)ed before
    /// further writes; reads on a cleared map report every key as absent.
    pub fn clear(&mut self) {
        self.buckets = Vec::new();
        self.count = 0;
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Length of the bucket array (0 once cleared)
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the 75% load factor threshold is crossed
    pub fn load_exceeded(&self) -> bool {
        self.count.saturating_mul(100) > self.buckets.len().saturating_mul(MAX_LOAD_PERCENT)
    }

    fn slot(&self, key: &str) -> Option<usize> {
        if self.buckets.is_empty() {
            None
        } else {
            Some(hash_key(key.as_bytes()) % self.buckets.len())
        }
    }

    fn find(&self, key: &str) -> Option<&Pair> {
        let bucket = &self.buckets[self.slot(key)?];
        bucket.entries.iter().find(|pair| pair.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Accumulated weight for `key`, or `None` if it was never inserted
    pub fn get(&self, key: &str) -> Option<f64> {
        self.find(key).map(|pair| pair.weight)
    }

    /// Set the weight for `key`, replacing any previous value
    pub fn put(&mut self, key: &str, value: f64) -> Result<()> {
        self.upsert(key, value, Update::Replace)
    }

    /// Add `delta` to the weight for `key`, inserting it if absent
    pub fn increment(&mut self, key: &str, delta: f64) -> Result<()> {
        self.upsert(key, delta, Update::Add)
    }

    fn upsert(&mut self, key: &str, value: f64, update: Update) -> Result<()> {
        let index = self.slot(key).ok_or(FreqError::Uninitialized)?;
        let bucket = &mut self.buckets[index];

        if let Some(pos) = bucket.position(key) {
            let weight = &mut bucket.entries[pos].weight;
            match update {
                Update::Replace => *weight = value,
                Update::Add => *weight += value,
            }
            return Ok(());
        }

        bucket.append(key, value)?;
        self.count += 1;

        if self.load_exceeded() {
            self.resize()?;
        }
        Ok(())
    }

    /// Rebuild at double the bucket count
    ///
    /// Entries are re-inserted with `put` into a fresh map which then
    /// replaces `self`. If the fresh map cannot be allocated the current
    /// contents are left untouched. A cleared map stays cleared and reports
    /// `Uninitialized`.
    pub fn resize(&mut self) -> Result<()> {
        if self.buckets.is_empty() {
            return Err(FreqError::Uninitialized);
        }
        let doubled = self.buckets.len().saturating_mul(2);
        let mut grown = Self::with_capacity(doubled)?;
        for (key, weight) in self.iter() {
            grown.put(key, weight)?;
        }

        tracing::trace!(
            from = self.buckets.len(),
            to = grown.buckets.len(),
            keys = self.count,
            "resized frequency map"
        );
        *self = grown;
        Ok(())
    }

    /// Add every entry of `src` into `self`. `src` is not modified.
    pub fn merge(&mut self, src: &FrequencyMap) -> Result<()> {
        for (key, weight) in src.iter() {
            self.increment(key, weight)?;
        }
        Ok(())
    }

    /// All `(key, weight)` pairs in bucket-then-slot order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.entries.iter())
            .map(|pair| (pair.key.as_str(), pair.weight))
    }

    /// Visit every pair in bucket-then-slot order until the visitor breaks
    ///
    /// # Example
    /// ```
    /// use std::ops::ControlFlow;
    /// use freqscan::freq_map::FrequencyMap;
    ///
    /// let mut map = FrequencyMap::new()?;
    /// map.increment("e", 12.0)?;
    /// map.increment("q", 0.1)?;
    ///
    /// let rare = map.for_each(|key, weight| {
    ///     if weight < 1.0 { ControlFlow::Break(key.to_string()) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(rare, ControlFlow::Break("q".to_string()));
    /// # Ok::<(), freqscan::error::FreqError>(())
    /// ```
    pub fn for_each<B, F>(&self, mut visitor: F) -> ControlFlow<B>
    where
        F: FnMut(&str, f64) -> ControlFlow<B>,
    {
        self.iter()
            .try_for_each(|(key, weight)| visitor(key, weight))
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.iter().map(|(_, weight)| weight).sum()
    }

    fn pairs(&self) -> Vec<Pair> {
        let mut pairs = Vec::with_capacity(self.count);
        pairs.extend(self.buckets.iter().flat_map(|b| b.entries.iter().cloned()));
        pairs
    }

    /// All pairs sorted by weight, descending. Ties come out in no
    /// particular order.
    pub fn export_sorted(&self) -> Vec<Pair> {
        let mut pairs = self.pairs();
        pairs.sort_unstable_by(|a, b| b.weight.total_cmp(&a.weight));
        pairs
    }

    /// All pairs sorted by weight descending, ties by key ascending
    pub fn export_ranked(&self) -> Vec<Pair> {
        let mut pairs = self.pairs();
        pairs.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.key.cmp(&b.key))
        });
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_replaces_and_increment_accumulates() {
        let mut map = FrequencyMap::new().unwrap();
        map.put("hello", 1.0).unwrap();
        map.put("hello", 3.0).unwrap();
        assert_eq!(map.get("hello"), Some(3.0));
        assert_eq!(map.len(), 1);

        map.increment("world", 5.0).unwrap();
        map.increment("world", 5.0).unwrap();
        assert_eq!(map.get("world"), Some(10.0));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_missing_key() {
        let mut map = FrequencyMap::new().unwrap();
        map.increment("a", 1.0).unwrap();
        assert_eq!(map.get("b"), None);
        assert!(!map.contains_key("b"));
        assert!(map.contains_key("a"));
    }

    #[test]
    fn test_hash_key_matches_djb2() {
        assert_eq!(hash_key(b""), 5381);
        assert_eq!(hash_key(b"a"), 177_670);
        assert_eq!(hash_key(b"ab"), 177_670 * 33 + 98);
    }

    #[test]
    fn test_next_size() {
        assert_eq!(next_size(0), 16);
        assert_eq!(next_size(10), 16);
        assert_eq!(next_size(16), 16);
        assert_eq!(next_size(17), 32);
        assert_eq!(next_size(100), 128);
    }

    #[test]
    fn test_bucket_growth_trigger() {
        assert!(!bucket_needs_growth(0));
        assert!(!bucket_needs_growth(1));
        assert!(!bucket_needs_growth(8));
        assert!(bucket_needs_growth(16));
        assert!(!bucket_needs_growth(17));
        assert!(!bucket_needs_growth(31));
        assert!(bucket_needs_growth(32));
        assert!(bucket_needs_growth(64));
        assert!(!bucket_needs_growth(96));
    }

    #[test]
    fn test_bucket_reserves_sixteen_then_doubles() {
        let mut bucket = Bucket::default();
        assert!(!bucket.is_allocated());

        bucket.append("k0", 1.0).unwrap();
        assert!(bucket.entries.capacity() >= 16);

        for i in 1..16 {
            bucket.append(&format!("k{i}"), 1.0).unwrap();
        }
        assert_eq!(bucket.entries.len(), 16);

        bucket.append("k16", 1.0).unwrap();
        assert!(bucket.entries.capacity() >= 32);
        assert_eq!(bucket.entries.len(), 17);
        assert_eq!(bucket.position("k16"), Some(16));
    }

    #[test]
    fn test_default_capacity_is_sixteen_buckets() {
        let map = FrequencyMap::new().unwrap();
        assert_eq!(map.bucket_count(), 16);
        assert!(map.is_empty());
    }

    #[test]
    fn test_resize_threshold_uses_integer_math() {
        let mut map = FrequencyMap::new().unwrap();
        // 12 * 100 == 16 * 75: not over the threshold yet
        for i in 0..12 {
            map.increment(&format!("key{i}"), 1.0).unwrap();
        }
        assert_eq!(map.bucket_count(), 16);

        map.increment("key12", 1.0).unwrap();
        assert_eq!(map.bucket_count(), 32);
        assert_eq!(map.len(), 13);
        for i in 0..13 {
            assert_eq!(map.get(&format!("key{i}")), Some(1.0));
        }
    }

    #[test]
    fn test_resize_copies_weights() {
        let mut map = FrequencyMap::new().unwrap();
        map.increment("x", 2.5).unwrap();
        map.increment("y", 7.0).unwrap();
        map.resize().unwrap();
        assert_eq!(map.bucket_count(), 32);
        assert_eq!(map.get("x"), Some(2.5));
        assert_eq!(map.get("y"), Some(7.0));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_many_keys_stay_under_load_factor() {
        let mut map = FrequencyMap::new().unwrap();
        for i in 0..5000 {
            map.increment(&format!("w{i}"), 1.0).unwrap();
            assert!(!map.load_exceeded());
            assert!(map.bucket_count().is_power_of_two());
        }
        assert_eq!(map.len(), 5000);
    }

    #[test]
    fn test_merge_adds_weights() {
        let mut dest = FrequencyMap::new().unwrap();
        dest.increment("the", 3.0).unwrap();
        dest.increment("and", 1.0).unwrap();

        let mut src = FrequencyMap::new().unwrap();
        src.increment("the", 2.0).unwrap();
        src.increment("of", 4.0).unwrap();

        dest.merge(&src).unwrap();
        assert_eq!(dest.get("the"), Some(5.0));
        assert_eq!(dest.get("and"), Some(1.0));
        assert_eq!(dest.get("of"), Some(4.0));
        assert_eq!(dest.len(), 3);

        // Source untouched
        assert_eq!(src.get("the"), Some(2.0));
        assert_eq!(src.len(), 2);
    }

    #[test]
    fn test_export_sorted_descending() {
        let mut map = FrequencyMap::new().unwrap();
        for (key, weight) in [("a", 1.0), ("b", 9.0), ("c", 4.0), ("d", 4.0), ("e", 0.5)] {
            map.increment(key, weight).unwrap();
        }

        let sorted = map.export_sorted();
        assert_eq!(sorted.len(), 5);
        assert_eq!(sorted[0].key, "b");
        assert!(sorted.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn test_export_ranked_breaks_ties_by_key() {
        let mut map = FrequencyMap::new().unwrap();
        for key in ["zeta", "alpha", "mid"] {
            map.increment(key, 2.0).unwrap();
        }
        map.increment("top", 3.0).unwrap();

        let keys: Vec<_> = map.export_ranked().into_iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["top", "alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_for_each_visits_all_and_stops_early() {
        let mut map = FrequencyMap::new().unwrap();
        for i in 0..20 {
            map.increment(&format!("k{i}"), i as f64).unwrap();
        }

        let mut seen = 0;
        let flow: ControlFlow<()> = map.for_each(|_, _| {
            seen += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(seen, 20);

        let mut visited = 0;
        let flow = map.for_each(|_, _| {
            visited += 1;
            if visited == 3 {
                ControlFlow::Break(7)
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(7));
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_iteration_order_is_deterministic() {
        let mut map = FrequencyMap::new().unwrap();
        for key in ["q", "w", "e", "r", "t", "y"] {
            map.increment(key, 1.0).unwrap();
        }
        let first: Vec<_> = map.iter().map(|(k, _)| k.to_string()).collect();
        let second: Vec<_> = map.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clear_then_init_matches_fresh_map() {
        let mut map = FrequencyMap::new().unwrap();
        for i in 0..40 {
            map.increment(&format!("k{i}"), 1.0).unwrap();
        }
        map.clear();
        assert_eq!(map.bucket_count(), 0);
        assert_eq!(map.len(), 0);
        assert_eq!(map.get("k1"), None);
        assert!(matches!(
            map.increment("k1", 1.0),
            Err(FreqError::Uninitialized)
        ));

        map.init(DEFAULT_CAPACITY).unwrap();
        let fresh = FrequencyMap::new().unwrap();
        assert_eq!(map.bucket_count(), fresh.bucket_count());
        assert_eq!(map.len(), 0);
        assert!(map.export_sorted().is_empty());

        map.increment("k1", 2.0).unwrap();
        assert_eq!(map.get("k1"), Some(2.0));
    }

    #[test]
    fn test_resize_does_not_revive_cleared_map() {
        let mut map = FrequencyMap::new().unwrap();
        map.increment("k", 1.0).unwrap();
        map.clear();

        assert!(matches!(map.resize(), Err(FreqError::Uninitialized)));
        assert_eq!(map.bucket_count(), 0);
        assert!(matches!(
            map.put("k", 1.0),
            Err(FreqError::Uninitialized)
        ));
    }

    #[test]
    fn test_total_weight() {
        let mut map = FrequencyMap::new().unwrap();
        map.increment("a", 0.25).unwrap();
        map.increment("b", 0.75).unwrap();
        assert!((map.total_weight() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_keys_with_control_characters() {
        let mut map = FrequencyMap::new().unwrap();
        map.increment("\n", 1.0).unwrap();
        map.increment("a\tb", 1.0).unwrap();
        assert_eq!(map.get("\n"), Some(1.0));
        assert_eq!(map.get("a\tb"), Some(1.0));
    }
}
