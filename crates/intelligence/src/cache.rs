//! Query result cache with TTL and capacity bound
//!
//! Entries are keyed by the normalized query. An entry older than the TTL
//! is a miss and is removed on access. When full, the entry inserted
//! earliest is evicted, regardless of how recently it was read.
//!
//! Every operation has an `_at` variant taking an explicit clock so expiry
//! can be tested without sleeping.

use chrono::{DateTime, Duration, Utc};
use compass_core::RankedResult;
use std::collections::HashMap;
use tracing::debug;

/// Default maximum number of entries
pub const DEFAULT_CAPACITY: usize = 100;

/// Default time-to-live (30 minutes)
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;

/// Lowercase, trim, collapse internal whitespace runs to one space
///
/// # Example
///
/// ```
/// use compass_intelligence::cache::normalize_query;
///
/// assert_eq!(normalize_query("  Primary   BUTTON\t"), "primary button");
/// ```
pub fn normalize_query(query: &str) -> String {
    query
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// CacheEntry
// ============================================================================

/// One cached result set
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Normalized query (the key)
    pub normalized_query: String,
    /// Ranked results, best first
    pub results: Vec<RankedResult>,
    /// Insertion time
    pub created_at: DateTime<Utc>,
    /// Hits since insertion
    pub hit_count: u64,
    /// Insertion sequence number, breaks `created_at` ties
    seq: u64,
}

// ============================================================================
// QueryCache
// ============================================================================

/// Bounded, TTL-expiring result cache
#[derive(Debug, Clone)]
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
    capacity: usize,
    ttl: Duration,
    next_seq: u64,
    evictions: u64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(
            DEFAULT_CAPACITY,
            std::time::Duration::from_secs(DEFAULT_TTL_SECS),
        )
    }
}

impl QueryCache {
    /// Create a cache; a zero capacity is treated as 1
    pub fn new(capacity: usize, ttl: std::time::Duration) -> Self {
        QueryCache {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            next_seq: 0,
            evictions: 0,
        }
    }

    /// Look up a query now
    pub fn get(&mut self, query: &str) -> Option<Vec<RankedResult>> {
        self.get_at(query, Utc::now())
    }

    /// Look up a query at a given time
    ///
    /// A hit increments the entry's hit count. An expired entry is removed
    /// and reported as a miss.
    pub fn get_at(&mut self, query: &str, now: DateTime<Utc>) -> Option<Vec<RankedResult>> {
        let key = normalize_query(query);
        let expired = match self.entries.get(&key) {
            None => {
                debug!(target: "compass::cache", query = %key, "Cache miss");
                return None;
            }
            Some(entry) => now - entry.created_at > self.ttl,
        };

        if expired {
            self.entries.remove(&key);
            debug!(target: "compass::cache", query = %key, "Cache entry expired");
            return None;
        }

        let entry = self.entries.get_mut(&key)?;
        entry.hit_count += 1;
        debug!(
            target: "compass::cache",
            query = %key,
            hits = entry.hit_count,
            "Cache hit"
        );
        Some(entry.results.clone())
    }

    /// Store results for a query now
    pub fn put(&mut self, query: &str, results: Vec<RankedResult>) {
        self.put_at(query, results, Utc::now());
    }

    /// Store results for a query at a given time
    ///
    /// Overwrites any existing entry with a fresh timestamp and zero hits.
    /// Evicts the earliest-inserted entry first when the cache is full.
    pub fn put_at(&mut self, query: &str, results: Vec<RankedResult>, now: DateTime<Utc>) {
        let key = normalize_query(query);

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key.clone(),
            CacheEntry {
                normalized_query: key,
                results,
                created_at: now,
                hit_count: 0,
                seq,
            },
        );
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .values()
            .min_by_key(|entry| (entry.created_at, entry.seq))
            .map(|entry| entry.normalized_query.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.evictions += 1;
            debug!(target: "compass::cache", query = %key, "Evicted oldest entry");
        }
    }

    /// Read an entry without counting a hit or checking expiry
    pub fn peek(&self, query: &str) -> Option<&CacheEntry> {
        self.entries.get(&normalize_query(query))
    }

    /// Check whether a query has an entry (expired or not)
    pub fn contains(&self, query: &str) -> bool {
        self.peek(query).is_some()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Entries evicted for capacity since creation
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Sum of hit counts across live entries
    pub fn total_hits(&self) -> u64 {
        self.entries.values().map(|e| e.hit_count).sum()
    }

    /// Mean result-set size across entries, 0 when empty
    pub fn average_result_count(&self) -> f64 {
        let total: usize = self.entries.values().map(|e| e.results.len()).sum();
        total as f64 / self.entries.len().max(1) as f64
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
