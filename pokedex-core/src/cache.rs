//! In-memory LRU cache
//!
//! Bounded by entry count, total size, or both. When a limit would be
//! exceeded the least recently used entries are evicted first.

use crate::pokeapi::Pokemon;
use std::collections::HashMap;
use std::hash::Hash;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Rough in-memory footprint of one parsed detail record
const POKEMON_SIZE_ESTIMATE: u64 = 2 * 1024;

/// Size accounting for cached values
pub trait EstimateSize {
    fn estimate_size(&self) -> u64;
}

impl EstimateSize for Vec<u8> {
    fn estimate_size(&self) -> u64 {
        self.len() as u64
    }
}

impl EstimateSize for Pokemon {
    fn estimate_size(&self) -> u64 {
        POKEMON_SIZE_ESTIMATE
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    size_bytes: u64,
    created_at: OffsetDateTime,
    // Monotonic access counter, so ordering never ties
    last_used: u64,
}

/// Configuration for LRU cache limits
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries (None = unlimited)
    pub max_entries: Option<usize>,
    /// Maximum total size in bytes (None = unlimited)
    pub max_size_bytes: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: Some(1000),
            max_size_bytes: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entry_count: usize,
    pub size_bytes: u64,
    pub oldest_entry: Option<OffsetDateTime>,
}

#[derive(Debug)]
pub struct LruCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    config: CacheConfig,
    size_bytes: u64,
    clock: u64,
    name: &'static str,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + EstimateSize,
{
    pub fn new(name: &'static str, config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
            size_bytes: 0,
            clock: 0,
            name,
        }
    }

    /// Get a value, marking it as most recently used
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.clock += 1;
        let clock = self.clock;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = clock;
                debug!(cache = self.name, "Cache HIT");
                Some(entry.value.clone())
            }
            None => {
                debug!(cache = self.name, "Cache MISS");
                None
            }
        }
    }

    /// Insert a value, evicting least recently used entries to stay within
    /// the limits. Returns false when the value alone exceeds the size limit
    /// and was not cached.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let size_bytes = value.estimate_size();
        if self.config.max_size_bytes.is_some_and(|max| size_bytes > max) {
            debug!(cache = self.name, size_bytes, "Value larger than the cache, not cached");
            return false;
        }

        self.remove(&key);
        self.ensure_space_for(size_bytes);

        self.clock += 1;
        self.size_bytes += size_bytes;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                size_bytes,
                created_at: OffsetDateTime::now_utc(),
                last_used: self.clock,
            },
        );
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.size_bytes -= entry.size_bytes;
        Some(entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.size_bytes = 0;
        info!(cache = self.name, "Cleared all cache entries");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.entries.len(),
            size_bytes: self.size_bytes,
            oldest_entry: self.entries.values().map(|entry| entry.created_at).min(),
        }
    }

    fn is_over_limit(&self, new_entry_size: u64) -> bool {
        let too_many = self
            .config
            .max_entries
            .is_some_and(|max| self.entries.len() >= max);
        let too_big = self
            .config
            .max_size_bytes
            .is_some_and(|max| self.size_bytes + new_entry_size > max);
        too_many || too_big
    }

    fn ensure_space_for(&mut self, new_entry_size: u64) {
        let mut evicted_count = 0;
        let mut size_freed = 0u64;

        while !self.entries.is_empty() && self.is_over_limit(new_entry_size) {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            let Some(key) = oldest else { break };
            if let Some(entry) = self.entries.remove(&key) {
                self.size_bytes -= entry.size_bytes;
                size_freed += entry.size_bytes;
                evicted_count += 1;
            }
        }

        if evicted_count > 0 {
            info!(
                cache = self.name,
                evicted_count,
                size_freed_kb = size_freed / 1024,
                "Evicted LRU entries"
            );
        }
    }
}
