//! Bounded cache of previously produced token arrays.
//!
//! A delta request names the result it wants to diff against, so the cache
//! keeps a short history per key rather than only the latest array. Each
//! key holds at most `max_entries_per_key` entries; putting into a full list
//! evicts the oldest entry first.
//!
//! ## Document lifecycle
//!
//! Entries are not invalidated on `didChange`: the previous array is exactly
//! what a delta request needs. They are dropped on `didClose` through
//! [`ResultCache::remove_key`].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::analysis::ResultId;
use crate::analysis::semantic::TokenArray;
use crate::error::{LockResultExt, SemanticError, SemanticResult};

#[derive(Debug, Clone)]
struct CacheEntry {
    result_id: ResultId,
    tokens: TokenArray,
}

/// Thread-safe result cache.
///
/// All keys share one lock; every operation holds it only for a list
/// lookup and a small `Vec` edit.
#[derive(Debug)]
pub struct ResultCache<K> {
    entries: Mutex<HashMap<K, Vec<CacheEntry>>>,
    max_entries_per_key: AtomicUsize,
}

fn validate_max_entries(max_entries_per_key: usize) -> SemanticResult<()> {
    if max_entries_per_key == 0 {
        return Err(SemanticError::invalid_argument(
            "maxEntriesPerKey must be at least 1",
        ));
    }
    Ok(())
}

impl<K: Eq + Hash + Clone> ResultCache<K> {
    pub fn new(max_entries_per_key: usize) -> SemanticResult<Self> {
        validate_max_entries(max_entries_per_key)?;
        Ok(Self {
            entries: Mutex::new(HashMap::new()),
            max_entries_per_key: AtomicUsize::new(max_entries_per_key),
        })
    }

    pub fn max_entries_per_key(&self) -> usize {
        self.max_entries_per_key.load(Ordering::Acquire)
    }

    /// Change the per-key bound, trimming lists that are now too long.
    pub fn set_max_entries_per_key(&self, max_entries_per_key: usize) -> SemanticResult<()> {
        validate_max_entries(max_entries_per_key)?;
        let mut entries = self
            .entries
            .lock()
            .recover_poison("ResultCache::set_max_entries_per_key")?;
        self.max_entries_per_key
            .store(max_entries_per_key, Ordering::Release);
        for list in entries.values_mut() {
            if list.len() > max_entries_per_key {
                list.drain(..list.len() - max_entries_per_key);
            }
        }
        Ok(())
    }

    /// Store `tokens` under `result_id`, evicting the oldest entry when the
    /// key is full.
    pub fn put(&self, key: K, result_id: ResultId, tokens: TokenArray) -> SemanticResult<()> {
        let mut entries = self.entries.lock().recover_poison("ResultCache::put")?;
        let max = self.max_entries_per_key();
        let list = entries.entry(key).or_default();
        while list.len() >= max {
            let evicted = list.remove(0);
            log::trace!(
                target: "razor_tokens::result_cache",
                "Evicted result_id '{}' ({} ints)",
                evicted.result_id,
                evicted.tokens.len()
            );
        }
        list.push(CacheEntry { result_id, tokens });
        Ok(())
    }

    /// Look up the array produced under `result_id` for `key`.
    pub fn get(&self, key: &K, result_id: &ResultId) -> SemanticResult<Option<TokenArray>> {
        let entries = self.entries.lock().recover_poison("ResultCache::get")?;
        Ok(entries.get(key).and_then(|list| {
            list.iter()
                .rev()
                .find(|entry| &entry.result_id == result_id)
                .map(|entry| entry.tokens.clone())
        }))
    }

    /// Drop every entry for `key`. Returns whether anything was cached.
    pub fn remove_key(&self, key: &K) -> SemanticResult<bool> {
        let mut entries = self.entries.lock().recover_poison("ResultCache::remove_key")?;
        let removed = entries.remove(key);
        if let Some(list) = &removed {
            log::debug!(
                target: "razor_tokens::result_cache",
                "Removed {} cached result(s)",
                list.len()
            );
        }
        Ok(removed.is_some())
    }

    pub fn len_for(&self, key: &K) -> SemanticResult<usize> {
        let entries = self.entries.lock().recover_poison("ResultCache::len_for")?;
        Ok(entries.get(key).map_or(0, Vec::len))
    }
}
