// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TTL-based in-process caching
//!
//! Used for autocomplete responses and for fetched page content.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use url::Url;

/// TTL cache keyed by a normalized string
pub struct TtlCache<V> {
    cache: RwLock<HashMap<String, CachedEntry<V>>>,
    ttl: Duration,
    max_entries: usize,
    normalize: fn(&str) -> String,
}

struct CachedEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V: Clone> TtlCache<V> {
    /// Cache whose keys are lowercased and trimmed (query text)
    pub fn for_queries(ttl_secs: u64, max_entries: usize) -> Self {
        Self::with_normalizer(ttl_secs, max_entries, query_key)
    }

    /// Cache keyed by URL: scheme and host are case-insensitive, the path and
    /// query are not; a trailing slash and the fragment are ignored
    pub fn for_urls(ttl_secs: u64, max_entries: usize) -> Self {
        Self::with_normalizer(ttl_secs, max_entries, url_key)
    }

    fn with_normalizer(ttl_secs: u64, max_entries: usize, normalize: fn(&str) -> String) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
            normalize,
        }
    }

    /// Returns None if not found or expired
    pub fn get(&self, key: &str) -> Option<V> {
        let cache = self.cache.read().ok()?;
        let entry = cache.get(&(self.normalize)(key))?;

        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }

        Some(entry.value.clone())
    }

    pub fn insert(&self, key: &str, value: V) {
        let mut cache = match self.cache.write() {
            Ok(c) => c,
            Err(_) => return,
        };

        let key = (self.normalize)(key);
        if cache.len() >= self.max_entries && !cache.contains_key(&key) {
            Self::evict_oldest(&mut cache);
        }

        cache.insert(
            key,
            CachedEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    fn evict_oldest(cache: &mut HashMap<String, CachedEntry<V>>) {
        if let Some(oldest_key) = cache
            .iter()
            .min_by_key(|(_, v)| v.inserted_at)
            .map(|(k, _)| k.clone())
        {
            cache.remove(&oldest_key);
        }
    }
}

fn query_key(query: &str) -> String {
    query.trim().to_lowercase()
}

fn url_key(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(mut parsed) => {
            // The parser already lowercases scheme and host
            parsed.set_fragment(None);
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => url.trim().trim_end_matches('/').to_string(),
    }
}
