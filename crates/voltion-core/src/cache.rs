// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! TTL memoization for optimizer results.
//!
//! Every access first sweeps entries whose age reached their TTL, so memory
//! stays bounded without a background task. Single-writer by design; callers
//! that share a cache across threads add their own lock around it.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

/// Stable lookup key: an operation tag plus canonically-serialized scalar
/// parameters.
///
/// Callers must keep timestamps and full slot lists out of the parameter
/// bundle; two semantically identical calls made a second apart have to
/// produce the same key. Scalars derived from lists (like their length) are
/// fine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: &'static str,
    params: String,
}

impl CacheKey {
    /// Build a key from an operation tag and a serializable scalar bundle.
    ///
    /// serde_json writes tuple and struct fields in declaration order, which
    /// keeps the serialization canonical for the bundles used here.
    pub fn new<P: Serialize>(operation: &'static str, params: &P) -> Self {
        let params = serde_json::to_string(params).unwrap_or_default();
        Self { operation, params }
    }

    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    created_at: DateTime<Utc>,
    ttl: Duration,
}

/// TTL-bounded result store with lazy purge on every access.
#[derive(Debug, Default)]
pub struct ResultCache<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
}

impl<V: Clone> ResultCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Return the cached value for `key`, or run `compute` and remember its
    /// result for `ttl`.
    pub fn get_or_compute(
        &mut self,
        key: CacheKey,
        ttl: Duration,
        compute: impl FnOnce() -> V,
    ) -> V {
        self.get_or_compute_at(Utc::now(), key, ttl, compute)
    }

    // Injected clock so expiry is testable without sleeping.
    fn get_or_compute_at(
        &mut self,
        now: DateTime<Utc>,
        key: CacheKey,
        ttl: Duration,
        compute: impl FnOnce() -> V,
    ) -> V {
        self.purge_expired(now);

        if let Some(entry) = self.entries.get(&key) {
            debug!("Cache hit for {}", key.operation);
            return entry.value.clone();
        }

        let value = compute();
        self.entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                created_at: now,
                ttl,
            },
        );
        value
    }

    /// Drop every entry whose age reached its TTL.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        self.entries
            .retain(|_, entry| now - entry.created_at < entry.ttl);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_second_access_within_ttl_skips_compute() {
        let mut cache: ResultCache<u32> = ResultCache::new();
        let key = CacheKey::new("discharge", &(10.0_f32, 5.0_f32));
        let mut calls = 0;

        let first = cache.get_or_compute_at(t0(), key.clone(), Duration::seconds(300), || {
            calls += 1;
            42
        });
        let second =
            cache.get_or_compute_at(t0() + Duration::seconds(10), key, Duration::seconds(300), || {
                calls += 1;
                99
            });

        assert_eq!(first, 42);
        assert_eq!(second, 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_entry_expires_exactly_at_ttl() {
        let mut cache: ResultCache<u32> = ResultCache::new();
        let key = CacheKey::new("discharge", &1);
        let mut calls = 0;

        cache.get_or_compute_at(t0(), key.clone(), Duration::seconds(300), || {
            calls += 1;
            1
        });
        let recomputed =
            cache.get_or_compute_at(t0() + Duration::seconds(300), key, Duration::seconds(300), || {
                calls += 1;
                2
            });

        assert_eq!(recomputed, 2);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let mut cache: ResultCache<u32> = ResultCache::new();
        let key = CacheKey::new("arbitrage", &0.05_f32);
        let mut calls = 0;

        for _ in 0..3 {
            cache.get_or_compute_at(t0(), key.clone(), Duration::zero(), || {
                calls += 1;
                7
            });
        }

        assert_eq!(calls, 3);
    }

    #[test]
    fn test_sweep_drops_stale_entries_on_unrelated_access() {
        let mut cache: ResultCache<u32> = ResultCache::new();
        let stale = CacheKey::new("discharge", &1);
        let fresh = CacheKey::new("discharge", &2);

        cache.get_or_compute_at(t0(), stale, Duration::seconds(60), || 1);
        cache.get_or_compute_at(t0() + Duration::seconds(61), fresh, Duration::seconds(60), || 2);

        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_separate_by_operation_and_params() {
        let a = CacheKey::new("discharge", &(5.0_f32, 2));
        let b = CacheKey::new("discharge", &(5.0_f32, 3));
        let c = CacheKey::new("charge", &(5.0_f32, 2));

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, CacheKey::new("discharge", &(5.0_f32, 2)));
    }
}
