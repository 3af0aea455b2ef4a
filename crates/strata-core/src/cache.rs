//! Goal completion cache using moka
//!
//! Goal completion is never persisted. Caching it between reads is optional
//! and only correct if every objective mutation invalidates the goals it
//! touched; [`PlanningService`](crate::PlanningService) does that after each
//! commit.

use crate::config::CacheConfig;
use moka::sync::Cache;
use std::time::Duration;
use strata_domain::{GoalId, Percent};

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of cached goals
    pub entry_count: u64,
}

/// Cache of computed goal completions
#[derive(Debug, Clone)]
pub struct GoalCompletionCache {
    inner: Cache<GoalId, Percent>,
}

impl GoalCompletionCache {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Build from configuration, `None` when caching is disabled
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        Some(match config.ttl() {
            Some(ttl) => Self::with_ttl(config.max_capacity, ttl),
            None => Self::new(config.max_capacity),
        })
    }

    /// Cached completion for a goal
    #[inline]
    #[must_use]
    pub fn get(&self, goal: &GoalId) -> Option<Percent> {
        self.inner.get(goal)
    }

    /// Store a computed completion
    #[inline]
    pub fn insert(&self, goal: GoalId, completion: Percent) {
        self.inner.insert(goal, completion);
    }

    /// Get or compute a goal's completion
    pub fn get_or_insert_with<E, F>(&self, goal: &GoalId, compute: F) -> Result<Percent, E>
    where
        F: FnOnce() -> Result<Percent, E>,
    {
        if let Some(cached) = self.get(goal) {
            tracing::trace!(%goal, %cached, "goal completion cache hit");
            return Ok(cached);
        }

        let completion = compute()?;
        tracing::trace!(%goal, %completion, "goal completion cache miss");
        self.insert(goal.clone(), completion);
        Ok(completion)
    }

    /// Drop a goal's cached completion
    #[inline]
    pub fn invalidate(&self, goal: &GoalId) {
        self.inner.invalidate(goal);
    }

    /// Drop every cached completion
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Check if a goal is cached
    #[inline]
    #[must_use]
    pub fn contains(&self, goal: &GoalId) -> bool {
        self.inner.contains_key(goal)
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for GoalCompletionCache {
    /// Create cache with default capacity (10,000 goals)
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pct(v: u32) -> Percent {
        Percent::new(v).unwrap()
    }

    #[test]
    fn cache_insert_and_get() {
        let cache = GoalCompletionCache::new(100);
        let goal = GoalId::new("g1");

        cache.insert(goal.clone(), pct(42));
        assert_eq!(cache.get(&goal), Some(pct(42)));
        assert_eq!(cache.get(&GoalId::new("missing")), None);
    }

    #[test]
    fn cache_get_or_insert_with() {
        let cache = GoalCompletionCache::new(100);
        let goal = GoalId::new("g1");
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_insert_with(&goal, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(pct(65))
            })
            .unwrap();
        assert_eq!(first, pct(65));

        // Second call should use cache
        let second = cache
            .get_or_insert_with(&goal, || -> Result<Percent, Infallible> {
                unreachable!("should use cached value")
            })
            .unwrap();
        assert_eq!(second, pct(65));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_compute_is_not_cached() {
        let cache = GoalCompletionCache::new(100);
        let goal = GoalId::new("g1");

        let err = cache.get_or_insert_with(&goal, || Err::<Percent, _>("store down"));
        assert_eq!(err, Err("store down"));
        assert!(!cache.contains(&goal));
    }

    #[test]
    fn cache_invalidation() {
        let cache = GoalCompletionCache::new(100);
        let goal = GoalId::new("g1");

        cache.insert(goal.clone(), pct(10));
        assert!(cache.contains(&goal));

        cache.invalidate(&goal);
        assert!(!cache.contains(&goal));
    }

    #[test]
    fn cache_stats() {
        let cache = GoalCompletionCache::new(100);
        for i in 0..5 {
            cache.insert(GoalId::new(format!("g{i}")), pct(i * 10));
        }
        assert_eq!(cache.stats().entry_count, 5);

        cache.invalidate_all();
        assert!(cache.get(&GoalId::new("g0")).is_none());
    }

    #[test]
    fn disabled_config_builds_nothing() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        assert!(GoalCompletionCache::from_config(&config).is_none());
        assert!(GoalCompletionCache::from_config(&CacheConfig::default()).is_some());
    }
}
