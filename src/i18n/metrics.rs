//! Translation lookup metrics.
//!
//! Counts how translation keys were resolved: directly from the active
//! locale's table, from the canonical fallback table, or not at all (the raw
//! key was displayed). Exposed as JSON on `/i18n/metrics`.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global lookup metrics singleton.
pub struct LookupMetrics {
    /// Key found in the active locale's table
    direct_hits: AtomicUsize,

    /// Key missing from the active table but found in the canonical table
    fallback_hits: AtomicUsize,

    /// Key missing everywhere; the key itself was returned
    misses: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<LookupMetrics> = OnceLock::new();

impl LookupMetrics {
    /// Get the global lookup metrics instance.
    pub fn global() -> &'static LookupMetrics {
        METRICS.get_or_init(LookupMetrics::new)
    }

    /// Create a detached set of counters, starting at zero.
    pub fn new() -> Self {
        Self {
            direct_hits: AtomicUsize::new(0),
            fallback_hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn record_direct_hit(&self) {
        self.direct_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_hit(&self) {
        self.fallback_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn direct_hits(&self) -> usize {
        self.direct_hits.load(Ordering::Relaxed)
    }

    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let direct = self.direct_hits();
        let fallback = self.fallback_hits();
        let misses = self.misses();
        let total = direct + fallback + misses;
        let coverage_rate = if total > 0 {
            (direct as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            direct_hits: direct,
            fallback_hits: fallback,
            misses,
            total_lookups: total,
            coverage_rate,
        }
    }
}

impl Default for LookupMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the lookup counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub direct_hits: usize,
    pub fallback_hits: usize,
    pub misses: usize,
    pub total_lookups: usize,

    /// Share of lookups served by the active locale, as a percentage (0-100)
    pub coverage_rate: f64,
}
