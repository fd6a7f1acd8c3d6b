use std::fmt;

use serde::Serialize;

/// Memory traffic and hit/miss counters for one cache instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub memory_reads: u64,
    pub memory_writes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl Stats {
    pub fn hit(&mut self, is_write: bool) {
        self.cache_hits += 1;
        if is_write {
            self.memory_writes += 1;
        }
    }

    /// A miss always costs one read to fill the line.
    pub fn miss(&mut self, is_write: bool) {
        self.cache_misses += 1;
        self.memory_reads += 1;
        if is_write {
            self.memory_writes += 1;
        }
    }

    /// Prefetch fills are pure read traffic.
    pub fn prefetch_fill(&mut self) {
        self.memory_reads += 1;
    }

    pub fn accesses(&self) -> u64 {
        self.cache_hits + self.cache_misses
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub name: String,
    #[serde(flatten)]
    pub stats: Stats,
    pub miss_rate: f64,
}

impl CacheStats {
    pub fn new(name: String, stats: Stats) -> Self {
        let total = stats.accesses();
        let miss_rate = if total == 0 {
            0.0
        } else {
            stats.cache_misses as f64 / total as f64
        };
        CacheStats {
            name,
            stats,
            miss_rate,
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Memory reads: {}", self.stats.memory_reads)?;
        writeln!(f, "Memory writes: {}", self.stats.memory_writes)?;
        writeln!(f, "Cache hits: {}", self.stats.cache_hits)?;
        writeln!(f, "Cache misses: {}", self.stats.cache_misses)
    }
}
