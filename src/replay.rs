use std::io;

use crate::{cache::IsCache, stats::CacheStats, trace::TraceEntry};

/// Drives the baseline and prefetching caches over the same trace.
pub struct Replayer {
    caches: [Box<dyn IsCache>; 2],
    pub replayed: u64,
}

impl Replayer {
    pub fn new(caches: [Box<dyn IsCache>; 2]) -> Self {
        Replayer {
            caches,
            replayed: 0,
        }
    }

    pub fn step(&mut self, entry: TraceEntry) {
        for cache in self.caches.iter_mut() {
            cache.access(entry.addr, entry.is_write());
        }
        self.replayed += 1;
    }

    /// Replays every entry. A read error aborts the run.
    pub fn replay<I>(&mut self, trace: I) -> io::Result<u64>
    where
        I: IntoIterator<Item = io::Result<TraceEntry>>,
    {
        for entry in trace {
            self.step(entry?);
        }
        Ok(self.replayed)
    }

    pub fn report(&self) -> Vec<CacheStats> {
        self.caches.iter().map(|c| c.make_stats()).collect()
    }
}
