use std::{iter, ops::Range};

use crate::{
    replace::{self, AccessResult, Placement, Replace},
    stats::{CacheStats, Stats},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr {
    pub offset: u64,
    pub set: usize,
    pub tag: u64,
}

impl Addr {
    /// Rebuilds the block id from the tag and set index.
    #[cfg(test)]
    pub fn block_id(&self, set_bits: u32) -> u64 {
        (self.tag << set_bits) | self.set as u64
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BitSection {
    shift: u32,
    mask: u64,
}

impl BitSection {
    fn apply(&self, num: u64) -> u64 {
        num.checked_shr(self.shift).unwrap_or(0) & self.mask
    }
}

/// Validated cache shape. Both counts are powers of two and non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub block_size: u64,
    pub n_sets: usize,
    pub n_ways: usize,
}

impl Geometry {
    pub fn block_bits(&self) -> u32 {
        self.block_size.ilog2()
    }

    pub fn set_bits(&self) -> u32 {
        self.n_sets.ilog2()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub valid: bool,
    pub tag: u64,
    pub age: usize,
}

#[derive(Debug)]
pub struct Cache<R: Replace> {
    name: String,
    pub blocks: Vec<Block>,
    pub block_size: u64,
    pub n_ways: usize,
    pub n_sets: usize,
    offset_sec: BitSection,
    set_sec: BitSection,
    tag_sec: BitSection,
    pub prefetching: bool,
    pub stats: Stats,
    pub repl: R,
}

impl<R: Replace> Cache<R> {
    pub fn new(name: String, geometry: Geometry, prefetch: bool, repl: R) -> Self {
        let Geometry {
            block_size,
            n_sets,
            n_ways,
        } = geometry;
        assert!(block_size.is_power_of_two());
        assert!(n_sets.is_power_of_two());
        assert!(n_ways > 0);

        let offset_sec = BitSection {
            shift: 0,
            mask: block_size - 1,
        };

        let set_shift = geometry.block_bits();
        // A single set (fully associative) has no index bits, so every block maps to set 0.
        let set_sec = BitSection {
            shift: set_shift,
            mask: n_sets as u64 - 1,
        };

        let tag_shift = geometry.set_bits() + set_shift;
        let tag_sec = BitSection {
            shift: tag_shift,
            mask: u64::MAX,
        };

        Cache {
            name,
            blocks: iter::repeat_with(Block::default)
                .take(n_sets * n_ways)
                .collect(),
            block_size,
            n_ways,
            n_sets,
            offset_sec,
            set_sec,
            tag_sec,
            prefetching: prefetch,
            stats: Stats::default(),
            repl,
        }
    }

    pub(crate) fn set_mut(&mut self, set: usize) -> &mut [Block] {
        let range = self.get_set(set);
        &mut self.blocks[range]
    }
}

pub trait IsCache {
    fn access(&mut self, addr: u64, is_write: bool) -> AccessResult;
    fn split_addr(&self, addr: u64) -> Addr;
    fn get_set(&self, set: usize) -> Range<usize>;
    fn name(&self) -> &str;
    fn stats(&self) -> Stats;

    fn make_stats(&self) -> CacheStats {
        CacheStats::new(self.name().to_owned(), self.stats())
    }
}

impl<R: Replace> IsCache for Cache<R> {
    fn access(&mut self, addr: u64, is_write: bool) -> AccessResult {
        let split = self.split_addr(addr);
        let range = self.get_set(split.set);
        let set = &mut self.blocks[range];

        if let Some(way) = replace::find(set, split.tag) {
            self.repl.touch(set, way);
            self.stats.hit(is_write);
            log::trace!(
                "{}: hit {addr:#x} set {} way {way} offset {}",
                self.name,
                split.set,
                split.offset
            );
            return AccessResult::Hit;
        }

        match replace::fill(set, split.tag) {
            Placement::Vacant(way) => {
                log::trace!("{}: miss {addr:#x} set {} fill way {way}", self.name, split.set)
            }
            Placement::Evicted { way, tag } => log::trace!(
                "{}: miss {addr:#x} set {} evict way {way} tag {tag:#x}",
                self.name,
                split.set
            ),
        }
        self.stats.miss(is_write);

        if self.prefetching {
            self.prefetch(addr.wrapping_add(self.block_size));
        }
        AccessResult::Miss
    }

    fn split_addr(&self, addr: u64) -> Addr {
        let offset = self.offset_sec.apply(addr);
        let set = self.set_sec.apply(addr) as usize;
        let tag = self.tag_sec.apply(addr);
        Addr { offset, set, tag }
    }

    fn get_set(&self, set: usize) -> Range<usize> {
        debug_assert!(set < self.n_sets);
        set * self.n_ways..(set + 1) * self.n_ways
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> Stats {
        self.stats
    }
}
