use crate::{
    cache::{Cache, IsCache},
    replace::{self, Placement, Replace},
};

impl<R: Replace> Cache<R> {
    /// Brings the block holding `addr` into the cache ahead of demand.
    ///
    /// A resident block is left alone, ages included. Otherwise the fill is
    /// charged as one memory read and placed exactly like a demand miss, but it
    /// never counts as a hit or miss and never prefetches further.
    pub fn prefetch(&mut self, addr: u64) -> bool {
        let split = self.split_addr(addr);
        let set = self.set_mut(split.set);
        if replace::find(set, split.tag).is_some() {
            return false;
        }

        let placement = replace::fill(set, split.tag);
        self.stats.prefetch_fill();
        match placement {
            Placement::Vacant(way) => log::trace!(
                "{}: prefetch {addr:#x} set {} fill way {way}",
                self.name(),
                split.set
            ),
            Placement::Evicted { way, tag } => log::trace!(
                "{}: prefetch {addr:#x} set {} evict way {way} tag {tag:#x}",
                self.name(),
                split.set
            ),
        }
        true
    }
}
