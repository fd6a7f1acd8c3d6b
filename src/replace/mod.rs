pub mod fifo;
pub mod lru;

use crate::cache::Block;

/// Policy-specific age transition applied when an access hits.
///
/// Installation and victim selection are shared by every policy, so a
/// policy only decides what a hit does to the ages of its set.
pub trait Replace {
    fn touch(&mut self, set: &mut [Block], way: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessResult {
    Hit,
    Miss,
}

/// Where a newly filled block was placed within its set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Vacant(usize),
    Evicted { way: usize, tag: u64 },
}

pub fn find(set: &[Block], tag: u64) -> Option<usize> {
    set.iter().position(|b| b.valid && b.tag == tag)
}

/// Installs `tag` in `way` as the youngest line and ages every other valid line.
pub fn on_install(set: &mut [Block], way: usize, tag: u64) {
    for (i, block) in set.iter_mut().enumerate() {
        if i == way {
            block.valid = true;
            block.tag = tag;
            block.age = 0;
        } else if block.valid {
            block.age += 1;
        }
    }
}

/// Oldest line in the set, lowest way on ties.
pub fn victim(set: &[Block]) -> usize {
    set.iter()
        .enumerate()
        .fold(0, |oldest, (way, b)| if b.age > set[oldest].age { way } else { oldest })
}

/// Fills `tag` into the lowest vacant way, or evicts the oldest line when the set is full.
pub fn fill(set: &mut [Block], tag: u64) -> Placement {
    let placement = match set.iter().position(|b| !b.valid) {
        Some(way) => Placement::Vacant(way),
        None => {
            let way = victim(set);
            Placement::Evicted {
                way,
                tag: set[way].tag,
            }
        }
    };
    let way = match placement {
        Placement::Vacant(way) | Placement::Evicted { way, .. } => way,
    };
    on_install(set, way, tag);
    placement
}
