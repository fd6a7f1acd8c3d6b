use crate::cache::Block;

use super::Replace;

#[derive(Debug, Default, Clone, Copy)]
pub struct Lru;

impl Replace for Lru {
    fn touch(&mut self, set: &mut [Block], way: usize) {
        on_lru_hit(set, way);
    }
}

/// Makes `way` the most recently used line. Only lines that were younger than
/// it get older, which keeps the ages of a full set a permutation of `0..ways`.
pub fn on_lru_hit(set: &mut [Block], way: usize) {
    let prev_age = set[way].age;
    for (i, block) in set.iter_mut().enumerate() {
        if i == way {
            block.age = 0;
        } else if block.valid && block.age < prev_age {
            block.age += 1;
        }
    }
}
