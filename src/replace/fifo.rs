use crate::cache::Block;

use super::Replace;

/// First-in first-out: ages only move on installation, so a hit leaves the
/// eviction order untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fifo;

impl Replace for Fifo {
    fn touch(&mut self, _set: &mut [Block], _way: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replace::{fill, tests::ages, victim};

    #[test]
    fn hits_do_not_reorder() {
        let mut set = vec![Block::default(); 3];
        for tag in 0..3 {
            fill(&mut set, tag);
        }
        let before = ages(&set);
        for _ in 0..5 {
            Fifo.touch(&mut set, 0);
        }
        assert_eq!(ages(&set), before);
        assert_eq!(victim(&set), 0);
    }
}
