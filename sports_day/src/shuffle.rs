//! Shuffling for block assignment, bracket seeding and match queues.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Source of every random permutation the engine makes.
///
/// A seeded shuffler reproduces the same blocks, seeds and match order for
/// equal inputs, which is what "shuffle again" in a UI relies on.
pub struct Shuffler {
    /// Random number generator
    rng: StdRng,
}

impl Shuffler {
    /// Create a shuffler seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a deterministic shuffler
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Return a shuffled copy of `items`
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut copy = items.to_vec();
        self.shuffle(&mut copy);
        copy
    }
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::new()
    }
}
