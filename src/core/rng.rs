//! Injectable random source for every randomized game decision.
//!
//! Role assignment, night victim tie-breaks, fallback phrases and
//! mention-gap filling all draw from the `GameRng` owned by the game.
//! Tests seed it; production seeds it from the thread RNG.
//!
//! ```
//! use mafia_engine::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! let names = ["민수", "지연", "현우"];
//! assert_eq!(a.choose(&names), b.choose(&names));
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used for all tie-breaking and role assignment.
///
/// Uses ChaCha8 so a seed reproduces an entire game's random choices.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create an RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the thread RNG.
    ///
    /// The seed is kept so a game can be reproduced from its logs.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this stream started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Pick `amount` distinct elements (fewer if the slice is shorter).
    pub fn sample<T: Clone>(&mut self, slice: &[T], amount: usize) -> Vec<T> {
        slice
            .choose_multiple(&mut self.inner, amount)
            .cloned()
            .collect()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_choices() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        let pool = ["a", "b", "c", "d", "e"];

        for _ in 0..50 {
            assert_eq!(rng1.choose(&pool), rng2.choose(&pool));
        }
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = GameRng::new(1);
        let empty: Vec<i32> = vec![];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_sample_is_distinct() {
        let mut rng = GameRng::new(9);
        let pool = vec![1, 2, 3, 4, 5, 6];

        let picked = rng.sample(&pool, 3);
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);

        assert_eq!(rng.sample(&pool, 10).len(), 6);
    }

    #[test]
    fn test_seed_is_kept() {
        let mut rng = GameRng::new(77);
        rng.sample(&[1, 2, 3], 2);
        assert_eq!(rng.seed(), 77);
    }
}
