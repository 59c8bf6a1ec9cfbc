use rand::Rng;

/// Source of uniformly distributed indices.
pub trait RandomSource: Send + Sync {
    /// Returns a value in `0..bound`. `bound` is never zero.
    fn next_index(&self, bound: usize) -> usize;
}

/// Thread-local RNG, independent draw per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}
