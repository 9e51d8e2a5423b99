#![forbid(unsafe_code)]

//! Host-side entropy.
//!
//! Interactive hosts inject [`ThreadRandom`] so every run looks different;
//! tests and replay tooling inject `algoscope_core::rng::SplitMix64` with
//! a fixed seed instead.

use algoscope_core::rng::UniformSource;
use rand::Rng as _;
use rand::rngs::ThreadRng;

/// OS-entropy-backed uniform source.
pub struct ThreadRandom {
    rng: ThreadRng,
}

impl ThreadRandom {
    /// Create a source over the calling thread's generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "next_below requires a non-zero bound");
        self.rng.gen_range(0..bound)
    }
}

impl std::fmt::Debug for ThreadRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadRandom").finish_non_exhaustive()
    }
}
