use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)` driving the transitions.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

/// Pseudo random draws from a seeded ChaCha8 generator.
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeds from OS entropy, so repeated program runs differ.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UniformSource for RandomSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
pub struct CyclicSource {
    samples: Vec<f64>,
    index: usize,
}

impl CyclicSource {
    /// # Panics
    /// If `samples` is empty or holds a value outside `[0, 1)`.
    pub fn new(samples: Vec<f64>) -> Self {
        assert!(!samples.is_empty(), "a cyclic source needs at least one sample");
        assert!(
            samples.iter().all(|s| (0.0..1.0).contains(s)),
            "samples must lie in [0, 1)"
        );
        Self { samples, index: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl UniformSource for CyclicSource {
    fn next_uniform(&mut self) -> f64 {
        let s = self.samples[self.index % self.samples.len()];
        self.index += 1;
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        let mut a = RandomSource::new(42);
        let mut b = RandomSource::new(42);
        for _ in 0..100 {
            let x = a.next_uniform();
            assert_eq!(x, b.next_uniform());
            assert!((0.0..1.0).contains(&x));
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn cyclic_wraps() {
        let mut source = CyclicSource::new(vec![0.1, 0.2, 0.3]);
        let draws: Vec<f64> = (0..7).map(|_| source.next_uniform()).collect();
        assert_eq!(draws, vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1]);
    }

    #[test]
    #[should_panic]
    fn cyclic_rejects_one() {
        CyclicSource::constant(1.0);
    }
}
