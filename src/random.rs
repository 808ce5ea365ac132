//! Random source construction.
//!
//! Every operator takes `&mut R: Rng` explicitly; this module only decides
//! how a run's generator is seeded.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed, falling back to OS entropy.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        for _ in 0..16 {
            assert_eq!(a.random_range(0..1000u32), b.random_range(0..1000u32));
        }
    }

    #[test]
    fn test_rng_from_seed_matches_create_rng() {
        let mut a = rng_from(Some(99));
        let mut b = create_rng(99);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }
}
