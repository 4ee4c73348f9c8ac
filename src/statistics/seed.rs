//! Deterministic seed derivation for independent random streams.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Counter-based RNG seed generation using SplitMix64.
///
/// Stateless: stream `counter` of base seed `base_seed` is the same whether
/// runs execute sequentially or on a thread pool, in any order.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    // See: https://xoshiro.di.unimi.it/splitmix64.c
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// RNG for stream `counter` of `base_seed`.
pub fn stream_rng(base_seed: u64, counter: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(base_seed, counter))
}

/// Seed to use when the caller did not provide one.
pub fn entropy_seed() -> u64 {
    rand::random()
}
