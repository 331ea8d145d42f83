//! Seeded random number generators.
//!
//! Every consumer draws from its own named stream, seeded from the base seed plus a hash of the
//! stream name. Adding or removing one consumer therefore never shifts the numbers another
//! consumer sees.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::hashing::hash_str;

/// Returns the generator for the stream `name` under `base_seed`.
#[must_use]
pub fn get_rng(base_seed: u64, name: &str) -> StdRng {
    let seed_offset = hash_str(name);
    StdRng::seed_from_u64(base_seed.wrapping_add(seed_offset))
}
