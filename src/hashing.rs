//! Deterministic `HashMap` and `HashSet` variants. The hashing data structures in the standard
//! library are randomly seeded, which would make log output and seed derivation differ between
//! runs. Use `HashMap::default()` to create a new map.
//!
//! The `hash_str` free function is used in `crate::random` to derive per-purpose seeds.

use std::hash::Hasher;

use rustc_hash::FxHasher;
pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// A convenience method to compute the hash of a `&str`.
#[must_use]
pub fn hash_str(data: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_bytes());
    hasher.finish()
}
