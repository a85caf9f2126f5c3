//! Content hashing.

mod file_hasher;
mod hash_code;

pub use file_hasher::{FileHasher, MetroFileHasher};
pub use hash_code::{HashCode, HashCombiner};
