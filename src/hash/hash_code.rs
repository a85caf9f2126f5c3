use std::hash::Hasher;

use derive_more::{Display, From, Into};
use metrohash::MetroHash64;

/// A 64-bit content hash, shown as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0:016x}")]
pub struct HashCode(u64);

impl HashCode {
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = MetroHash64::default();
        hasher.write(bytes);
        Self(hasher.finish())
    }
}

/// Folds named child hashes into one, order-sensitively.
#[derive(Default)]
pub struct HashCombiner {
    hasher: MetroHash64,
}

impl HashCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_named(&mut self, name: &str, hash: HashCode) {
        self.hasher.write(name.as_bytes());
        // Separator keeps ("ab", "c") apart from ("a", "bc").
        self.hasher.write_u8(0);
        self.hasher.write_u64(hash.0);
    }

    pub fn finish(&self) -> HashCode {
        HashCode(self.hasher.finish())
    }
}
