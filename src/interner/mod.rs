//! Deduplication of path strings.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Returns a canonical shared instance for every distinct string.
pub trait StringInterner {
    fn intern(&self, value: &str) -> Arc<str>;
}

/// Interner backed by a set of shared strings that lives as long as the interner.
///
/// Entries are never evicted: snapshots keep their paths alive anyway.
#[derive(Debug, Default)]
pub struct DefaultStringInterner {
    strings: Mutex<HashSet<Arc<str>>>,
}

impl DefaultStringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.strings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StringInterner for DefaultStringInterner {
    fn intern(&self, value: &str) -> Arc<str> {
        let mut strings = self.strings.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = strings.get(value) {
            return existing.clone();
        }
        let interned: Arc<str> = Arc::from(value);
        strings.insert(interned.clone());
        interned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_strings_share_one_instance() {
        let interner = DefaultStringInterner::new();
        let first = interner.intern("/project/src/main.rs");
        let second = interner.intern(&String::from("/project/src/main.rs"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_different_strings_are_kept_apart() {
        let interner = DefaultStringInterner::new();
        let first = interner.intern("/a");
        let second = interner.intern("/b");

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(&*first, "/a");
        assert_eq!(&*second, "/b");
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_new_interner_is_empty() {
        assert!(DefaultStringInterner::new().is_empty());
    }
}
