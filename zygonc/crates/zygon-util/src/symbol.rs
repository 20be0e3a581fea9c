//! Global string interner.
//!
//! Identifiers and table-key names are interned so that `Symbol` equality is
//! an integer comparison rather than a string comparison, and so `Value`
//! clones stay cheap. The interner is process-wide and lock-free, built on
//! `DashMap` for concurrent access even though the evaluator itself only
//! ever drives it from one thread.

use ahash::AHasher;
use dashmap::DashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

struct StringTable {
    map: DashMap<u64, (&'static str, u32)>,
    strings: DashMap<u32, &'static str>,
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity(256),
            strings: DashMap::with_capacity(256),
            next_index: AtomicU32::new(0),
        }
    }

    fn hash_of(s: &str) -> u64 {
        let mut hasher = AHasher::default();
        s.hash(&mut hasher);
        hasher.finish()
    }

    fn intern(&self, s: &str) -> u32 {
        let hash = Self::hash_of(s);
        if let Some(entry) = self.map.get(&hash) {
            if entry.0 == s {
                return entry.1;
            }
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.map.insert(hash, (leaked, index));
        self.strings.insert(index, leaked);
        index
    }

    fn resolve(&self, index: u32) -> &'static str {
        self.strings
            .get(&index)
            .map(|s| *s)
            .expect("symbol index must have been produced by intern()")
    }
}

/// An interned identifier or table-key name.
///
/// Two symbols compare equal iff the strings they were interned from are
/// equal; comparison never touches the underlying string data.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Interns `s`, returning a handle stable for the lifetime of the process.
    pub fn intern(s: &str) -> Self {
        Symbol(STRING_TABLE.intern(s))
    }

    /// Returns the original string this symbol was interned from.
    pub fn as_str(self) -> &'static str {
        STRING_TABLE.resolve(self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::intern(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_symbol() {
        let a = Symbol::intern("pub");
        let b = Symbol::intern("pub");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "pub");
    }

    #[test]
    fn different_strings_intern_to_different_symbols() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("bar");
        assert_ne!(a, b);
    }
}
