//! # Common Types and Traits
use core::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A vocabulary token id.
pub type TokenId = u32;

/// An immutable byte sequence treated as one unit during training.
///
/// Symbols start as single bytes and only grow by concatenation.
/// Equality, hashing, and ordering are by exact byte content;
/// ordering is unsigned byte-wise lexicographic, shorter-is-less on a shared prefix.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<[u8]>);

impl Symbol {
    /// Create a single-byte symbol.
    pub fn from_byte(byte: u8) -> Self {
        Self(Arc::from([byte].as_slice()))
    }

    /// Create a symbol from a byte slice.
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Self {
        Self(Arc::from(bytes.as_ref()))
    }

    /// The symbol's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The number of bytes in the symbol.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is this the empty symbol?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the symbol `self ++ other`.
    pub fn concat(
        &self,
        other: &Symbol,
    ) -> Symbol {
        let mut buf = Vec::with_capacity(self.len() + other.len());
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(&other.0);
        Self(buf.into())
    }
}

impl Debug for Symbol {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "b\"{}\"", self.0.escape_ascii())
    }
}

impl AsRef<[u8]> for Symbol {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for Symbol {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for Symbol {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

/// A pair of adjacent symbols.
///
/// Pairs order by their left member, then their right member.
pub type Pair = (Symbol, Symbol);

/// Build a [`Pair`] from two byte-like values.
pub fn pair<A: Into<Symbol>, B: Into<Symbol>>(
    left: A,
    right: B,
) -> Pair {
    (left.into(), right.into())
}

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type CommonHashSet<V> = ahash::AHashSet<V>;
    } else {
        /// Type Alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type CommonHashSet<V> = std::collections::HashSet<V>;
    }
}

/// Compile-time check that a value is `Send`.
pub fn check_is_send<S: Send>(_: &S) {}

/// Compile-time check that a value is `Sync`.
pub fn check_is_sync<S: Sync>(_: &S) {}
