//! # Vocabulary

use crate::errors::{BMResult, BytemergeError};
use crate::types::{Symbol, TokenId};

/// The number of single-byte vocabulary entries.
pub const BYTE_VOCAB_SIZE: usize = 256;

/// An ordered ``id -> bytes`` vocabulary.
///
/// Ids are allocated in ascending order: special tokens first, as configured;
/// then the 256 single bytes; then one entry per merge. Later ids are newer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<Symbol>,
    num_specials: usize,
}

impl Vocabulary {
    /// Seed a vocabulary with `special_tokens` and the 256 single bytes.
    pub fn with_specials<S: AsRef<str>>(special_tokens: &[S]) -> Self {
        let mut entries = Vec::with_capacity(special_tokens.len() + BYTE_VOCAB_SIZE);
        entries.extend(special_tokens.iter().map(|s| Symbol::from(s.as_ref())));
        entries.extend((0..=u8::MAX).map(Symbol::from_byte));

        Self {
            entries,
            num_specials: special_tokens.len(),
        }
    }

    /// Append an entry.
    ///
    /// ## Returns
    /// The new entry's id; fails with [`BytemergeError::VocabSizeOverflow`]
    /// when the id space is full.
    pub fn push(
        &mut self,
        symbol: Symbol,
    ) -> BMResult<TokenId> {
        let id = TokenId::try_from(self.entries.len()).map_err(|_| {
            BytemergeError::VocabSizeOverflow {
                size: self.entries.len() + 1,
            }
        })?;
        self.entries.push(symbol);
        Ok(id)
    }

    /// The bytes of token `id`.
    pub fn get(
        &self,
        id: TokenId,
    ) -> Option<&[u8]> {
        self.entries.get(id as usize).map(Symbol::as_bytes)
    }

    /// The id of the single-byte token for `byte`.
    pub fn byte_token(
        &self,
        byte: u8,
    ) -> TokenId {
        (self.num_specials + byte as usize) as TokenId
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of leading special token entries.
    pub fn num_specials(&self) -> usize {
        self.num_specials
    }

    /// The size of the seeded vocabulary: special tokens plus 256 bytes.
    pub fn base_len(&self) -> usize {
        self.num_specials + BYTE_VOCAB_SIZE
    }

    /// Iterate over ``(id, bytes)`` entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &[u8])> {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, s)| (id as TokenId, s.as_bytes()))
    }

    /// Iterate over the special token entries.
    pub fn specials(&self) -> impl Iterator<Item = (TokenId, &[u8])> {
        self.iter().take(self.num_specials)
    }

    /// Iterate over the merged entries.
    pub fn merged(&self) -> impl Iterator<Item = (TokenId, &[u8])> {
        self.iter().skip(self.base_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_layout() {
        let vocab = Vocabulary::with_specials(&["<|endoftext|>", "<|pad|>"]);

        assert_eq!(vocab.len(), 258);
        assert_eq!(vocab.base_len(), 258);
        assert_eq!(vocab.num_specials(), 2);
        assert_eq!(vocab.get(0), Some(b"<|endoftext|>".as_slice()));
        assert_eq!(vocab.get(1), Some(b"<|pad|>".as_slice()));
        assert_eq!(vocab.get(2), Some([0u8].as_slice()));
        assert_eq!(vocab.get(257), Some([255u8].as_slice()));
        assert_eq!(vocab.get(258), None);
        assert_eq!(vocab.byte_token(b'a'), 2 + 97);
        assert_eq!(vocab.specials().count(), 2);
        assert_eq!(vocab.merged().count(), 0);
    }

    #[test]
    fn test_push() {
        let no_specials: &[&str] = &[];
        let mut vocab = Vocabulary::with_specials(no_specials);
        assert_eq!(vocab.len(), 256);
        assert_eq!(vocab.byte_token(0), 0);

        let id = vocab.push(Symbol::from("ab")).unwrap();
        assert_eq!(id, 256);
        assert_eq!(vocab.get(id), Some(b"ab".as_slice()));
        assert_eq!(
            vocab.merged().collect::<Vec<_>>(),
            vec![(256, b"ab".as_slice())]
        );
        assert_eq!(vocab.iter().count(), 257);
    }
}
