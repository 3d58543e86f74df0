//! # Word Counter

use crate::errors::BMResult;
use crate::training::{CountType, StringChunkType};
use crate::types::CommonHashMap;

/// A multiset of pretokenized words.
///
/// Counters combine by summing frequencies; merging is commutative and
/// associative, so partial counters from independent chunks may be reduced
/// in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCounter<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    word_counts: CommonHashMap<K, C>,
}

impl<K, C> Default for WordCounter<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    fn default() -> Self {
        Self {
            word_counts: CommonHashMap::default(),
        }
    }
}

impl<K, C> WordCounter<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a counter from ``(word, count)`` entries, summing repeats.
    pub fn from_counts<I>(counts: I) -> BMResult<Self>
    where
        I: IntoIterator<Item = (K, C)>,
    {
        let mut counter = Self::default();
        for (word, count) in counts {
            counter.add_count(word, count)?;
        }
        Ok(counter)
    }

    /// Count one occurrence of `word`.
    ///
    /// Fails with [`BytemergeError::CountOverflow`](crate::errors::BytemergeError::CountOverflow)
    /// when the count no longer fits in `C`.
    pub fn add_word(
        &mut self,
        word: &str,
    ) -> BMResult<()> {
        match self.word_counts.get_mut(word) {
            Some(count) => *count = count.try_add(C::one())?,
            None => {
                self.word_counts.insert(K::from(word), C::one());
            }
        }
        Ok(())
    }

    /// Add `count` occurrences of `word`; zero counts are ignored.
    pub fn add_count(
        &mut self,
        word: K,
        count: C,
    ) -> BMResult<()> {
        if count.is_zero() {
            return Ok(());
        }
        let total = self.word_counts.entry(word).or_default();
        *total = total.try_add(count)?;
        Ok(())
    }

    /// Sum another counter into this one.
    pub fn merge(
        &mut self,
        mut other: Self,
    ) -> BMResult<()> {
        if other.word_counts.len() > self.word_counts.len() {
            core::mem::swap(self, &mut other);
        }
        for (word, count) in other.word_counts {
            self.add_count(word, count)?;
        }
        Ok(())
    }

    /// The count of `word`; zero when absent.
    pub fn get(
        &self,
        word: &str,
    ) -> C {
        self.word_counts.get(word).copied().unwrap_or_default()
    }

    /// The number of distinct words.
    pub fn len(&self) -> usize {
        self.word_counts.len()
    }

    /// Are there no words?
    pub fn is_empty(&self) -> bool {
        self.word_counts.is_empty()
    }

    /// The total number of word occurrences.
    pub fn total(&self) -> u128 {
        self.word_counts
            .values()
            .map(|c| c.widen())
            .sum()
    }

    /// Iterate over ``(word, count)`` entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &C)> {
        self.word_counts.iter()
    }

    /// Release the word counts and return them.
    pub fn release(self) -> CommonHashMap<K, C> {
        self.word_counts
    }
}

#[cfg(test)]
mod tests {
    use compact_str::CompactString;

    use super::*;
    use crate::errors::BytemergeError;

    fn sorted<K: StringChunkType, C: CountType>(counter: &WordCounter<K, C>) -> Vec<(String, C)> {
        let mut items = counter
            .iter()
            .map(|(k, c)| (k.as_ref().to_string(), *c))
            .collect::<Vec<_>>();
        items.sort();
        items
    }

    #[test]
    fn test_add_and_get() {
        let mut counter: WordCounter<String, u64> = WordCounter::new();
        assert!(counter.is_empty());

        counter.add_word("world").unwrap();
        counter.add_word("hello").unwrap();
        counter.add_word("world").unwrap();
        counter.add_count("foo".to_string(), 0).unwrap();

        assert_eq!(counter.len(), 2);
        assert_eq!(counter.get("world"), 2);
        assert_eq!(counter.get("hello"), 1);
        assert_eq!(counter.get("foo"), 0);
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a: WordCounter<CompactString, u32> =
            WordCounter::from_counts([("a".into(), 1), ("b".into(), 2)]).unwrap();
        let b: WordCounter<CompactString, u32> =
            WordCounter::from_counts([("b".into(), 3), ("c".into(), 4), ("d".into(), 1)]).unwrap();

        let mut ab = a.clone();
        ab.merge(b.clone()).unwrap();

        let mut ba = b;
        ba.merge(a).unwrap();

        assert_eq!(sorted(&ab), sorted(&ba));
        assert_eq!(
            sorted(&ab),
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 5),
                ("c".to_string(), 4),
                ("d".to_string(), 1),
            ]
        );
        assert_eq!(ab.release().len(), 4);
    }

    #[test]
    fn test_count_overflow() {
        let mut counter: WordCounter<String, u8> = WordCounter::new();
        for _ in 0..255 {
            counter.add_word("ab").unwrap();
        }
        assert_eq!(counter.get("ab"), 255);
        assert!(matches!(
            counter.add_word("ab"),
            Err(BytemergeError::CountOverflow { value: 256 })
        ));

        let other: WordCounter<String, u8> =
            WordCounter::from_counts([("ab".to_string(), 1), ("cd".to_string(), 3)]).unwrap();
        assert!(matches!(
            counter.merge(other),
            Err(BytemergeError::CountOverflow { value: 256 })
        ));

        assert!(matches!(
            WordCounter::<String, u8>::from_counts([("x".to_string(), 200), ("x".to_string(), 100)]),
            Err(BytemergeError::CountOverflow { value: 300 })
        ));
    }
}
