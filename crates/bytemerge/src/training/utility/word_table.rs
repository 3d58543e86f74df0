//! # Word Table

use crate::training::utility::pair_counts::{PairDeltaMap, PairIndexMap};
use crate::training::{CountType, StringChunkType};
use crate::types::{Pair, Symbol};

/// An index into a [`WordTable`].
pub type WordId = usize;

/// A distinct pretokenized word, and its current symbol sequence.
///
/// Iteratively rewritten during BPE vocabulary training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    key: K,
    symbols: Vec<Symbol>,
    count: C,
}

impl<K, C> WordEntry<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    const DEC: i32 = -1;
    const INC: i32 = 1;

    /// Create an entry with one symbol per byte of `key`.
    pub fn new(
        key: K,
        count: C,
    ) -> Self {
        let symbols = key.as_ref().bytes().map(Symbol::from_byte).collect();
        Self::from_symbols(key, symbols, count)
    }

    /// Create an entry from an explicit symbol sequence.
    pub fn from_symbols(
        key: K,
        symbols: Vec<Symbol>,
        count: C,
    ) -> Self {
        Self {
            key,
            symbols,
            count,
        }
    }

    /// The word key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The UTF-8 bytes of the word key.
    pub fn key_bytes(&self) -> &[u8] {
        self.key.as_ref().as_bytes()
    }

    /// The current symbol sequence.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The number of occurrences of this word in the corpus.
    pub fn count(&self) -> C {
        self.count
    }

    /// The number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Is the symbol sequence empty?
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Get an iterator over the adjacent [`Pair`] windows of this word.
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        self.symbols
            .windows(2)
            .map(|w| (w[0].clone(), w[1].clone()))
    }

    /// Does `pair` occur adjacently in the current symbols?
    pub fn contains_pair(
        &self,
        pair: &Pair,
    ) -> bool {
        self.symbols
            .windows(2)
            .any(|w| w[0] == pair.0 && w[1] == pair.1)
    }

    /// Merge all non-overlapping occurrences of `pair -> replacement`, left to right.
    ///
    /// After a merge, scanning resumes at the symbol following the merged one,
    /// so ``[a, a, a]`` merges ``(a, a)`` once, into ``[aa, a]``.
    ///
    /// # Arguments
    /// * `pair` - the pair to merge.
    /// * `replacement` - the symbol to replace `pair` with; its concatenation.
    /// * `on_merge` - a callback invoked for each flanking pair change.
    ///   The function is called with:
    ///   - `pair` - the flanking pair.
    ///   - `delta` - `+1` for an added pair, `-1` for a removed pair.
    ///
    /// The merged pair itself is never reported.
    pub fn merge_pair_cb<F>(
        &mut self,
        pair: &Pair,
        replacement: &Symbol,
        on_merge: &mut F,
    ) where
        F: FnMut(Pair, i32),
    {
        let (a, b) = pair;
        let n = self.symbols.len();

        if n < 2 {
            return;
        }

        let mut emit = |p: Pair, delta: i32| {
            if &p != pair {
                on_merge(p, delta);
            }
        };

        let mut new_symbols: Vec<Symbol> = Vec::with_capacity(n);

        let mut i = 0;
        while i < n {
            let current = &self.symbols[i];

            if i + 1 < n && current == a && &self.symbols[i + 1] == b {
                // Previous pair.
                if let Some(x) = new_symbols.last() {
                    emit((x.clone(), a.clone()), Self::DEC);
                    emit((x.clone(), replacement.clone()), Self::INC);
                }

                // Next pair.
                if i + 2 < n {
                    let y = &self.symbols[i + 2];
                    emit((b.clone(), y.clone()), Self::DEC);
                    emit((replacement.clone(), y.clone()), Self::INC);
                }

                new_symbols.push(replacement.clone());

                // Skip 'a' and 'b'.
                i += 2;
            } else {
                new_symbols.push(current.clone());
                i += 1;
            }
        }

        self.symbols = new_symbols;
    }

    /// Merge all non-overlapping occurrences of `pair`.
    ///
    /// # Returns
    /// The net per-occurrence pair deltas for this word, unscaled by its count.
    /// Pairs whose changes cancel out are omitted.
    pub fn merge_pair(
        &mut self,
        pair: &Pair,
    ) -> PairDeltaMap {
        let replacement = pair.0.concat(&pair.1);

        let mut deltas = PairDeltaMap::default();
        self.merge_pair_cb(pair, &replacement, &mut |p, d| {
            *deltas.entry(p).or_default() += i64::from(d);
        });
        deltas.retain(|_, d| *d != 0);
        deltas
    }
}

/// The per-word training state: every distinct word, sorted by key.
///
/// Ids are positions in key order, and are stable for the life of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTable<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    words: Vec<WordEntry<K, C>>,
}

impl<K, C> Default for WordTable<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    fn default() -> Self {
        Self { words: Vec::new() }
    }
}

impl<K, C> WordTable<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    /// Build the word table and its initial pair location index.
    ///
    /// Every word starts as one symbol per byte. A word is registered once
    /// under each distinct adjacent pair it contains. Zero counts are skipped.
    ///
    /// ## Arguments
    /// * `word_counts` - distinct ``(word, count)`` entries.
    ///
    /// ## Returns
    /// ``(table, location_index)``
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn reform<I>(word_counts: I) -> (Self, PairIndexMap)
    where
        I: IntoIterator<Item = (K, C)>,
    {
        let mut items: Vec<(K, C)> = word_counts
            .into_iter()
            .filter(|(_, c)| !c.is_zero())
            .collect();
        items.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        let byte_symbols: Vec<Symbol> = (0..=u8::MAX).map(Symbol::from_byte).collect();

        let mut location_index = PairIndexMap::default();
        let mut words = Vec::with_capacity(items.len());

        for (id, (key, count)) in items.into_iter().enumerate() {
            let symbols: Vec<Symbol> = key
                .as_ref()
                .bytes()
                .map(|b| byte_symbols[b as usize].clone())
                .collect();
            let entry = WordEntry::from_symbols(key, symbols, count);

            for p in entry.pairs() {
                location_index.entry(p).or_default().insert(id);
            }
            words.push(entry);
        }

        (Self { words }, location_index)
    }

    /// Get a word by id.
    pub fn get(
        &self,
        id: WordId,
    ) -> Option<&WordEntry<K, C>> {
        self.words.get(id)
    }

    /// Get a mutable word by id.
    pub fn get_mut(
        &mut self,
        id: WordId,
    ) -> Option<&mut WordEntry<K, C>> {
        self.words.get_mut(id)
    }

    /// Find a word's id by its key.
    pub fn find(
        &self,
        key: &str,
    ) -> Option<WordId> {
        self.words
            .binary_search_by(|w| w.key.as_ref().cmp(key))
            .ok()
    }

    /// The number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over ``(id, word)`` entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (WordId, &WordEntry<K, C>)> {
        self.words.iter().enumerate()
    }

    /// The total number of word occurrences.
    pub fn total_count(&self) -> u128 {
        self.words
            .iter()
            .map(|w| w.count.widen())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommonHashSet, pair};

    fn word(text: &str) -> WordEntry<String, u32> {
        WordEntry::new(text.to_string(), 1)
    }

    fn symbols(w: &WordEntry<String, u32>) -> Vec<String> {
        w.symbols()
            .iter()
            .map(|s| String::from_utf8_lossy(s.as_bytes()).to_string())
            .collect()
    }

    fn deltas(items: &[((&str, &str), i64)]) -> PairDeltaMap {
        items
            .iter()
            .map(|&((a, b), d)| (pair(a, b), d))
            .collect()
    }

    #[test]
    fn test_word_entry() {
        let w = word("hello");
        assert_eq!(w.key(), "hello");
        assert_eq!(w.key_bytes(), b"hello");
        assert_eq!(w.len(), 5);
        assert_eq!(w.count(), 1);
        assert!(w.contains_pair(&pair("l", "l")));
        assert!(!w.contains_pair(&pair("o", "h")));
        assert_eq!(
            w.pairs().collect::<Vec<_>>(),
            vec![
                pair("h", "e"),
                pair("e", "l"),
                pair("l", "l"),
                pair("l", "o")
            ]
        );
    }

    #[test]
    fn test_merge_absent_pair_is_noop() {
        let mut w = word("hello");
        let d = w.merge_pair(&pair("x", "y"));
        assert_eq!(symbols(&w), vec!["h", "e", "l", "l", "o"]);
        assert!(d.is_empty());
    }

    #[test]
    fn test_merge_abracadabra() {
        let mut w = word("abracadabra");
        let d = w.merge_pair(&pair("a", "b"));

        assert_eq!(
            symbols(&w),
            vec!["ab", "r", "a", "c", "a", "d", "ab", "r", "a"]
        );
        assert_eq!(
            d,
            deltas(&[
                (("ab", "r"), 2),
                (("b", "r"), -2),
                (("d", "ab"), 1),
                (("d", "a"), -1),
            ])
        );
    }

    #[test]
    fn test_merge_banana_chains_in_one_pass() {
        let mut w = word("banana");
        let d = w.merge_pair(&pair("a", "n"));

        assert_eq!(symbols(&w), vec!["b", "an", "an", "a"]);
        assert_eq!(
            d,
            deltas(&[
                (("b", "an"), 1),
                (("b", "a"), -1),
                (("an", "a"), 1),
                (("n", "a"), -2),
                (("an", "an"), 1),
            ])
        );
    }

    #[test]
    fn test_merge_repeated_symbol() {
        let mut w = word("aaa");
        let d = w.merge_pair(&pair("a", "a"));
        assert_eq!(symbols(&w), vec!["aa", "a"]);
        assert_eq!(d, deltas(&[(("aa", "a"), 1)]));

        let mut w = word("aaaa");
        let d = w.merge_pair(&pair("a", "a"));
        assert_eq!(symbols(&w), vec!["aa", "aa"]);
        assert_eq!(d, deltas(&[(("aa", "aa"), 1)]));
    }

    #[test]
    fn test_merge_abab_cancels() {
        let mut w = word("abab");
        let d = w.merge_pair(&pair("a", "b"));
        assert_eq!(symbols(&w), vec!["ab", "ab"]);
        // (ab, a) is created then consumed by the second merge.
        assert_eq!(d, deltas(&[(("b", "a"), -1), (("ab", "ab"), 1)]));
    }

    #[test]
    fn test_merge_at_sequence_ends() {
        let mut w = word("xy");
        let d = w.merge_pair(&pair("x", "y"));
        assert_eq!(symbols(&w), vec!["xy"]);
        assert!(d.is_empty());

        let mut w = word("zxy");
        let d = w.merge_pair(&pair("x", "y"));
        assert_eq!(symbols(&w), vec!["z", "xy"]);
        assert_eq!(d, deltas(&[(("z", "x"), -1), (("z", "xy"), 1)]));

        let mut w = word("a");
        assert!(w.merge_pair(&pair("a", "a")).is_empty());
        assert_eq!(symbols(&w), vec!["a"]);

        let mut w = word("");
        assert!(w.merge_pair(&pair("a", "b")).is_empty());
        assert!(w.is_empty());
    }

    #[test]
    fn test_merge_pair_cb_sequence() {
        let mut w = word("xaby");
        let mut events = vec![];
        w.merge_pair_cb(&pair("a", "b"), &Symbol::from("ab"), &mut |p, d| {
            events.push((p, d))
        });

        assert_eq!(
            events,
            vec![
                (pair("x", "a"), -1),
                (pair("x", "ab"), 1),
                (pair("b", "y"), -1),
                (pair("ab", "y"), 1),
            ]
        );
    }

    #[test]
    fn test_reform() {
        let (table, index) = WordTable::<String, u32>::reform(vec![
            ("hello".to_string(), 1),
            ("world".to_string(), 2),
            ("help".to_string(), 3),
            ("unused".to_string(), 0),
            ("\u{2603}".to_string(), 4), // "☃" := [0xE2 0x98 0x83]
        ]);

        assert_eq!(table.len(), 4);
        assert_eq!(table.total_count(), 10);
        assert_eq!(table.find("unused"), None);

        let hello = table.find("hello").unwrap();
        let help = table.find("help").unwrap();
        let world = table.find("world").unwrap();
        let snowman = table.find("\u{2603}").unwrap();

        assert_eq!(table.get(help).unwrap().count(), 3);
        assert_eq!(table.get(snowman).unwrap().len(), 3);

        // Ids follow key order.
        let keys = table.iter().map(|(_, w)| w.key().clone()).collect::<Vec<_>>();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        let ids = |a: &str, b: &str| index.get(&pair(a, b)).cloned().unwrap_or_default();
        assert_eq!(ids("h", "e"), CommonHashSet::from_iter([hello, help]));
        assert_eq!(ids("l", "l"), CommonHashSet::from_iter([hello]));
        assert_eq!(ids("r", "l"), CommonHashSet::from_iter([world]));
        assert_eq!(
            index.get(&(Symbol::from_byte(0xE2), Symbol::from_byte(0x98))),
            Some(&CommonHashSet::from_iter([snowman]))
        );
        assert_eq!(index.len(), 11);
    }

    #[test]
    fn test_reform_registers_repeats_once() {
        let (table, index) = WordTable::<String, u64>::reform(vec![("aaaa".to_string(), 7)]);
        assert_eq!(table.len(), 1);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&pair("a", "a")], CommonHashSet::from_iter([0]));
    }
}
