//! # Pair Index
//!
//! The incremental merge engine: the aggregate pair frequency table, the
//! reverse index from each pair to the words containing it, and a lazily
//! refreshed max-heap of merge candidates.
//!
//! Applying a merge visits only the words listed under the merged pair.

use core::cmp::Ordering;

use dary_heap::OctonaryHeap;

use crate::errors::{BMResult, BytemergeError};
use crate::training::utility::pair_counts::{PairCountMap, PairDeltaMap, PairIndexMap};
use crate::training::utility::word_table::{WordId, WordTable};
use crate::training::{CountType, StringChunkType};
use crate::types::{CommonHashSet, Pair};

/// A [`Pair`] that could be merged, and its count when it was queued.
#[derive(Debug, Clone, Eq)]
pub struct MergeCandidate<C: CountType> {
    /// The number of instances of this pair in the corpus.
    pub count: C,

    /// The pair to merge.
    pub pair: Pair,
}

impl<C: CountType> MergeCandidate<C> {
    /// The candidate key.
    ///
    /// Max-heap by count; ties go to the greater pair.
    pub fn heap_key(&self) -> (C, &Pair) {
        (self.count, &self.pair)
    }
}

impl<C: CountType> PartialEq for MergeCandidate<C> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<C: CountType> PartialOrd for MergeCandidate<C> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: CountType> Ord for MergeCandidate<C> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

/// Pair frequencies and locations relative to a [`WordTable`].
///
/// Invariants, after construction and after every [`PairIndex::apply_merge`]:
/// * ``pair_counts[p] == sum(w.count * occurrences(p, w))`` over all words ``w``.
/// * ``pair_index[p]`` is exactly the set of words containing ``p``.
/// * every pair with a positive count has a heap entry whose count is at least
///   its current count.
#[derive(Debug, Clone)]
pub struct PairIndex<C: CountType> {
    pair_counts: PairCountMap<C>,
    pair_index: PairIndexMap,
    heap: OctonaryHeap<MergeCandidate<C>>,
}

impl<C: CountType> PairIndex<C> {
    /// Build the index from a word table and its location index.
    ///
    /// ## Arguments
    /// * `words` - the word table.
    /// * `pair_index` - the location index, as returned by [`WordTable::reform`].
    ///
    /// Fails with [`BytemergeError::CountOverflow`] when a pair's aggregate
    /// count does not fit in `C`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn new<K: StringChunkType>(
        words: &WordTable<K, C>,
        pair_index: PairIndexMap,
    ) -> BMResult<Self> {
        let pair_counts = Self::count_pairs(words)?;

        let mut heap = OctonaryHeap::with_capacity(pair_counts.len());
        for (pair, &count) in pair_counts.iter() {
            heap.push(MergeCandidate {
                count,
                pair: pair.clone(),
            });
        }

        Ok(Self {
            pair_counts,
            pair_index,
            heap,
        })
    }

    /// Build the index by scanning a word table.
    pub fn build<K: StringChunkType>(words: &WordTable<K, C>) -> BMResult<Self> {
        Self::new(words, Self::locate_pairs(words))
    }

    fn count_pairs<K: StringChunkType>(words: &WordTable<K, C>) -> BMResult<PairCountMap<C>> {
        let mut pair_counts = PairCountMap::default();
        for (_, word) in words.iter() {
            for p in word.pairs() {
                pair_counts.add(p, word.count())?;
            }
        }
        Ok(pair_counts)
    }

    fn locate_pairs<K: StringChunkType>(words: &WordTable<K, C>) -> PairIndexMap {
        let mut pair_index = PairIndexMap::default();
        for (id, word) in words.iter() {
            for p in word.pairs() {
                pair_index.entry(p).or_default().insert(id);
            }
        }
        pair_index
    }

    /// The aggregate count of `pair`; zero when absent.
    pub fn count(
        &self,
        pair: &Pair,
    ) -> C {
        self.pair_counts.get(pair)
    }

    /// The ids of the words currently containing `pair`.
    pub fn words_containing(
        &self,
        pair: &Pair,
    ) -> Option<&CommonHashSet<WordId>> {
        self.pair_index.get(pair)
    }

    /// The pair frequency table.
    pub fn pair_counts(&self) -> &PairCountMap<C> {
        &self.pair_counts
    }

    /// The number of distinct pairs with a positive count.
    pub fn len(&self) -> usize {
        self.pair_counts.len()
    }

    /// Are there no pairs left to merge?
    pub fn is_empty(&self) -> bool {
        self.pair_counts.is_empty()
    }

    /// Select the most frequent pair; ties go to the greater pair.
    ///
    /// Stale heap entries are refreshed on the way; the result does not
    /// depend on hash map iteration order.
    ///
    /// ## Returns
    /// ``None`` when no pair has a positive count.
    pub fn select_merge_candidate(&mut self) -> Option<MergeCandidate<C>> {
        while let Some(top) = self.heap.peek() {
            let current = self.pair_counts.get(&top.pair);
            if current == top.count {
                return Some(top.clone());
            }

            // Lazy refresh.
            let mut stale = self.heap.pop()?;
            if !current.is_zero() {
                stale.count = current;
                self.heap.push(stale);
            }
        }
        None
    }

    /// Merge `pair` in every word containing it.
    ///
    /// Updates the words, the frequency table, and the location index; then
    /// removes `pair` from both tables.
    ///
    /// ## Arguments
    /// * `words` - the word table this index was built from.
    /// * `pair` - the pair to merge.
    ///
    /// ## Returns
    /// The net frequency deltas of the merge, weighted by word counts;
    /// the merged pair and zero nets are omitted.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn apply_merge<K: StringChunkType>(
        &mut self,
        words: &mut WordTable<K, C>,
        pair: &Pair,
    ) -> BMResult<PairDeltaMap> {
        let Some(ids) = self.pair_index.remove(pair) else {
            if self.pair_counts.contains(pair) {
                return Err(BytemergeError::IndexInconsistency(format!(
                    "{pair:?} has count {} but no word locations",
                    self.pair_counts.get(pair)
                )));
            }
            return Ok(PairDeltaMap::default());
        };

        let mut ids: Vec<WordId> = ids.into_iter().collect();
        ids.sort_unstable();

        let mut deltas = PairDeltaMap::default();

        for id in ids {
            let word = words.get_mut(id).ok_or_else(|| {
                BytemergeError::IndexInconsistency(format!("{pair:?} lists unknown word {id}"))
            })?;

            let weight = word.count().to_weight()?;

            let word_deltas = word.merge_pair(pair);

            for (p, d) in word_deltas {
                if d > 0 {
                    self.pair_index.entry(p.clone()).or_default().insert(id);
                } else if !word.contains_pair(&p)
                    && let Some(locations) = self.pair_index.get_mut(&p)
                {
                    locations.remove(&id);
                    if locations.is_empty() {
                        self.pair_index.remove(&p);
                    }
                }

                let scaled = d
                    .checked_mul(weight)
                    .ok_or(BytemergeError::CountOverflow {
                        value: i128::from(d) * i128::from(weight),
                    })?;
                *deltas.entry(p).or_default() += scaled;
            }
        }

        deltas.retain(|_, d| *d != 0);

        for (p, &d) in deltas.iter() {
            let count = self.pair_counts.apply_delta(p, d)?;
            if d > 0 {
                self.heap.push(MergeCandidate {
                    count,
                    pair: p.clone(),
                });
            }
        }

        self.pair_counts.remove(pair);

        Ok(deltas)
    }

    /// Check the frequency table and location index against a full rescan.
    ///
    /// This is ``O(corpus)``; it is a debugging aid.
    pub fn check_consistency<K: StringChunkType>(
        &self,
        words: &WordTable<K, C>,
    ) -> BMResult<()> {
        let expected_counts = Self::count_pairs(words)?;
        if expected_counts != self.pair_counts {
            let diverged = expected_counts
                .iter()
                .map(|(p, _)| p)
                .chain(self.pair_counts.iter().map(|(p, _)| p))
                .find(|p| expected_counts.get(p) != self.pair_counts.get(p));
            return Err(BytemergeError::IndexInconsistency(format!(
                "pair count for {diverged:?} is {:?}, expected {:?}",
                diverged.map(|p| self.pair_counts.get(p)),
                diverged.map(|p| expected_counts.get(p)),
            )));
        }

        let expected_index = Self::locate_pairs(words);
        if expected_index != self.pair_index {
            let diverged = expected_index
                .keys()
                .chain(self.pair_index.keys())
                .find(|p| expected_index.get(*p) != self.pair_index.get(*p));
            return Err(BytemergeError::IndexInconsistency(format!(
                "word locations for {diverged:?} are {:?}, expected {:?}",
                diverged.and_then(|p| self.pair_index.get(p)),
                diverged.and_then(|p| expected_index.get(p)),
            )));
        }

        Ok(())
    }
}
