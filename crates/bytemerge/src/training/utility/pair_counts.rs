//! # Pair Count Tables

use crate::errors::{BMResult, BytemergeError};
use crate::training::CountType;
use crate::training::utility::word_table::WordId;
use crate::types::{CommonHashMap, CommonHashSet, Pair};

/// A map from [`Pair`] to a signed frequency delta.
pub type PairDeltaMap = CommonHashMap<Pair, i64>;

/// A map from [`Pair`] to the ids of the words containing it.
pub type PairIndexMap = CommonHashMap<Pair, CommonHashSet<WordId>>;

/// A map from [`Pair`] to its aggregate frequency.
///
/// Absent pairs read as zero; an update that brings a count to zero
/// removes the entry, so every stored count is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct PairCountMap<C: CountType> {
    counts: CommonHashMap<Pair, C>,
}

impl<C: CountType> Default for PairCountMap<C> {
    fn default() -> Self {
        Self {
            counts: CommonHashMap::default(),
        }
    }
}

impl<C: CountType> PairCountMap<C> {
    /// Build a table from ``(pair, count)`` entries, summing repeats.
    pub fn from_counts<I>(counts: I) -> BMResult<Self>
    where
        I: IntoIterator<Item = (Pair, C)>,
    {
        let mut table = Self::default();
        for (pair, count) in counts {
            table.add(pair, count)?;
        }
        Ok(table)
    }

    /// The count of `pair`; zero when absent.
    pub fn get(
        &self,
        pair: &Pair,
    ) -> C {
        self.counts.get(pair).copied().unwrap_or_default()
    }

    /// Is `pair` present (with a positive count)?
    pub fn contains(
        &self,
        pair: &Pair,
    ) -> bool {
        self.counts.contains_key(pair)
    }

    /// Add `count` to `pair`; zero counts are ignored.
    ///
    /// Fails with [`BytemergeError::CountOverflow`] when the sum does not
    /// fit in `C`; the entry is left unchanged.
    pub fn add(
        &mut self,
        pair: Pair,
        count: C,
    ) -> BMResult<()> {
        if count.is_zero() {
            return Ok(());
        }
        let total = self.counts.entry(pair).or_default();
        *total = total.try_add(count)?;
        Ok(())
    }

    /// Apply a signed delta to `pair`.
    ///
    /// ## Returns
    /// The updated count; a zero result removes the entry.
    ///
    /// Fails with [`BytemergeError::CountOverflow`] when the result is
    /// negative or does not fit in `C`.
    pub fn apply_delta(
        &mut self,
        pair: &Pair,
        delta: i64,
    ) -> BMResult<C> {
        let current = self.get(pair);
        let value = current
            .to_i128()
            .ok_or(BytemergeError::CountOverflow { value: i128::MAX })?
            + i128::from(delta);

        if value == 0 {
            self.counts.remove(pair);
            return Ok(C::zero());
        }

        let count = if value > 0 { C::from_i128(value) } else { None }
            .ok_or(BytemergeError::CountOverflow { value })?;

        match self.counts.get_mut(pair) {
            Some(c) => *c = count,
            None => {
                self.counts.insert(pair.clone(), count);
            }
        }
        Ok(count)
    }

    /// Remove `pair`, returning its former count.
    pub fn remove(
        &mut self,
        pair: &Pair,
    ) -> Option<C> {
        self.counts.remove(pair)
    }

    /// The number of distinct pairs.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Are there no pairs left?
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over ``(pair, count)`` entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Pair, &C)> {
        self.counts.iter()
    }
}
