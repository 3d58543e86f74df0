//! # Merge List

use crate::types::Pair;

/// The learned merges, in application order.
///
/// Replaying the list over single-byte symbols reproduces the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeList {
    merges: Vec<Pair>,
}

impl FromIterator<Pair> for MergeList {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        Self {
            merges: iter.into_iter().collect(),
        }
    }
}

impl MergeList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a merge.
    pub fn push(
        &mut self,
        pair: Pair,
    ) {
        self.merges.push(pair);
    }

    /// The `index`-th merge.
    pub fn get(
        &self,
        index: usize,
    ) -> Option<&Pair> {
        self.merges.get(index)
    }

    /// The number of merges.
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Is the list empty?
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// Iterate over the merges in order.
    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.merges.iter()
    }

    /// View the merges as a slice.
    pub fn as_slice(&self) -> &[Pair] {
        &self.merges
    }
}
