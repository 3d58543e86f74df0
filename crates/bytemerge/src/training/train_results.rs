//! # Training Results

use crate::types::{Pair, TokenId};
use crate::vocab::{MergeList, Vocabulary};

/// How a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainingStatus {
    /// The vocabulary reached the requested size.
    Complete,

    /// No pair was left to merge before the requested size was reached.
    Exhausted,

    /// Training was stopped between merges; the results hold every merge completed so far.
    Cancelled,
}

/// One completed merge, as reported to a training observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStep<C> {
    /// The merge's position in the merge list.
    pub index: usize,

    /// The vocabulary id allocated for the merged symbol.
    pub token_id: TokenId,

    /// The merged pair.
    pub pair: Pair,

    /// The pair's frequency when it was selected.
    pub count: C,
}

/// The trained vocabulary and merge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainResults {
    /// Special tokens, then the 256 bytes, then one entry per merge.
    pub vocab: Vocabulary,

    /// The merges, in application order.
    pub merges: MergeList,

    /// How training ended.
    pub status: TrainingStatus,

    /// The vocabulary size that was asked for.
    pub requested_vocab_size: usize,
}

impl TrainResults {
    /// Did the vocabulary reach the requested size?
    pub fn is_complete(&self) -> bool {
        self.status == TrainingStatus::Complete
    }

    /// How many merges short of the requested size training stopped.
    pub fn missing_merges(&self) -> usize {
        self.requested_vocab_size.saturating_sub(self.vocab.len())
    }
}
