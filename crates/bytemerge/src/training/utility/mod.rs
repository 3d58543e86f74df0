//! # Trainer Implementation Utilities

mod pair_counts;
#[doc(inline)]
pub use pair_counts::{PairCountMap, PairDeltaMap, PairIndexMap};

mod pair_index;
#[doc(inline)]
pub use pair_index::{MergeCandidate, PairIndex};

mod word_table;
#[doc(inline)]
pub use word_table::{WordEntry, WordId, WordTable};
