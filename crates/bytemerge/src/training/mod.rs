//! # Vocabulary Training
//!
//! Training runs in two phases:
//! 1. Pretokenization: corpus text is split into words and counted,
//!    see [`crate::pretokenize`]. This phase is parallel.
//! 2. Merging: each word becomes a sequence of single-byte symbols, and the
//!    most frequent adjacent pair is merged, repeatedly, until the vocabulary
//!    reaches its target size or no pairs are left. This phase is sequential.
//!
//! The merge loop keeps a reverse index from each pair to the words containing
//! it (see [`utility::PairIndex`]), so each merge only rescans affected words.
//!
//! ## Training Example
//!
//! ```rust,no_run
//! use bytemerge::{
//!     corpus::{CorpusSource, WholeStream},
//!     regex::GPT2_WORD_PATTERN,
//!     training::{BpeTrainer, BpeTrainerOptions},
//! };
//!
//! fn example(path: &str) -> bytemerge::BMResult<()> {
//!     let options = BpeTrainerOptions::new(GPT2_WORD_PATTERN, 10_000)
//!         .with_special_tokens(["<|endoftext|>"]);
//!
//!     let mut trainer: BpeTrainer = options.init()?;
//!     trainer.update_from_corpus(&CorpusSource::from_path(path), &WholeStream)?;
//!
//!     let results = trainer.train()?;
//!     if !results.is_complete() {
//!         println!("stopped early: {:?}", results.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod utility;

mod bpe_trainer;
mod train_results;
mod training_types;

#[doc(inline)]
pub use bpe_trainer::{BpeTrainer, BpeTrainerOptions, train, train_corpus};
#[doc(inline)]
pub use train_results::{MergeStep, TrainResults, TrainingStatus};
#[doc(inline)]
pub use training_types::{CountType, StringChunkType};
