//! # `bytemerge` Byte-Level BPE Trainer
//!
//! `bytemerge` learns a byte-level Byte-Pair-Encoding vocabulary from a text corpus.
//!
//! See:
//! * [`pretokenize`] to split text into counted words.
//! * [`training`] to run the merge loop.
//! * [`vocab`] for the trained vocabulary, merge list, and export.
//! * [`corpus`] for corpus sources and chunk boundaries.
//!
//! ```rust,no_run
//! use bytemerge::{corpus::CorpusSource, train};
//!
//! let corpus = CorpusSource::from_path("corpus.txt");
//! let results = train(&corpus, 1000, &["<|endoftext|>"]).unwrap();
//!
//! for (id, bytes) in results.vocab.merged().take(10) {
//!     println!("{id}: {:?}", String::from_utf8_lossy(bytes));
//! }
//! ```
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``ahash``
//! * ``rayon``
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap/HashSet implementations for ``ahash``; which is a performance
//! win on many/(most?) modern CPUs.
//!
//! This is done by the ``types::CommonHash{*}`` type alias machinery.
//!
//! #### feature: ``rayon``
//!
//! Pretokenization workers run on the ``rayon`` thread pool.
//! Without it, they run one after another, with identical results.
//!
//! #### feature: ``tracing``
//!
//! This enables a number of ``tracing`` instrumentation points.
//! This is only useful for timing tracing of the library itself.
#![warn(missing_docs, unused)]

pub mod concurrency;
pub mod corpus;
pub mod errors;
pub mod pretokenize;
pub mod regex;
pub mod training;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{BMResult, BytemergeError};
#[doc(inline)]
pub use training::{BpeTrainer, BpeTrainerOptions, TrainResults, TrainingStatus, train};
#[doc(inline)]
pub use types::{Pair, Symbol, TokenId};
#[doc(inline)]
pub use vocab::{MergeList, Vocabulary};
