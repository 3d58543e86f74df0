//! # Vocabulary IO
//!
//! Vocabularies are written in the ``tiktoken`` line format;
//! merge lists use the same base64 encoding, one pair per line.
//!
//! ```rust,no_run
//! use bytemerge::{
//!     corpus::CorpusSource,
//!     train,
//!     vocab::io::{save_base64_merges_path, save_base64_vocab_path},
//! };
//!
//! fn example() -> bytemerge::BMResult<()> {
//!     let corpus = CorpusSource::from_path("corpus.txt");
//!     let results = train(&corpus, 1000, &["<|endoftext|>"])?;
//!     save_base64_vocab_path(&results.vocab, "vocab.tiktoken")?;
//!     save_base64_merges_path(&results.merges, "merges.txt")?;
//!     Ok(())
//! }
//! ```

mod base64_vocab;

#[doc(inline)]
pub use base64_vocab::*;
