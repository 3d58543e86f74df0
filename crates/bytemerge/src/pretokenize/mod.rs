//! # Pretokenization
//!
//! Turns raw corpus bytes into a [`WordCounter`]: special tokens are cut out,
//! the remaining text is split with the word pattern, and each match is counted.
//!
//! Chunks are pretokenized independently and their counters summed; the
//! result does not depend on how the corpus was chunked, as long as chunk
//! boundaries do not split a special token or a word.

mod pretokenizer;
mod word_counter;

#[doc(inline)]
pub use pretokenizer::Pretokenizer;
#[doc(inline)]
pub use word_counter::WordCounter;
