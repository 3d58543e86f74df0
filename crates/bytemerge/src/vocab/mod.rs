//! # Vocabulary Types
//!
//! A trained tokenizer is fully described by its [`Vocabulary`] (``id -> bytes``)
//! and its [`MergeList`] (the merges, in the order they were learned).
//!
//! See [`io`] for the line-oriented base64 export.

pub mod io;

mod merge_list;
mod vocabulary;

#[doc(inline)]
pub use merge_list::MergeList;
#[doc(inline)]
pub use vocabulary::{BYTE_VOCAB_SIZE, Vocabulary};
