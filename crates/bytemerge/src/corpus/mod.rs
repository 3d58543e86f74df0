//! # Corpus Input
//!
//! A [`CorpusSource`] names the training bytes; a [`ChunkBoundaryProvider`]
//! splits them into independent byte ranges for the parallel pretokenizer.
//!
//! Boundary providers are external collaborators: a provider is expected to
//! place offsets so that no delimiter occurrence is split. The providers shipped
//! here do no scanning of their own.

mod chunk_boundaries;
mod corpus_source;

#[doc(inline)]
pub use chunk_boundaries::{
    ChunkBoundaryProvider,
    FixedBoundaries,
    WholeStream,
    boundaries_to_ranges,
};
#[doc(inline)]
pub use corpus_source::CorpusSource;
