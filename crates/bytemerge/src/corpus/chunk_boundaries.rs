//! # Chunk Boundaries

use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;

use crate::errors::{BMResult, BytemergeError};

/// Source of safe chunk split offsets.
pub trait ChunkBoundaryProvider {
    /// Find chunk boundaries in a stream.
    ///
    /// ## Arguments
    /// * `stream` - the corpus stream; its position on return is unspecified.
    /// * `desired_chunk_count` - a hint; providers may return fewer chunks.
    /// * `delimiter` - no occurrence of this may straddle a boundary.
    ///
    /// ## Returns
    /// Ascending byte offsets; the first is ``0``, the last is the stream length.
    fn find_chunk_boundaries<R: Read + Seek>(
        &self,
        stream: &mut R,
        desired_chunk_count: usize,
        delimiter: &[u8],
    ) -> std::io::Result<Vec<u64>>;
}

/// Treat the whole stream as one chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeStream;

impl ChunkBoundaryProvider for WholeStream {
    fn find_chunk_boundaries<R: Read + Seek>(
        &self,
        stream: &mut R,
        _desired_chunk_count: usize,
        _delimiter: &[u8],
    ) -> std::io::Result<Vec<u64>> {
        let len = stream.seek(SeekFrom::End(0))?;
        Ok(vec![0, len])
    }
}

/// Caller-supplied boundaries, computed ahead of time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBoundaries {
    offsets: Vec<u64>,
}

impl FixedBoundaries {
    /// Wrap a list of offsets.
    pub fn new(offsets: Vec<u64>) -> Self {
        Self { offsets }
    }

    /// The wrapped offsets.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }
}

impl ChunkBoundaryProvider for FixedBoundaries {
    fn find_chunk_boundaries<R: Read + Seek>(
        &self,
        _stream: &mut R,
        _desired_chunk_count: usize,
        _delimiter: &[u8],
    ) -> std::io::Result<Vec<u64>> {
        Ok(self.offsets.clone())
    }
}

/// Validate boundary offsets and convert them to non-empty byte ranges.
///
/// ## Arguments
/// * `offsets` - provider output.
/// * `len` - the stream length.
///
/// ## Returns
/// The consecutive ranges between offsets, skipping empty ones.
pub fn boundaries_to_ranges(
    offsets: &[u64],
    len: u64,
) -> BMResult<Vec<Range<u64>>> {
    match (offsets.first(), offsets.last()) {
        (Some(&0), Some(&last)) if last == len => {}
        _ => {
            return Err(BytemergeError::ChunkBoundaries(format!(
                "expected offsets spanning [0, {len}], got {offsets:?}"
            )));
        }
    }

    let mut ranges = Vec::with_capacity(offsets.len());
    for w in offsets.windows(2) {
        let (start, end) = (w[0], w[1]);
        if start > end {
            return Err(BytemergeError::ChunkBoundaries(format!(
                "offsets are not ascending: {start} > {end}"
            )));
        }
        if start < end {
            ranges.push(start..end);
        }
    }
    Ok(ranges)
}
