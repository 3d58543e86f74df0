//! # Corpus Source

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::corpus::chunk_boundaries::{ChunkBoundaryProvider, boundaries_to_ranges};
use crate::errors::{BMResult, BytemergeError};

/// Where training bytes come from.
#[derive(Debug, Clone)]
pub enum CorpusSource {
    /// A file on disk; each worker opens its own handle.
    Path(PathBuf),

    /// An in-memory buffer.
    Bytes(Arc<[u8]>),
}

impl CorpusSource {
    /// A corpus backed by a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    /// A corpus backed by an in-memory copy of `bytes`.
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Self {
        Self::Bytes(Arc::from(bytes.as_ref()))
    }

    fn input_error(
        path: &Path,
        source: std::io::Error,
    ) -> BytemergeError {
        BytemergeError::Input {
            path: path.to_path_buf(),
            source,
        }
    }

    fn open(path: &Path) -> BMResult<File> {
        File::open(path).map_err(|e| Self::input_error(path, e))
    }

    /// Check the corpus is readable and return its length in bytes.
    ///
    /// Fails with [`BytemergeError::Input`] for unreadable files.
    pub fn validate(&self) -> BMResult<u64> {
        match self {
            Self::Path(path) => {
                let file = Self::open(path)?;
                let meta = file.metadata().map_err(|e| Self::input_error(path, e))?;
                if meta.is_dir() {
                    return Err(Self::input_error(
                        path,
                        std::io::Error::other("is a directory"),
                    ));
                }
                Ok(meta.len())
            }
            Self::Bytes(bytes) => Ok(bytes.len() as u64),
        }
    }

    /// Ask `provider` for chunk boundaries and convert them to byte ranges.
    ///
    /// ## Arguments
    /// * `provider` - the boundary source.
    /// * `desired_chunk_count` - passed through to the provider.
    /// * `delimiter` - passed through to the provider.
    pub fn chunk_ranges<P: ChunkBoundaryProvider>(
        &self,
        provider: &P,
        desired_chunk_count: usize,
        delimiter: &[u8],
    ) -> BMResult<Vec<Range<u64>>> {
        let len = self.validate()?;
        let offsets = match self {
            Self::Path(path) => {
                let mut file = Self::open(path)?;
                provider
                    .find_chunk_boundaries(&mut file, desired_chunk_count, delimiter)
                    .map_err(|e| Self::input_error(path, e))?
            }
            Self::Bytes(bytes) => {
                let mut cursor = Cursor::new(&bytes[..]);
                provider.find_chunk_boundaries(&mut cursor, desired_chunk_count, delimiter)?
            }
        };
        boundaries_to_ranges(&offsets, len)
    }

    /// Read one byte range of the corpus.
    pub fn read_range(
        &self,
        range: &Range<u64>,
    ) -> BMResult<Vec<u8>> {
        let size = usize::try_from(range.end - range.start)
            .map_err(|_| BytemergeError::ChunkBoundaries(format!("range too large: {range:?}")))?;

        match self {
            Self::Path(path) => {
                let mut file = Self::open(path)?;
                let mut buf = vec![0u8; size];
                file.seek(SeekFrom::Start(range.start))
                    .and_then(|_| file.read_exact(&mut buf))
                    .map_err(|e| Self::input_error(path, e))?;
                Ok(buf)
            }
            Self::Bytes(bytes) => {
                let start = range.start as usize;
                bytes
                    .get(start..start + size)
                    .map(|b| b.to_vec())
                    .ok_or_else(|| {
                        BytemergeError::ChunkBoundaries(format!(
                            "range {range:?} is outside the corpus"
                        ))
                    })
            }
        }
    }
}
