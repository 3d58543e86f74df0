//! # Base64 Vocabulary IO

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use base64::{Engine, prelude::BASE64_STANDARD};

use crate::{
    errors::{BMResult, BytemergeError},
    types::Symbol,
    vocab::{MergeList, Vocabulary},
};

fn decode_field(field: &str) -> BMResult<Symbol> {
    BASE64_STANDARD
        .decode(field)
        .map(Symbol::from)
        .map_err(|e| BytemergeError::Parse(e.to_string()))
}

/// Save a [`Vocabulary`] to a base64 vocab file.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 BYTES} {TOKEN}
/// ```
///
/// # Arguments
/// * `vocab` - the vocabulary to save.
/// * `path` - the path to save the vocabulary to.
pub fn save_base64_vocab_path<P: AsRef<Path>>(
    vocab: &Vocabulary,
    path: P,
) -> BMResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_base64_vocab(vocab, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`Vocabulary`] to a [`Write`] writer, in id order.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 BYTES} {TOKEN}
/// ```
///
/// # Arguments
/// * `vocab` - the vocabulary to save.
/// * `writer` - the writer to target.
pub fn write_base64_vocab<W: Write>(
    vocab: &Vocabulary,
    writer: &mut W,
) -> BMResult<()> {
    for (token, bytes) in vocab.iter() {
        writeln!(writer, "{} {}", BASE64_STANDARD.encode(bytes), token)?;
    }
    Ok(())
}

/// Read ``(id, bytes)`` entries from a base64 vocab line reader.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 BYTES} {TOKEN}
/// ```
pub fn read_base64_vocab_entries<R: BufRead>(reader: R) -> BMResult<Vec<(u32, Vec<u8>)>> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let Some((bytes, token)) = line.split_once(' ') else {
            return Err(BytemergeError::Parse(format!("malformed vocab line: {line:?}")));
        };
        let bytes = decode_field(bytes)?;
        let token: u32 = token
            .parse()
            .map_err(|e: core::num::ParseIntError| BytemergeError::Parse(e.to_string()))?;

        entries.push((token, bytes.as_bytes().to_vec()));
    }
    Ok(entries)
}

/// Save a [`MergeList`] to a base64 merges file.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 LEFT} {BASE64 RIGHT}
/// ```
///
/// # Arguments
/// * `merges` - the merges to save.
/// * `path` - the path to save the merges to.
pub fn save_base64_merges_path<P: AsRef<Path>>(
    merges: &MergeList,
    path: P,
) -> BMResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_base64_merges(merges, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`MergeList`] to a [`Write`] writer, in merge order.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 LEFT} {BASE64 RIGHT}
/// ```
pub fn write_base64_merges<W: Write>(
    merges: &MergeList,
    writer: &mut W,
) -> BMResult<()> {
    for (left, right) in merges.iter() {
        writeln!(
            writer,
            "{} {}",
            BASE64_STANDARD.encode(left),
            BASE64_STANDARD.encode(right)
        )?;
    }
    Ok(())
}

/// Load a [`MergeList`] from a base64 merges file.
///
/// # Arguments
/// * `path` - the path to the merges file.
pub fn load_base64_merges_path<P: AsRef<Path>>(path: P) -> BMResult<MergeList> {
    let reader = BufReader::new(File::open(path)?);
    read_base64_merges(reader)
}

/// Read a [`MergeList`] from a base64 merges line reader.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 LEFT} {BASE64 RIGHT}
/// ```
pub fn read_base64_merges<R: BufRead>(reader: R) -> BMResult<MergeList> {
    let mut merges = MergeList::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let Some((left, right)) = line.split_once(' ') else {
            return Err(BytemergeError::Parse(format!("malformed merge line: {line:?}")));
        };
        merges.push((decode_field(left)?, decode_field(right)?));
    }
    Ok(merges)
}
