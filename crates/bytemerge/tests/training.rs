#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fs;

use bytemerge::{
    BpeTrainer,
    BpeTrainerOptions,
    BytemergeError,
    TrainingStatus,
    corpus::{CorpusSource, FixedBoundaries, WholeStream},
    regex::GPT2_WORD_PATTERN,
    training::train_corpus,
    vocab::io::{load_base64_merges_path, save_base64_merges_path, save_base64_vocab_path},
};
use proptest::prelude::*;
use tempdir::TempDir;

const EOT: &str = "<|endoftext|>";

const DOCS: &[&str] = &[
    "low low low low low lower lower newest newest newest widest",
    "It's a beautiful day, and I'll be taking my 3 dogs for a walk.",
    "banana bandana abracadabra",
    "caf\u{00e9} na\u{00ef}ve \u{4f60}\u{597d}",
    "  multiple   spaces  ",
];

fn options(vocab_size: usize) -> BpeTrainerOptions {
    BpeTrainerOptions::new(GPT2_WORD_PATTERN, vocab_size).with_special_tokens([EOT])
}

/// Byte offsets of each document start, plus the end.
fn doc_boundaries(text: &str) -> Vec<u64> {
    let mut offsets = vec![0];
    offsets.extend(
        text.match_indices(EOT)
            .map(|(i, _)| (i + EOT.len()) as u64),
    );
    let len = text.len() as u64;
    if offsets.last() != Some(&len) {
        offsets.push(len);
    }
    offsets
}

/// Full recount every step; max by ``(count, pair)``.
fn naive_merges(
    word_counts: &[(String, u64)],
    num_merges: usize,
) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut words: Vec<(Vec<Vec<u8>>, u64)> = word_counts
        .iter()
        .map(|(w, c)| (w.bytes().map(|b| vec![b]).collect(), *c))
        .collect();

    let mut merges = vec![];
    while merges.len() < num_merges {
        let mut counts: BTreeMap<(Vec<u8>, Vec<u8>), u64> = BTreeMap::new();
        for (symbols, count) in &words {
            for w in symbols.windows(2) {
                *counts.entry((w[0].clone(), w[1].clone())).or_default() += count;
            }
        }

        let Some((pair, _)) = counts
            .into_iter()
            .max_by(|(pa, ca), (pb, cb)| (ca, pa).cmp(&(cb, pb)))
        else {
            break;
        };

        for (symbols, _) in words.iter_mut() {
            let mut merged = Vec::with_capacity(symbols.len());
            let mut i = 0;
            while i < symbols.len() {
                if i + 1 < symbols.len() && symbols[i] == pair.0 && symbols[i + 1] == pair.1 {
                    merged.push([pair.0.as_slice(), pair.1.as_slice()].concat());
                    i += 2;
                } else {
                    merged.push(symbols[i].clone());
                    i += 1;
                }
            }
            *symbols = merged;
        }
        merges.push(pair);
    }
    merges
}

#[test]
fn test_train_file_corpus() {
    let dir = TempDir::new("bytemerge_training").unwrap();
    let path = dir.path().join("corpus.txt");
    let text = DOCS.join(EOT);
    fs::write(&path, &text).unwrap();

    let source = CorpusSource::from_path(&path);
    let whole = train_corpus(&source, options(300), &WholeStream).unwrap();

    let chunked = train_corpus(
        &source,
        options(300),
        &FixedBoundaries::new(doc_boundaries(&text)),
    )
    .unwrap();

    assert_eq!(whole, chunked);
    assert_eq!(whole.vocab.get(0), Some(EOT.as_bytes()));

    let in_memory = train_corpus(
        &CorpusSource::from_bytes(&text),
        options(300),
        &FixedBoundaries::new(doc_boundaries(&text)),
    )
    .unwrap();
    assert_eq!(whole, in_memory);

    let vocab_path = dir.path().join("vocab.tiktoken");
    let merges_path = dir.path().join("merges.txt");
    save_base64_vocab_path(&whole.vocab, &vocab_path).unwrap();
    save_base64_merges_path(&whole.merges, &merges_path).unwrap();

    assert_eq!(
        fs::read_to_string(&vocab_path).unwrap().lines().count(),
        whole.vocab.len()
    );
    assert_eq!(load_base64_merges_path(&merges_path).unwrap(), whole.merges);
}

#[test]
fn test_missing_corpus_fails_before_training() {
    let dir = TempDir::new("bytemerge_training").unwrap();
    let source = CorpusSource::from_path(dir.path().join("missing.txt"));

    let mut trainer: BpeTrainer = options(300).init().unwrap();
    let result = trainer.update_from_corpus(&source, &WholeStream);

    assert!(matches!(result, Err(BytemergeError::Input { .. })));
    assert!(trainer.word_counts().is_empty());
}

#[test]
fn test_bad_boundaries() {
    let source = CorpusSource::from_bytes("hello world");
    let mut trainer: BpeTrainer = options(300).init().unwrap();

    let result = trainer.update_from_corpus(&source, &FixedBoundaries::new(vec![0, 5]));
    assert!(matches!(result, Err(BytemergeError::ChunkBoundaries(_))));
}

#[test]
fn test_matches_naive_trainer() {
    let mut trainer: BpeTrainer<String, u64> = options(400).init().unwrap();
    trainer.update_from_samples(DOCS).unwrap();

    let word_counts = trainer
        .word_counts()
        .iter()
        .map(|(k, c)| (k.clone(), *c))
        .collect::<Vec<_>>();
    let expected = naive_merges(&word_counts, 400 - 257);

    let results = trainer.train().unwrap();
    let merges = results
        .merges
        .iter()
        .map(|(a, b)| (a.as_bytes().to_vec(), b.as_bytes().to_vec()))
        .collect::<Vec<_>>();

    assert_eq!(merges, expected);
}

#[test]
fn test_single_byte_alphabet_exhausts() {
    let mut trainer: BpeTrainer = options(300).init().unwrap();
    trainer.update_from_samples(["a b c d e"]).unwrap();

    let results = trainer.train().unwrap();
    assert_eq!(results.status, TrainingStatus::Exhausted);
    assert!(results.merges.len() < 300 - 257);
    assert!(results.vocab.len() < results.requested_vocab_size);
}

fn corpus_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[ab c\n]{0,16}", 1..6).prop_map(|docs| docs.join(EOT))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_frequency_conservation(text in corpus_strategy()) {
        let mut trainer: BpeTrainer = options(300).init().unwrap();
        trainer.update_from_text(&text).unwrap();

        let re = GPT2_WORD_PATTERN.compile().unwrap();
        let expected: usize = text
            .split(EOT)
            .map(|doc| {
                re.find_iter(doc).count()
            })
            .sum();

        prop_assert_eq!(trainer.word_counts().total(), expected as u128);
    }

    #[test]
    fn prop_index_consistency_and_naive_agreement(text in corpus_strategy()) {
        let mut trainer: BpeTrainer<String, u64> =
            options(320).with_validate_index(true).init().unwrap();
        trainer.update_from_text(&text).unwrap();

        let word_counts = trainer
            .word_counts()
            .iter()
            .map(|(k, c)| (k.clone(), *c))
            .collect::<Vec<_>>();
        let expected = naive_merges(&word_counts, 320 - 257);

        // Index validation runs after every merge.
        let results = trainer.train().unwrap();
        let merges = results
            .merges
            .iter()
            .map(|(a, b)| (a.as_bytes().to_vec(), b.as_bytes().to_vec()))
            .collect::<Vec<_>>();
        prop_assert_eq!(merges, expected);
    }

    #[test]
    fn prop_deterministic_and_chunking_invariant(text in corpus_strategy()) {
        let source = CorpusSource::from_bytes(&text);

        let whole = train_corpus(&source, options(290), &WholeStream).unwrap();
        let again = train_corpus(&source, options(290), &WholeStream).unwrap();
        let chunked = train_corpus(
            &source,
            options(290),
            &FixedBoundaries::new(doc_boundaries(&text)),
        )
        .unwrap();

        prop_assert_eq!(&whole, &again);
        prop_assert_eq!(&whole, &chunked);
    }
}
