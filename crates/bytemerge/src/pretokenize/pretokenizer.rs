//! # Pretokenizer

use std::ops::Range;

use crate::concurrency::CancelFlag;
use crate::corpus::CorpusSource;
use crate::errors::BMResult;
use crate::pretokenize::word_counter::WordCounter;
use crate::regex::{RegexWrapper, RegexWrapperPattern, exact_match_union_regex_pattern};
use crate::training::{CountType, StringChunkType};

/// Splits text into counted words.
///
/// Special token text is cut out first and never reaches the word pattern;
/// words are then matched independently within each remaining segment.
#[derive(Debug, Clone)]
pub struct Pretokenizer {
    /// Regex for splitting words.
    word_re: RegexWrapper,

    /// Regex for matching special tokens.
    special_re: Option<RegexWrapper>,
}

impl Pretokenizer {
    /// Build a pretokenizer from a word pattern and special tokens.
    ///
    /// ## Arguments
    /// * `word_pattern` - The word split pattern.
    /// * `special_tokens` - Literal strings to remove before word splitting.
    pub fn new<P, S>(
        word_pattern: P,
        special_tokens: &[S],
    ) -> BMResult<Self>
    where
        P: Into<RegexWrapperPattern>,
        S: AsRef<str>,
    {
        let word_re = word_pattern.into().compile()?;

        let special_re = if special_tokens.is_empty() {
            None
        } else {
            Some(exact_match_union_regex_pattern(special_tokens).compile()?)
        };

        Ok(Self::init(word_re, special_re))
    }

    /// Build a pretokenizer from compiled regexes.
    pub fn init(
        word_re: RegexWrapper,
        special_re: Option<RegexWrapper>,
    ) -> Self {
        Self {
            word_re,
            special_re,
        }
    }

    /// The word split regex.
    pub fn word_regex(&self) -> &RegexWrapper {
        &self.word_re
    }

    /// Split `text` around special tokens, dropping the special tokens.
    ///
    /// ## Returns
    /// The non-empty text segments between special token occurrences.
    pub fn segments<'h>(
        &self,
        text: &'h str,
    ) -> BMResult<Vec<&'h str>> {
        let Some(special_re) = &self.special_re else {
            return Ok(if text.is_empty() { vec![] } else { vec![text] });
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for m in special_re.find_iter(text) {
            let Range { start, end } = m?;
            if start > last {
                segments.push(&text[last..start]);
            }
            last = end;
        }
        if last < text.len() {
            segments.push(&text[last..]);
        }
        Ok(segments)
    }

    /// Visit each word of `text`, in order.
    ///
    /// Empty pattern matches carry no bytes and are never visited. The first
    /// error returned by `f` stops the scan.
    pub fn for_each_word<F>(
        &self,
        text: &str,
        mut f: F,
    ) -> BMResult<()>
    where
        F: FnMut(&str) -> BMResult<()>,
    {
        for segment in self.segments(text)? {
            for m in self.word_re.find_iter(segment) {
                f(&segment[m?])?;
            }
        }
        Ok(())
    }

    /// Count the words of `text` into `counter`.
    pub fn count_text<K, C>(
        &self,
        text: &str,
        counter: &mut WordCounter<K, C>,
    ) -> BMResult<()>
    where
        K: StringChunkType,
        C: CountType,
    {
        self.for_each_word(text, |word| counter.add_word(word))
    }

    /// Pretokenize one raw byte chunk.
    ///
    /// Malformed UTF-8 is replaced with U+FFFD rather than rejected.
    pub fn pretokenize<K, C>(
        &self,
        chunk: &[u8],
    ) -> BMResult<WordCounter<K, C>>
    where
        K: StringChunkType,
        C: CountType,
    {
        let text = String::from_utf8_lossy(chunk);
        let mut counter = WordCounter::new();
        self.count_text(&text, &mut counter)?;
        Ok(counter)
    }

    /// Pretokenize one byte range of a corpus.
    fn pretokenize_range<K, C>(
        &self,
        source: &CorpusSource,
        range: &Range<u64>,
        cancel: &CancelFlag,
    ) -> BMResult<WordCounter<K, C>>
    where
        K: StringChunkType,
        C: CountType,
    {
        cancel.check()?;
        let chunk = source.read_range(range)?;
        let counter = self.pretokenize(&chunk)?;
        cancel.check()?;

        log::debug!(
            "pretokenized bytes {:?}: {} distinct words",
            range,
            counter.len()
        );
        Ok(counter)
    }

    /// Pretokenize independent byte ranges of a corpus and sum the results.
    ///
    /// Workers share no mutable state; each reads its own range and builds
    /// its own counter. Any failure, or cancellation via `cancel`, fails
    /// the whole job.
    ///
    /// ## Arguments
    /// * `source` - the corpus.
    /// * `ranges` - non-overlapping byte ranges, see [`CorpusSource::chunk_ranges`].
    /// * `cancel` - shared cancellation flag.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn pretokenize_ranges<K, C>(
        &self,
        source: &CorpusSource,
        ranges: &[Range<u64>],
        cancel: &CancelFlag,
    ) -> BMResult<WordCounter<K, C>>
    where
        K: StringChunkType,
        C: CountType,
    {
        #[cfg(feature = "rayon")]
        let counter = {
            use rayon::prelude::*;

            ranges
                .par_iter()
                .map(|range| self.pretokenize_range(source, range, cancel))
                .try_reduce(WordCounter::new, |mut acc, counter| {
                    acc.merge(counter)?;
                    Ok(acc)
                })?
        };

        #[cfg(not(feature = "rayon"))]
        let counter = {
            let mut acc = WordCounter::new();
            for range in ranges {
                acc.merge(self.pretokenize_range(source, range, cancel)?)?;
            }
            acc
        };

        Ok(counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::FixedBoundaries;
    use crate::errors::BytemergeError;
    use crate::regex::GPT2_WORD_PATTERN;
    use crate::types::check_is_sync;

    const EOT: &str = "<|endoftext|>";

    fn gpt2(specials: &[&str]) -> Pretokenizer {
        Pretokenizer::new(GPT2_WORD_PATTERN, specials).unwrap()
    }

    fn words(
        pretokenizer: &Pretokenizer,
        text: &str,
    ) -> Vec<String> {
        let mut words = vec![];
        pretokenizer
            .for_each_word(text, |w| {
                words.push(w.to_string());
                Ok(())
            })
            .unwrap();
        words
    }

    #[test]
    fn test_segments() {
        let p = gpt2(&[EOT]);
        check_is_sync(&p);

        assert_eq!(
            p.segments("a<|endoftext|>b<|endoftext|><|endoftext|>c")
                .unwrap(),
            vec!["a", "b", "c"]
        );
        assert_eq!(p.segments("<|endoftext|>").unwrap(), Vec::<&str>::new());
        assert_eq!(p.segments("").unwrap(), Vec::<&str>::new());

        let p = gpt2(&[]);
        assert_eq!(p.segments("a<|endoftext|>b").unwrap(), vec!["a<|endoftext|>b"]);
    }

    #[test]
    fn test_words_never_span_special_tokens() {
        let p = gpt2(&[EOT]);

        // Without the split, " cat" would follow "the" across the boundary.
        assert_eq!(
            words(&p, "the<|endoftext|> cat"),
            vec!["the", " cat"]
        );
        assert_eq!(
            words(&p, "Hello world!<|endoftext|>Bye"),
            vec!["Hello", " world", "!", "Bye"]
        );
    }

    #[test]
    fn test_pretokenize_counts() {
        let p = gpt2(&[EOT]);
        let counter: WordCounter<String, u32> = p
            .pretokenize(b"low low lower<|endoftext|>low")
            .unwrap();

        assert_eq!(counter.get("low"), 2);
        assert_eq!(counter.get(" low"), 1);
        assert_eq!(counter.get(" lower"), 1);
        assert_eq!(counter.get(EOT), 0);
        assert_eq!(counter.total(), 4);
    }

    #[test]
    fn test_pretokenize_lossy_utf8() {
        let p = gpt2(&[]);
        let counter: WordCounter<String, u32> = p.pretokenize(b"ab\xFFcd").unwrap();

        assert_eq!(counter.get("ab"), 1);
        assert_eq!(counter.get("\u{FFFD}"), 1);
        assert_eq!(counter.get("cd"), 1);
    }

    #[test]
    fn test_pretokenize_ranges_matches_whole() {
        let text = "the cat<|endoftext|>the hat<|endoftext|> sat on the mat";
        let source = CorpusSource::from_bytes(text);
        let p = gpt2(&[EOT]);

        let whole: WordCounter<String, u64> = p.pretokenize(text.as_bytes()).unwrap();

        let ranges = source
            .chunk_ranges(&FixedBoundaries::new(vec![0, 7, 20, 27, 40, 55]), 4, EOT.as_bytes())
            .unwrap();
        let parallel: WordCounter<String, u64> = p
            .pretokenize_ranges(&source, &ranges, &CancelFlag::new())
            .unwrap();

        assert_eq!(parallel, whole);
    }

    #[test]
    fn test_pretokenize_ranges_cancelled() {
        let source = CorpusSource::from_bytes("some text");
        let p = gpt2(&[]);

        let cancel = CancelFlag::new();
        cancel.cancel();

        let result: BMResult<WordCounter<String, u64>> =
            p.pretokenize_ranges(&source, &[0..4, 4..9], &cancel);
        assert!(matches!(result, Err(BytemergeError::Cancelled)));
    }

    #[test]
    fn test_pretokenize_ranges_count_overflow() {
        let text = " ab".repeat(400);
        let source = CorpusSource::from_bytes(text.as_str());
        let p = gpt2(&[]);

        // Each range fits in a u8 count on its own; their sum does not.
        let result: BMResult<WordCounter<String, u8>> =
            p.pretokenize_ranges(&source, &[0..600, 600..1200], &CancelFlag::new());
        assert!(matches!(
            result,
            Err(BytemergeError::CountOverflow { value: 400 })
        ));
    }
}
