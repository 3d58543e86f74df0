//! # Vocab Trainer

use core::ops::ControlFlow;

use compact_str::CompactString;

use crate::concurrency::{CancelFlag, est_max_parallelism};
use crate::corpus::{ChunkBoundaryProvider, CorpusSource, WholeStream};
use crate::errors::{BMResult, BytemergeError};
use crate::pretokenize::{Pretokenizer, WordCounter};
use crate::regex::{RegexWrapperPattern, default_word_pattern};
use crate::training::train_results::{MergeStep, TrainResults, TrainingStatus};
use crate::training::utility::{MergeCandidate, PairIndex, WordTable};
use crate::training::{CountType, StringChunkType};
use crate::types::{CommonHashSet, TokenId};
use crate::vocab::{BYTE_VOCAB_SIZE, MergeList, Vocabulary};

/// Options for [`BpeTrainer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BpeTrainerOptions {
    /// The regex pattern used for text splitting.
    pub pattern: RegexWrapperPattern,

    /// The target vocab size, including special tokens and the 256 bytes.
    pub vocab_size: usize,

    /// Special tokens; they get the lowest ids, in order, and are cut out of the training text.
    pub special_tokens: Vec<String>,

    /// The chunk count asked of a [`ChunkBoundaryProvider`].
    pub num_chunks: usize,

    /// The delimiter handed to a [`ChunkBoundaryProvider`].
    ///
    /// Defaults to the first special token.
    pub chunk_delimiter: Option<Vec<u8>>,

    /// Re-check the pair index against a full rescan after every merge.
    ///
    /// This is very slow; it is a debugging aid.
    pub validate_index: bool,
}

impl Default for BpeTrainerOptions {
    fn default() -> Self {
        Self::new(default_word_pattern(), BYTE_VOCAB_SIZE)
    }
}

impl BpeTrainerOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `pattern` - The word split pattern.
    /// * `vocab_size` - The target vocabulary size.
    ///
    /// ## Returns
    /// A new `BpeTrainerOptions` instance.
    pub fn new<P: Into<RegexWrapperPattern>>(
        pattern: P,
        vocab_size: usize,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            vocab_size,
            special_tokens: Vec::new(),
            num_chunks: est_max_parallelism(),
            chunk_delimiter: None,
            validate_index: false,
        }
    }

    /// Sets the vocab size.
    ///
    /// ## Arguments
    /// * `vocab_size` - The desired vocabulary size; must be at least [`Self::base_vocab_size`].
    ///
    /// ## Returns
    /// The updated `BpeTrainerOptions` instance.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the regex pattern used for text splitting.
    ///
    /// The pattern is compiled by [`Self::init`].
    pub fn with_pattern<P: Into<RegexWrapperPattern>>(
        self,
        pattern: P,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }

    /// Sets the special tokens.
    pub fn with_special_tokens<I, S>(
        self,
        special_tokens: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            special_tokens: special_tokens.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Sets the chunk count asked of chunk boundary providers.
    pub fn with_num_chunks(
        self,
        num_chunks: usize,
    ) -> Self {
        Self { num_chunks, ..self }
    }

    /// Sets the chunk delimiter handed to chunk boundary providers.
    pub fn with_chunk_delimiter<B: Into<Vec<u8>>>(
        self,
        delimiter: B,
    ) -> Self {
        Self {
            chunk_delimiter: Some(delimiter.into()),
            ..self
        }
    }

    /// Enable or disable index validation after every merge.
    pub fn with_validate_index(
        self,
        validate_index: bool,
    ) -> Self {
        Self {
            validate_index,
            ..self
        }
    }

    /// The size of the seeded vocabulary: special tokens plus 256 bytes.
    pub fn base_vocab_size(&self) -> usize {
        self.special_tokens.len() + BYTE_VOCAB_SIZE
    }

    /// The number of merges needed to reach the target size.
    pub fn num_merges(&self) -> usize {
        self.vocab_size.saturating_sub(self.base_vocab_size())
    }

    /// The delimiter handed to chunk boundary providers.
    pub fn delimiter(&self) -> &[u8] {
        match (&self.chunk_delimiter, self.special_tokens.first()) {
            (Some(delimiter), _) => delimiter,
            (None, Some(token)) => token.as_bytes(),
            (None, None) => &[],
        }
    }

    /// Check the options, without compiling the pattern.
    pub fn validate(&self) -> BMResult<()> {
        let mut seen = CommonHashSet::default();
        for token in &self.special_tokens {
            if token.is_empty() {
                return Err(BytemergeError::InvalidSpecialToken {
                    token: token.clone(),
                    reason: "empty",
                });
            }
            if !seen.insert(token.as_str()) {
                return Err(BytemergeError::InvalidSpecialToken {
                    token: token.clone(),
                    reason: "duplicate",
                });
            }
        }

        let base = self.base_vocab_size();
        if self.vocab_size < base {
            return Err(BytemergeError::VocabSizeTooSmall {
                size: self.vocab_size,
                base,
            });
        }

        let max = u64::from(TokenId::MAX) + 1;
        if self.vocab_size as u64 > max {
            return Err(BytemergeError::VocabSizeOverflow {
                size: self.vocab_size,
            });
        }

        Ok(())
    }

    /// Initializes a [`BpeTrainer`] from these options.
    ///
    /// ## Returns
    /// A new `BpeTrainer`, or the first configuration error.
    pub fn init<K, C>(self) -> BMResult<BpeTrainer<K, C>>
    where
        K: StringChunkType,
        C: CountType,
    {
        BpeTrainer::new(self)
    }
}

/// Trainer for byte-level BPE vocabularies.
///
/// Word counts are accumulated first, by any mix of the ``update_from_*``
/// methods; [`BpeTrainer::train`] then runs the merge loop.
///
/// # Parameters
/// * `K` - the type used to store strings in the word counts.
/// * `C` - the type used to store counts in the word counts.
pub struct BpeTrainer<K = CompactString, C = u64>
where
    K: StringChunkType,
    C: CountType,
{
    options: BpeTrainerOptions,
    pretokenizer: Pretokenizer,
    word_counts: WordCounter<K, C>,
    cancel: CancelFlag,
}

impl<K, C> BpeTrainer<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    /// Initializes a [`BpeTrainer`].
    ///
    /// Fails before any work is done if the options are invalid,
    /// or the pattern does not compile.
    pub fn new(options: BpeTrainerOptions) -> BMResult<Self> {
        options.validate()?;
        let pretokenizer = Pretokenizer::new(options.pattern.clone(), &options.special_tokens)?;

        Ok(Self {
            options,
            pretokenizer,
            word_counts: WordCounter::new(),
            cancel: CancelFlag::new(),
        })
    }

    /// The trainer options.
    pub fn options(&self) -> &BpeTrainerOptions {
        &self.options
    }

    /// The pretokenizer.
    pub fn pretokenizer(&self) -> &Pretokenizer {
        &self.pretokenizer
    }

    /// A handle which cancels pretokenization and training when set.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// The word counts accumulated so far.
    pub fn word_counts(&self) -> &WordCounter<K, C> {
        &self.word_counts
    }

    /// Update word counts inplace from a sample iterator.
    ///
    /// ## Arguments
    /// * `samples` - An iterator over string-like samples.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) -> BMResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for sample in samples {
            self.update_from_text(sample.as_ref())?;
        }
        Ok(())
    }

    /// Update word counts inplace from one text.
    pub fn update_from_text(
        &mut self,
        text: &str,
    ) -> BMResult<()> {
        self.pretokenizer.count_text(text, &mut self.word_counts)
    }

    /// Update word counts inplace from a corpus.
    ///
    /// The corpus is split into byte ranges by `provider`; the ranges are
    /// pretokenized independently (in parallel under the "rayon" feature)
    /// and their counts summed.
    ///
    /// ## Arguments
    /// * `source` - the corpus.
    /// * `provider` - the chunk boundary source.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn update_from_corpus<P: ChunkBoundaryProvider>(
        &mut self,
        source: &CorpusSource,
        provider: &P,
    ) -> BMResult<()> {
        let ranges =
            source.chunk_ranges(provider, self.options.num_chunks.max(1), self.options.delimiter())?;

        log::info!("Pretokenizing {} chunks", ranges.len());

        let counter: WordCounter<K, C> =
            self.pretokenizer
                .pretokenize_ranges(source, &ranges, &self.cancel)?;

        log::info!(
            "Pretokenized {} words ({} distinct)",
            counter.total(),
            counter.len()
        );

        self.word_counts.merge(counter)
    }

    /// Update word counts inplace from several corpora.
    ///
    /// Every source is checked with [`CorpusSource::validate`] before any is
    /// pretokenized, so an unreadable input fails the call without
    /// touching the word counts.
    pub fn update_from_corpora<P: ChunkBoundaryProvider>(
        &mut self,
        sources: &[CorpusSource],
        provider: &P,
    ) -> BMResult<()> {
        for source in sources {
            source.validate()?;
        }
        for source in sources {
            self.update_from_corpus(source, provider)?;
        }
        Ok(())
    }

    /// Run the merge loop.
    ///
    /// ## Returns
    /// The vocabulary and merge list. Running out of pairs is not an error;
    /// see [`TrainResults::status`].
    pub fn train(self) -> BMResult<TrainResults> {
        self.train_with_observer(|_| ControlFlow::Continue(()))
    }

    /// Run the merge loop, reporting each completed merge to `observer`.
    ///
    /// Returning [`ControlFlow::Break`] from the observer, or setting the
    /// cancel flag, stops training after the current merge with
    /// [`TrainingStatus::Cancelled`].
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn train_with_observer<F>(
        self,
        mut observer: F,
    ) -> BMResult<TrainResults>
    where
        F: FnMut(&MergeStep<C>) -> ControlFlow<()>,
    {
        let Self {
            options,
            word_counts,
            cancel,
            ..
        } = self;

        let mut vocab = Vocabulary::with_specials(&options.special_tokens);
        let mut merges = MergeList::new();

        let num_merges = options.num_merges();
        log::info!("Starting BPE training: {} merges to compute", num_merges);

        let (mut words, location_index) = WordTable::reform(word_counts.release());

        log::info!("Building pair index over {} words", words.len());
        let mut index = PairIndex::new(&words, location_index)?;
        if options.validate_index {
            index.check_consistency(&words)?;
        }

        log::info!("Starting merge loop with {} unique pairs", index.len());
        let mut status = TrainingStatus::Complete;
        let mut last_log_percent = 0;

        while merges.len() < num_merges {
            if cancel.is_cancelled() {
                status = TrainingStatus::Cancelled;
                break;
            }

            let Some(MergeCandidate { count, pair }) = index.select_merge_candidate() else {
                status = TrainingStatus::Exhausted;
                break;
            };

            let token_id = vocab.push(pair.0.concat(&pair.1))?;

            let deltas = index.apply_merge(&mut words, &pair)?;
            log::trace!("merge {:?}: {} pair deltas", pair, deltas.len());

            if options.validate_index {
                index.check_consistency(&words)?;
            }

            merges.push(pair.clone());
            let merges_done = merges.len();

            // Log progress every 1%
            let current_percent = (merges_done * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges) - Last merge: {:?} -> {} (frequency: {})",
                    current_percent,
                    merges_done,
                    num_merges,
                    pair,
                    token_id,
                    count
                );
                last_log_percent = current_percent;
            }

            let step = MergeStep {
                index: merges_done - 1,
                token_id,
                pair,
                count,
            };
            if observer(&step).is_break() {
                status = TrainingStatus::Cancelled;
                break;
            }
        }

        match status {
            TrainingStatus::Exhausted => log::warn!(
                "No pairs left to merge: stopped at {} of {} merges",
                merges.len(),
                num_merges
            ),
            TrainingStatus::Cancelled => log::warn!(
                "Training cancelled after {} of {} merges",
                merges.len(),
                num_merges
            ),
            TrainingStatus::Complete => {}
        }
        log::info!("Finished training: {} merges completed", merges.len());

        Ok(TrainResults {
            vocab,
            merges,
            status,
            requested_vocab_size: options.vocab_size,
        })
    }
}

/// Train a vocabulary from a corpus with the default word pattern.
///
/// The corpus is pretokenized as a single chunk, on one thread. For
/// parallel pretokenization of large corpora, call [`train_corpus`] with a
/// [`ChunkBoundaryProvider`] that splits on a special token.
///
/// ## Arguments
/// * `corpus` - the training corpus.
/// * `vocab_size` - the target vocabulary size, including special tokens and the 256 bytes.
/// * `special_tokens` - reserved low-id entries, excluded from training.
pub fn train<S: AsRef<str>>(
    corpus: &CorpusSource,
    vocab_size: usize,
    special_tokens: &[S],
) -> BMResult<TrainResults> {
    let options = BpeTrainerOptions::new(default_word_pattern(), vocab_size)
        .with_special_tokens(special_tokens.iter().map(|s| s.as_ref().to_string()));
    train_corpus(corpus, options, &WholeStream)
}

/// Train a vocabulary from a corpus, chunked by `provider`.
pub fn train_corpus<P: ChunkBoundaryProvider>(
    corpus: &CorpusSource,
    options: BpeTrainerOptions,
    provider: &P,
) -> BMResult<TrainResults> {
    let mut trainer: BpeTrainer = options.init()?;
    trainer.update_from_corpus(corpus, provider)?;
    trainer.train()
}
