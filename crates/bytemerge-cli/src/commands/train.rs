use std::io::Write;

use bytemerge::{
    BpeTrainer,
    BpeTrainerOptions,
    TrainResults,
    corpus::{CorpusSource, FixedBoundaries, WholeStream},
    regex::GPT2_WORD_PATTERN,
    vocab::io::{save_base64_merges_path, write_base64_vocab},
};

use crate::{LogArgs, input_output::OutputArgs};

/// Args for the train command.
#[derive(clap::Args, Debug)]
pub struct TrainArgs {
    /// Input files.
    #[arg(required = true)]
    files: Vec<String>,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Target vocab size, including special tokens and the 256 bytes.
    #[arg(long, default_value = "10000")]
    vocab_size: usize,

    /// Special tokens; repeat for more than one.
    #[arg(long = "special-token", default_value = "<|endoftext|>")]
    special_tokens: Vec<String>,

    /// Word span regex.
    #[arg(long, default_value_t = GPT2_WORD_PATTERN.as_str().to_string())]
    regex: String,

    /// Chunk boundary offsets for a single input file, e.g. ``0,4096,8192``.
    ///
    /// The offsets must start at 0, end at the file length, and not split a special token.
    #[arg(long, value_delimiter = ',')]
    boundaries: Option<Vec<u64>>,

    /// Check the pair index after every merge (slow).
    #[arg(long)]
    validate_index: bool,

    /// Log the N longest trained tokens.
    #[arg(long, default_value = "0")]
    longest: usize,

    /// Optional merges output file.
    #[arg(long)]
    merges_output: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

impl TrainArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        if self.boundaries.is_some() && self.files.len() != 1 {
            return Err("--boundaries requires exactly one input file".into());
        }

        let options = BpeTrainerOptions::new(self.regex.clone(), self.vocab_size)
            .with_special_tokens(self.special_tokens.iter().cloned())
            .with_validate_index(self.validate_index);

        let mut trainer: BpeTrainer<String, u64> = options.init()?;

        log::info!("Reading shards:");
        let sources = self
            .files
            .iter()
            .enumerate()
            .map(|(idx, path)| {
                log::info!("{idx}: {path}");
                CorpusSource::from_path(path)
            })
            .collect::<Vec<_>>();

        match &self.boundaries {
            Some(offsets) => {
                trainer.update_from_corpora(&sources, &FixedBoundaries::new(offsets.clone()))?
            }
            None => trainer.update_from_corpora(&sources, &WholeStream)?,
        }

        log::info!("Training Tokenizer...");
        let results = trainer.train()?;

        log::info!(
            "Vocabulary Size: {} of {} ({:?})",
            results.vocab.len(),
            results.requested_vocab_size,
            results.status
        );
        self.log_longest(&results);

        log::info!("vocab output: {}", self.output.describe());
        let mut writer = self.output.open_writer()?;
        write_base64_vocab(&results.vocab, &mut writer)?;
        writer.flush()?;

        if let Some(path) = &self.merges_output {
            log::info!("merges output: {}", path);
            save_base64_merges_path(&results.merges, path)?;
        }

        Ok(())
    }

    fn log_longest(
        &self,
        results: &TrainResults,
    ) {
        if self.longest == 0 {
            return;
        }

        let mut tokens = results.vocab.merged().collect::<Vec<_>>();
        tokens.sort_by(|(a_id, a), (b_id, b)| b.len().cmp(&a.len()).then(a_id.cmp(b_id)));

        log::info!("Longest tokens:");
        for (id, bytes) in tokens.into_iter().take(self.longest) {
            log::info!("{id}: {:?}", String::from_utf8_lossy(bytes));
        }
    }
}
