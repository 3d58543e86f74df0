use std::{
    fs::File,
    io::{BufWriter, Write},
};

/// Map the ``-`` stdio placeholder to `None`.
fn squash_standard_io(path: Option<&str>) -> Option<&str> {
    path.filter(|p| *p != "-")
}

/// Vocab output argument group.
#[derive(clap::Args, Debug, Default)]
pub struct OutputArgs {
    /// Vocab output file; stdout when absent or "-".
    #[clap(long)]
    pub output: Option<String>,
}

impl OutputArgs {
    /// Where the vocab goes, for log messages.
    pub fn describe(&self) -> &str {
        squash_standard_io(self.output.as_deref()).unwrap_or("<stdout>")
    }

    /// Open a buffered writer for the vocab.
    pub fn open_writer(&self) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
        Ok(match squash_standard_io(self.output.as_deref()) {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squash_standard_io() {
        assert_eq!(squash_standard_io(None), None);
        assert_eq!(squash_standard_io(Some("-")), None);
        assert_eq!(
            squash_standard_io(Some("vocab.tiktoken")),
            Some("vocab.tiktoken")
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(OutputArgs::default().describe(), "<stdout>");

        let args = OutputArgs {
            output: Some("vocab.tiktoken".to_string()),
        };
        assert_eq!(args.describe(), "vocab.tiktoken");
    }
}
