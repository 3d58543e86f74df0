//! # Word Split Patterns

use std::borrow::Cow;

use crate::regex::RegexWrapperPattern;

/// Join string literal patterns with a separator at compile time.
#[macro_export]
macro_rules! join_strs {
    ($sep:literal, ($first:literal $(, $rest:literal)* $(,)?)) => {
        concat!($first $(, $sep, $rest)*)
    };
}

/// Join regex alternatives with ``|`` at compile time.
#[macro_export]
macro_rules! join_patterns {
    ($($e:literal),* $(,)?) => { $crate::join_strs!("|", ($($e),*)) };
}

/// The GPT-2 ("`r50k_base`") word pattern.
///
/// Recognizes contractions, letter runs, digit runs, punctuation runs,
/// and whitespace runs; a leading space binds to the following run.
pub const GPT2_WORD_PATTERN: RegexWrapperPattern = RegexWrapperPattern::Fancy(Cow::Borrowed(join_patterns!(
    r"'(?:[sdmt]|ll|ve|re)",
    r" ?\p{L}+",
    r" ?\p{N}+",
    r" ?[^\s\p{L}\p{N}]+",
    r"\s+(?!\S)",
    r"\s+",
)));

/// The default training word pattern.
pub fn default_word_pattern() -> RegexWrapperPattern {
    GPT2_WORD_PATTERN
}
