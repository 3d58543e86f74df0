//! # Regex Wrapper

use core::ops::Range;
use std::borrow::Cow;

/// A compile or match failure from either regex engine.
#[non_exhaustive]
#[derive(Clone, Debug, thiserror::Error)]
pub enum ErrorWrapper {
    /// Error from `regex`.
    #[error(transparent)]
    Basic(#[from] regex::Error),

    /// Error from `fancy_regex`.
    #[error(transparent)]
    Fancy(#[from] fancy_regex::Error),
}

/// A word split pattern, labelled with the engine it targets.
///
/// Borrowed patterns may be declared as constants, see
/// [`GPT2_WORD_PATTERN`](crate::regex::GPT2_WORD_PATTERN).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RegexWrapperPattern {
    /// Compile with `regex`.
    Basic(Cow<'static, str>),

    /// Compile with `fancy_regex`; needed for lookaround.
    Fancy(Cow<'static, str>),

    /// Try `regex`, then fall back to `fancy_regex`.
    Adaptive(Cow<'static, str>),
}

impl From<&str> for RegexWrapperPattern {
    fn from(pattern: &str) -> Self {
        Self::Adaptive(Cow::Owned(pattern.to_string()))
    }
}

impl From<String> for RegexWrapperPattern {
    fn from(pattern: String) -> Self {
        Self::Adaptive(Cow::Owned(pattern))
    }
}

impl RegexWrapperPattern {
    /// The pattern source.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) | Self::Fancy(pattern) | Self::Adaptive(pattern) => pattern,
        }
    }

    /// Compile the pattern with the engine it is labelled for.
    pub fn compile(&self) -> Result<RegexWrapper, ErrorWrapper> {
        Ok(match self {
            Self::Basic(pattern) => regex::Regex::new(pattern)?.into(),
            Self::Fancy(pattern) => fancy_regex::Regex::new(pattern)?.into(),
            Self::Adaptive(pattern) => match regex::Regex::new(pattern) {
                Ok(re) => re.into(),
                Err(_) => fancy_regex::Regex::new(pattern)?.into(),
            },
        })
    }
}

/// A compiled pattern from either engine.
#[derive(Debug, Clone)]
pub enum RegexWrapper {
    /// A `regex::Regex`.
    Basic(regex::Regex),

    /// A `fancy_regex::Regex`.
    Fancy(fancy_regex::Regex),
}

impl From<regex::Regex> for RegexWrapper {
    fn from(regex: regex::Regex) -> Self {
        Self::Basic(regex)
    }
}

impl From<fancy_regex::Regex> for RegexWrapper {
    fn from(regex: fancy_regex::Regex) -> Self {
        Self::Fancy(regex)
    }
}

impl RegexWrapper {
    /// Was this compiled by `fancy_regex`?
    pub fn is_fancy(&self) -> bool {
        matches!(self, Self::Fancy(_))
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(regex) => regex.as_str(),
            Self::Fancy(regex) => regex.as_str(),
        }
    }

    /// Iterate over the byte ranges of the non-empty matches in `haystack`.
    pub fn find_iter<'r, 'h>(
        &'r self,
        haystack: &'h str,
    ) -> Matches<'r, 'h> {
        let inner = match self {
            Self::Basic(regex) => EngineMatches::Basic(regex.find_iter(haystack)),
            Self::Fancy(regex) => EngineMatches::Fancy(regex.find_iter(haystack)),
        };
        Matches { inner }
    }
}

enum EngineMatches<'r, 'h> {
    Basic(regex::Matches<'r, 'h>),
    Fancy(fancy_regex::Matches<'r, 'h>),
}

/// Match ranges from [`RegexWrapper::find_iter`].
///
/// `fancy_regex` can fail mid-scan (backtrack limits); such failures are
/// yielded as errors.
pub struct Matches<'r, 'h> {
    inner: EngineMatches<'r, 'h>,
}

impl Iterator for Matches<'_, '_> {
    type Item = Result<Range<usize>, ErrorWrapper>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = match &mut self.inner {
                EngineMatches::Basic(matches) => matches.next().map(|m| Ok(m.range())),
                EngineMatches::Fancy(matches) => matches
                    .next()
                    .map(|m| m.map(|m| m.range()).map_err(ErrorWrapper::from)),
            }?;

            match next {
                Ok(range) if range.is_empty() => continue,
                other => return Some(other),
            }
        }
    }
}
