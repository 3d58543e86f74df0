//! # Regex Utilities
//!
//! The GPT-2 word pattern needs lookahead (``\s+(?!\S)``), which only
//! [`fancy_regex`] supports. Patterns are labelled with their target engine by
//! [`RegexWrapperPattern`]; user supplied patterns are ``Adaptive`` and use the
//! faster [`regex`] crate whenever it accepts them.
//!
//! Compiled patterns, [`RegexWrapper`], only ever search for match ranges.

pub mod exact_match_union;
pub mod patterns;
pub mod regex_wrapper;

#[doc(inline)]
pub use exact_match_union::exact_match_union_regex_pattern;
#[doc(inline)]
pub use patterns::{GPT2_WORD_PATTERN, default_word_pattern};
#[doc(inline)]
pub use regex_wrapper::{ErrorWrapper, Matches, RegexWrapper, RegexWrapperPattern};
