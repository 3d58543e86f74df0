//! Exact Match Union Patterns

use crate::regex::regex_wrapper::RegexWrapperPattern;

/// Create a union pattern of exact matches.
///
/// This will always be a [`RegexWrapperPattern::Basic`] variant.
/// Alternatives are tried longest-first, so a special token which
/// extends another special token is removed whole.
///
/// ## Arguments
/// * `alts` - A slice of string-like alternatives to union.
///
/// ## Returns
/// A new `RegexWrapperPattern::Basic` containing the union pattern.
pub fn exact_match_union_regex_pattern<S: AsRef<str>>(alts: &[S]) -> RegexWrapperPattern {
    let mut alts = alts.iter().map(|s| s.as_ref()).collect::<Vec<_>>();
    // Stable: equal-length alternatives keep their configured order.
    alts.sort_by_key(|s| core::cmp::Reverse(s.len()));

    let parts = alts
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>();
    RegexWrapperPattern::Basic(format!("({})", parts.join("|")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::RegexWrapper;

    #[test]
    fn test_fixed_alternative_list() {
        let alternatives = ["apple", "[x]", "boat"];

        let pattern = exact_match_union_regex_pattern(&alternatives);
        assert_eq!(pattern.as_str(), r"(apple|boat|\[x\])");

        let re: RegexWrapper = pattern.compile().unwrap();

        let text = "apple 123 [x] xyz boat";
        assert_eq!(
            re.find_iter(text)
                .collect::<Result<Vec<_>, _>>()
                .unwrap(),
            vec![0..5, 10..13, 18..22]
        );
    }

    #[test]
    fn test_longest_alternative_wins() {
        let alternatives = ["<|a|>", "<|a|><|b|>"];

        let pattern = exact_match_union_regex_pattern(&alternatives);
        assert_eq!(pattern.as_str(), r"(<\|a\|><\|b\|>|<\|a\|>)");

        let re = pattern.compile().unwrap();
        assert_eq!(
            re.find_iter("x<|a|><|b|>y<|a|>")
                .collect::<Result<Vec<_>, _>>()
                .unwrap(),
            vec![1..11, 12..17]
        );
    }
}
