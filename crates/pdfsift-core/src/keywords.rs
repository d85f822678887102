use regex::{Regex, RegexBuilder};

use crate::ScanError;

/// Case-insensitive alternation over a fixed keyword list.
///
/// Keywords are matched as literal substrings; the pattern is compiled once
/// per run and shared by every worker.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Regex,
}

impl KeywordMatcher {
    pub fn new(keywords: &[String]) -> Result<Self, ScanError> {
        let escaped: Vec<String> = keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(k))
            .collect();
        if escaped.is_empty() {
            return Err(ScanError::NoKeywords);
        }

        let pattern = RegexBuilder::new(&escaped.join("|"))
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(keywords: &[&str]) -> KeywordMatcher {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
        KeywordMatcher::new(&keywords).unwrap()
    }

    #[test]
    fn matches_are_case_insensitive() {
        let m = matcher(&["Trailer"]);
        assert!(m.is_match("TRAILER REGISTRATION FORM"));
        assert!(m.is_match("boat trailer for sale"));
        assert!(!m.is_match("truck registration"));
    }

    #[test]
    fn any_keyword_matches() {
        let m = matcher(&["Trailer", "Boat", "12/31/2023"]);
        assert!(m.is_match("Annual Boat Show 2023"));
        assert!(m.is_match("due 12/31/2023"));
        assert!(!m.is_match("Annual Car Show 2023"));
    }

    #[test]
    fn keywords_are_escaped_literally() {
        // "12/31/2023" contains no regex metacharacters, but a keyword with
        // one must not be interpreted as a pattern.
        let m = matcher(&["a.b"]);
        assert!(m.is_match("see a.b for details"));
        assert!(!m.is_match("see axb for details"));
    }

    #[test]
    fn empty_text_never_matches() {
        let m = matcher(&["Trailer", "Boat"]);
        assert!(!m.is_match(""));
        assert!(!m.is_match("   \n\t"));
    }

    #[test]
    fn empty_keyword_list_is_an_error() {
        assert!(matches!(
            KeywordMatcher::new(&[]),
            Err(ScanError::NoKeywords)
        ));
        assert!(matches!(
            KeywordMatcher::new(&[String::new()]),
            Err(ScanError::NoKeywords)
        ));
    }
}
