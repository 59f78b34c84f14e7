//! Escape-aware scanning helpers
//!
//! Attribute values quote special characters with a backslash. Two
//! different notions of "escaped" are in use and both are kept:
//!
//! - wildcard boundaries in the matcher count the whole run of preceding
//!   backslashes and treat the wildcard as live when the run is even
//!   ([`is_even_wildcards`]);
//! - everything else (colon splitting, embedded-wildcard detection) only
//!   looks at the single preceding character.
//!
//! Indices are byte offsets. Every character these helpers look for is
//! ASCII, so slicing at the returned offsets is always on a char boundary.

/// Number of backslashes immediately preceding byte `idx`
pub fn preceding_backslashes(s: &str, idx: usize) -> usize {
    s.as_bytes()[..idx.min(s.len())]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
}

/// True when the character at `idx` is not escaped, i.e. the run of
/// backslashes before it has even length
pub fn is_even_wildcards(s: &str, idx: usize) -> bool {
    preceding_backslashes(s, idx) % 2 == 0
}

/// Count the backslashes in `s` that escape the following character
///
/// A backslash that is itself escaped does not count.
pub fn count_escape_characters(s: &str) -> usize {
    let mut active = false;
    let mut count = 0;
    for c in s.chars() {
        if !active && c == '\\' {
            count += 1;
            active = true;
        } else {
            active = false;
        }
    }
    count
}

/// Length of `s` once its escape characters are removed
pub fn length_with_escape_characters(s: &str) -> usize {
    s.len() - count_escape_characters(s)
}

/// Byte index of the first colon not directly preceded by a backslash
pub fn unescaped_colon_index(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| b == b':' && (i == 0 || bytes[i - 1] != b'\\'))
        .map(|(i, _)| i)
}

/// True if `s` contains an unquoted `*` or `?`
pub fn contains_wildcards(s: &str) -> bool {
    contains_unquoted(s, |c| c == '*' || c == '?')
}

/// True if `s` contains an unquoted `?`
pub fn contains_questions(s: &str) -> bool {
    contains_unquoted(s, |c| c == '?')
}

fn contains_unquoted(s: &str, wanted: impl Fn(char) -> bool) -> bool {
    let mut prev = ' ';
    for c in s.chars() {
        if wanted(c) && prev != '\\' {
            return true;
        }
        prev = c;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preceding_backslashes() {
        assert_eq!(preceding_backslashes("abc*", 3), 0);
        assert_eq!(preceding_backslashes(r"ab\*", 3), 1);
        assert_eq!(preceding_backslashes(r"ab\\*", 4), 2);
        assert_eq!(preceding_backslashes(r"\\\?", 3), 3);
        assert_eq!(preceding_backslashes("*", 0), 0);
    }

    #[test]
    fn test_is_even_wildcards() {
        assert!(is_even_wildcards("foo*", 3));
        assert!(!is_even_wildcards(r"foo\*", 4));
        assert!(is_even_wildcards(r"foo\\*", 5));
        assert!(!is_even_wildcards(r"foo\\\*", 6));
    }

    #[test]
    fn test_count_escape_characters() {
        assert_eq!(count_escape_characters("microsoft"), 0);
        assert_eq!(count_escape_characters(r"\!\#icrosoft"), 2);
        assert_eq!(count_escape_characters(r"a\\b"), 1);
        assert_eq!(count_escape_characters(r"a\\\b"), 2);
        assert_eq!(count_escape_characters(""), 0);
    }

    #[test]
    fn test_length_with_escape_characters() {
        assert_eq!(length_with_escape_characters(r"9\.3\.2"), 5);
        assert_eq!(length_with_escape_characters("ab"), 2);
    }

    #[test]
    fn test_unescaped_colon_index() {
        assert_eq!(unescaped_colon_index("cpe:2.3:a"), Some(3));
        assert_eq!(unescaped_colon_index(r"a\:b\:c:d"), Some(7));
        assert_eq!(unescaped_colon_index(r"a\:b"), None);
        assert_eq!(unescaped_colon_index("abc"), None);
        assert_eq!(unescaped_colon_index(":abc"), Some(0));
    }

    #[test]
    fn test_colon_rule_looks_at_single_character_only() {
        // An escaped backslash before a colon still hides the colon here,
        // unlike the parity rule used for wildcards.
        let s = r"ab\\:cd";
        assert_eq!(unescaped_colon_index(s), None);
        assert!(is_even_wildcards(s, 4));
    }

    #[test]
    fn test_contains_wildcards() {
        assert!(contains_wildcards("micro*"));
        assert!(contains_wildcards("?icrosoft"));
        assert!(!contains_wildcards(r"micro\*"));
        assert!(!contains_wildcards(r"sp\?"));
        assert!(!contains_wildcards("microsoft"));
    }

    #[test]
    fn test_contains_questions() {
        assert!(contains_questions("a?b"));
        assert!(!contains_questions("a*b"));
        assert!(!contains_questions(r"a\?b"));
    }
}
