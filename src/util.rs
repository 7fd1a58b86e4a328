//! Small text helpers shared across the crate.

/// Truncate `text` to at most `max` characters, appending `...` when
/// anything was cut. Operates on characters, not bytes, so multibyte
/// input never panics.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// A verbatim prefix of `text`, at most `max` characters long.
pub fn char_prefix(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_with_ellipsis("boom", 100), "boom");
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        let s = "x".repeat(100);
        assert_eq!(truncate_with_ellipsis(&s, 100), s);
    }

    #[test]
    fn test_truncate_long_string_gets_ellipsis() {
        let s = "y".repeat(150);
        let out = truncate_with_ellipsis(&s, 100);
        assert_eq!(out.chars().count(), 100);
        assert!(out.ends_with("..."));
        assert!(out.starts_with("yyy"));
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let s = "é".repeat(150);
        let out = truncate_with_ellipsis(&s, 100);
        assert_eq!(out.chars().count(), 100);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_char_prefix() {
        assert_eq!(char_prefix("hello world", 5), "hello");
        assert_eq!(char_prefix("hi", 5), "hi");
        assert_eq!(char_prefix("öööööö", 3), "ööö");
    }
}
