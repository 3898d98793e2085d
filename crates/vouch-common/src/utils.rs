//! Shared text helpers.

/// Length of `input` as Discord counts it, in UTF-16 code units.
///
/// Option length limits are checked against this count so that a value the
/// client accepted is judged the same way here.
pub fn text_len(input: &str) -> usize {
    input.encode_utf16().count()
}

/// Truncates a string to at most `max_chars` characters, ending in an
/// ellipsis when something was cut.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }

    let keep = max_chars.saturating_sub(1);
    let mut truncated: String = input.chars().take(keep).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_len_counts_utf16_units() {
        assert_eq!(text_len("abc"), 3);
        assert_eq!(text_len("é"), 1);
        // Astral plane characters take two code units.
        assert_eq!(text_len("😀"), 2);
    }

    #[test]
    fn test_truncate_string() {
        let input = "This is a very long string that should be truncated";
        let truncated = truncate_string(input, 20);
        assert_eq!(truncated.chars().count(), 20);
        assert!(truncated.starts_with("This is a very long"));
        assert!(truncated.ends_with('…'));

        assert_eq!(truncate_string("Short", 20), "Short");
    }

    #[test]
    fn test_truncate_never_splits_a_character() {
        let input = "⭐".repeat(10);
        let truncated = truncate_string(&input, 4);
        assert_eq!(truncated, "⭐⭐⭐…");
    }
}
