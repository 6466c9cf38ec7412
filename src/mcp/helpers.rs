use serde_json::{Value, json};
use unicode_segmentation::UnicodeSegmentation;

/// Appended when a transcript is cut to the character budget
pub(crate) const TRUNCATION_MARKER: &str = "...(truncated / 省略)";

/// Cut `text` to at most `max_chars` user-perceived characters (extended
/// grapheme clusters), flagging the cut
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.grapheme_indices(true).nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Wrap handler output in the MCP tool-result envelope
pub(crate) fn text_content(text: String) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": text
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_long_text_is_marked() {
        assert_eq!(truncate_chars("hello world", 5), "hello...(truncated / 省略)");
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        let text = "画面".repeat(6);
        let cut = truncate_chars(&text, 10);
        assert!(cut.starts_with(&"画面".repeat(5)));
        assert_eq!(cut.chars().count(), 10 + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn test_combining_marks_count_once() {
        let accented = "e\u{301}".repeat(6);
        assert_eq!(truncate_chars(&accented, 10), accented);
        assert_eq!(truncate_chars(&accented, 6), accented);

        let cut = truncate_chars(&accented, 5);
        assert_eq!(cut, format!("{}{}", "e\u{301}".repeat(5), TRUNCATION_MARKER));
    }

    #[test]
    fn test_text_content_envelope() {
        let value = text_content("abc".to_string());
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "abc");
    }
}
