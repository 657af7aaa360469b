use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Remove HTML tags, keeping the text between them
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// Cut `text` to `length` characters and append an ellipsis when it was longer
pub fn truncate_text(text: &str, length: usize) -> String {
    match text.char_indices().nth(length) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Plain-text preview of an HTML description for event cards
pub fn description_preview(html: &str, length: usize) -> String {
    truncate_text(strip_html(html).trim(), length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Live <b>jazz</b> night</p>"), "Live jazz night");
        assert_eq!(strip_html("no tags"), "no tags");
        assert_eq!(strip_html("<br/>"), "");
        // An unclosed bracket is not a tag
        assert_eq!(strip_html("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_text("a bit longer than that", 8), "a bit lo...");
        assert_eq!(truncate_text("", 0), "");
    }

    #[test]
    fn test_truncate_text_counts_characters() {
        assert_eq!(truncate_text("Käsityöläiset", 5), "Käsit...");
        assert_eq!(truncate_text("ääää", 4), "ääää");
    }

    #[test]
    fn test_description_preview() {
        let html = "<p>Bring your own instrument and join the open session.</p>";
        assert_eq!(description_preview(html, 9), "Bring you...");
    }
}
