//! Plain-text views of entry HTML: stripping, tag/mention extraction, titles.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::defaults::UNTITLED_ENTRY;
use crate::models::Entry;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*(br|/p|/div|/li|/h[1-6])\b[^>]*>").expect("valid regex")
});
static HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\w&])#(\w+)").expect("valid regex"));
static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\w])@(\w+)").expect("valid regex"));
static PHOTO_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*\bdata-(?:attachment|photo)-id\s*="#).expect("valid regex")
});

const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch))
}

/// Remove markup, decode common entities and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    let text = HTML_TAG.replace_all(html, " ");
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`strip_html`] but keeps block boundaries as newlines.
pub fn html_to_lines(html: &str) -> Vec<String> {
    let broken = BLOCK_BREAK.replace_all(html, "\n");
    let text = decode_entities(&HTML_TAG.replace_all(&broken, ""));
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

fn capture_words(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `#tags` in the content, lowercase, deduplicated and sorted.
pub fn extract_tags(html: &str) -> Vec<String> {
    capture_words(&HASHTAG, &strip_html(html))
}

/// `@mentions` in the content, lowercase, deduplicated and sorted.
pub fn extract_mentions(html: &str) -> Vec<String> {
    capture_words(&MENTION, &strip_html(html))
}

/// Number of inline photo attachments in the content.
pub fn count_photo_tags(html: &str) -> usize {
    PHOTO_TAG.find_iter(html).count()
}

/// Title to show in lists: the title, else the first content line.
pub fn display_title(entry: &Entry, max_len: usize) -> String {
    if let Some(title) = entry.title_text() {
        return truncate(title.trim(), max_len);
    }
    html_to_lines(&entry.content)
        .into_iter()
        .next()
        .map(|line| truncate(&line, max_len))
        .unwrap_or_else(|| UNTITLED_ENTRY.to_string())
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>world</b></p><p>again</p>"), "Hello world again");
        assert_eq!(strip_html("Fish &amp; chips&nbsp;tonight"), "Fish & chips tonight");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_html_to_lines() {
        let lines = html_to_lines("<p>First line</p><p>Second <i>line</i></p><br>");
        assert_eq!(lines, vec!["First line", "Second line"]);
    }

    #[test]
    fn test_extract_tags_lowercase_dedup() {
        let tags = extract_tags("<p>#Work and #home, also #work</p><p>#side_project</p>");
        assert_eq!(tags, vec!["home", "side_project", "work"]);
    }

    #[test]
    fn test_extract_tags_ignores_entities_and_anchors() {
        assert!(extract_tags("<p>no&#35;tag here, issue&#39;s</p>").is_empty());
        assert!(extract_tags("<a href=\"#section\">link</a>").is_empty());
    }

    #[test]
    fn test_extract_mentions_skips_emails() {
        let mentions = extract_mentions("<p>ping @Alice and mail bob@example.com</p>");
        assert_eq!(mentions, vec!["alice"]);
    }

    #[test]
    fn test_count_photo_tags() {
        let html = r#"<p>x</p><img data-attachment-id="1" src="a"><img src="b" data-photo-id="2"><img src="c">"#;
        assert_eq!(count_photo_tags(html), 2);
    }

    #[test]
    fn test_display_title() {
        let user = Uuid::new_v4();
        let entry = Entry::new(user, "<p>Groceries for the week</p><p>eggs</p>");
        assert_eq!(
            display_title(&entry, crate::defaults::DISPLAY_TITLE_MAX_LEN),
            "Groceries for the week"
        );
        assert_eq!(display_title(&entry, 10), "Groceri...");
        let titled = Entry::new(user, "<p>body</p>").with_title("Plan");
        assert_eq!(display_title(&titled, 80), "Plan");
        let empty = Entry::new(user, "<p></p>");
        assert_eq!(display_title(&empty, 80), "Untitled");
    }
}
