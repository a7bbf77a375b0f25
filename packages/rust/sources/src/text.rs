//! Text normalization helpers: HTML flattening and lenient date parsing.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use scraper::{Html, Node};
use tracing::debug;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Elements whose boundaries separate words.
const BREAKING_TAGS: &[&str] = &[
    "p", "br", "div", "li", "ul", "ol", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote",
];

/// Offset-carrying formats tried after RFC 2822 / RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M:%S %z",
];

/// Naive formats, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a publish-date string in whatever common shape a feed uses.
///
/// Returns `None` when nothing fits; callers substitute the capture time.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    debug!(text, "unrecognized timestamp");
    None
}

fn is_breaking(node: &Node) -> bool {
    matches!(node, Node::Element(el) if BREAKING_TAGS.contains(&el.name()))
}

/// Flatten an HTML fragment (feed descriptions) to a single line of text.
///
/// Only text nodes survive: markup, link targets, and emphasis are dropped,
/// and entities are decoded. Block elements and `<br>` become word breaks.
/// Plain text passes through with whitespace collapsed.
pub fn flatten_html(raw: &str) -> String {
    let text = if raw.contains('<') || raw.contains('&') {
        let fragment = Html::parse_fragment(raw);
        let mut text = String::with_capacity(raw.len());
        for node in fragment.root_element().descendants() {
            match node.value() {
                Node::Text(t) => {
                    // Text following a closed block starts a new word.
                    if node.prev_sibling().is_some_and(|prev| is_breaking(prev.value())) {
                        text.push(' ');
                    }
                    text.push_str(t);
                }
                value if is_breaking(value) => text.push(' '),
                _ => {}
            }
        }
        text
    } else {
        raw.to_string()
    };

    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc2822() {
        let dt = parse_timestamp("Mon, 03 Mar 2025 14:05:00 +0900").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 3, 5, 5, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339() {
        let dt = parse_timestamp("2025-03-03T14:05:00+09:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 3, 5, 5, 0).unwrap());
    }

    #[test]
    fn parses_naive_as_utc() {
        let dt = parse_timestamp("2025-03-03 14:05:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 3, 14, 5, 0).unwrap());

        let dt = parse_timestamp("2025.03.03 14:05").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 3, 14, 5, 0).unwrap());
    }

    #[test]
    fn parses_bare_date() {
        let dt = parse_timestamp("2025-03-03").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday-ish").is_none());
        assert!(parse_timestamp("   ").is_none());
    }

    #[test]
    fn flattens_markup() {
        let text = flatten_html("<p>Markets <b>rally</b></p>\n<p>on rate news</p>");
        assert!(!text.contains('<'));
        assert!(text.contains("Markets"));
        assert!(text.contains("rate news"));
        assert!(!text.contains('\n'));
        assert!(!text.contains("**"));
        assert!(!text.contains("]("));
    }

    #[test]
    fn drops_emphasis_and_link_targets() {
        let text = flatten_html(
            "<p>Markets <b>rally</b> on <a href=\"https://x.y/z\">rate</a> news</p>",
        );
        assert_eq!(text, "Markets rally on rate news");
        assert!(!text.contains("**"));
        assert!(!text.contains("]("));
    }

    #[test]
    fn block_boundaries_separate_words() {
        assert_eq!(flatten_html("<p>one</p><p>two</p>line<br>break"), "one two line break");
        assert_eq!(flatten_html("Stocks<em>climbed</em>"), "Stocksclimbed");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(flatten_html("Q&amp;A &lt;live&gt;"), "Q&A <live>");
    }

    #[test]
    fn plain_text_is_only_collapsed() {
        assert_eq!(flatten_html("  two   words \n here "), "two words here");
    }
}
