//! Summaries and output rendering.
//!
//! Turns the ranked selection into the caller's requested shape: either the
//! enriched article records themselves, or one Markdown document.

use std::fmt::Write as _;

use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;

use hotnews_shared::{Article, OutputFormat};

/// Source excerpts at or below this many characters are not worth showing.
const MIN_EXCERPT_CHARS: usize = 20;

/// Longest summary produced, ellipsis included.
const MAX_SUMMARY_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// A top-news response.
///
/// Serializes as a JSON array of articles, or as `{"markdown": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TopNews {
    Articles(Vec<Article>),
    Document { markdown: String },
}

impl TopNews {
    /// The rendered document, if this is a Markdown response.
    pub fn markdown(&self) -> Option<&str> {
        match self {
            Self::Document { markdown } => Some(markdown),
            Self::Articles(_) => None,
        }
    }

    /// The article records, if this is a JSON response.
    pub fn articles(&self) -> Option<&[Article]> {
        match self {
            Self::Articles(articles) => Some(articles),
            Self::Document { .. } => None,
        }
    }
}

/// Short, human-readable summary for one article.
///
/// A usable source excerpt (more than 20 characters) is trimmed and, when
/// longer than 200 characters, cut to 197 plus an ellipsis. Anything shorter
/// is replaced by a pointer to the source link.
pub fn summarize(article: &Article) -> String {
    if article.summary.chars().count() > MIN_EXCERPT_CHARS {
        let excerpt = article.summary.trim();
        if excerpt.chars().count() > MAX_SUMMARY_CHARS {
            let cut: String = excerpt
                .chars()
                .take(MAX_SUMMARY_CHARS - ELLIPSIS.len())
                .collect();
            return format!("{cut}{ELLIPSIS}");
        }
        return excerpt.to_string();
    }

    format!(
        "Details for '{}' are available at the source link.",
        article.title
    )
}

/// Replace every article's summary with its generated one.
pub fn enrich(articles: Vec<Article>) -> Vec<Article> {
    articles
        .into_iter()
        .map(|mut article| {
            article.summary = summarize(&article);
            article
        })
        .collect()
}

/// Render enriched articles as a Markdown document.
///
/// The heading states the number of articles actually listed.
pub fn render_markdown(articles: &[Article], generated_at: DateTime<Local>) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# Today's Hot News Top {}", articles.len());
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "*Generated at: {}*",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(md);
    let _ = writeln!(md, "---");
    let _ = writeln!(md);

    for (i, article) in articles.iter().enumerate() {
        let _ = writeln!(md, "## {}. [{}]({})", i + 1, article.title, article.url);
        let _ = writeln!(
            md,
            "**Source**: {} | **Published**: {}",
            article.source,
            article
                .published_at
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let _ = writeln!(md);
        let _ = writeln!(md, "{}", article.summary);
        let _ = writeln!(md);
        let _ = writeln!(md, "---");
        let _ = writeln!(md);
    }

    let _ = writeln!(
        md,
        "*This digest was collected and ranked automatically from public news sources.*"
    );
    md
}

/// Enrich the selection and shape it for the requested format.
pub fn render(articles: Vec<Article>, format: OutputFormat) -> TopNews {
    let enriched = enrich(articles);
    match format {
        OutputFormat::Json => TopNews::Articles(enriched),
        OutputFormat::Markdown => TopNews::Document {
            markdown: render_markdown(&enriched, Local::now()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(title: &str, summary: &str) -> Article {
        Article::new(title, "https://news.example.com/1", "Example RSS")
            .published(Utc.with_ymd_and_hms(2025, 3, 3, 5, 5, 0).unwrap())
            .with_summary(summary)
    }

    fn fixed_time() -> DateTime<Local> {
        Utc.with_ymd_and_hms(2025, 3, 3, 6, 0, 0)
            .unwrap()
            .with_timezone(&Local)
    }

    #[test]
    fn long_excerpt_is_cut_to_200() {
        let a = article("T", &"x".repeat(300));
        let s = summarize(&a);
        assert_eq!(s.chars().count(), 200);
        assert!(s.ends_with("..."));
        assert!(s.starts_with(&"x".repeat(197)));
    }

    #[test]
    fn summary_length_cases() {
        let text = "a".repeat(25);
        assert_eq!(summarize(&article("T", &text)), text);

        let long = summarize(&article("T", &"b".repeat(250)));
        assert_eq!(long.chars().count(), 200);
        assert!(long.ends_with("..."));

        let short = summarize(&article("Budget", &"c".repeat(15)));
        assert_eq!(short, "Details for 'Budget' are available at the source link.");
    }

    #[test]
    fn exactly_200_is_kept() {
        let text = "y".repeat(200);
        assert_eq!(summarize(&article("T", &text)), text);
    }

    #[test]
    fn medium_excerpt_is_trimmed() {
        let a = article("T", "  A thirty-character summary!!  ");
        assert_eq!(summarize(&a), "A thirty-character summary!!");
    }

    #[test]
    fn short_excerpt_falls_back() {
        let a = article("Weather warning issued", "Too short");
        assert_eq!(
            summarize(&a),
            "Details for 'Weather warning issued' are available at the source link."
        );
        let a = article("Weather warning issued", "");
        assert!(summarize(&a).starts_with("Details for 'Weather warning issued'"));
    }

    #[test]
    fn length_check_counts_untrimmed_text() {
        // 15 visible characters padded to 25: passes the check, then trimmed.
        let a = article("T", "     fifteen chars..     ");
        assert_eq!(summarize(&a), "fifteen chars..");
    }

    #[test]
    fn truncation_counts_characters() {
        let a = article("T", &"뉴".repeat(250));
        let s = summarize(&a);
        assert_eq!(s.chars().count(), 200);
        assert!(s.starts_with(&"뉴".repeat(197)));
    }

    #[test]
    fn enrich_keeps_order_and_rewrites_summaries() {
        let out = enrich(vec![article("First", ""), article("Second", &"z".repeat(30))]);
        assert_eq!(out[0].title, "First");
        assert!(out[0].summary.starts_with("Details for 'First'"));
        assert_eq!(out[1].summary, "z".repeat(30));
    }

    #[test]
    fn markdown_layout() {
        let articles = enrich(vec![
            article("Markets rally on rate news", &"Stocks climbed sharply today. ".repeat(2)),
            article("Local team wins championship", ""),
            article("Weather warning issued", "Heavy rain expected across the south."),
        ]);
        let md = render_markdown(&articles, fixed_time());

        assert!(md.starts_with("# Today's Hot News Top 3\n"));
        assert!(md.contains("*Generated at: "));
        assert!(md.contains("## 1. [Markets rally on rate news](https://news.example.com/1)"));
        assert!(md.contains("## 2. [Local team wins championship](https://news.example.com/1)"));
        assert!(md.contains("**Source**: Example RSS | **Published**: 2025-03-03T05:05:00Z"));
        assert!(md.contains("Details for 'Local team wins championship'"));
        assert!(md.trim_end().ends_with("automatically from public news sources.*"));

        assert!(md.contains("Heavy rain expected across the south."));

        let first = md.find("## 1.").unwrap();
        let second = md.find("## 2.").unwrap();
        let third = md.find("## 3. [Weather warning issued]").unwrap();
        assert!(first < second && second < third);
        // Header rule plus one rule per article.
        assert_eq!(md.matches("\n---\n").count(), 4);

        // Each numbered heading sits directly above its metadata line.
        let lines: Vec<&str> = md.lines().collect();
        let headings: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.starts_with("## "))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(headings.len(), 3);
        for (n, &i) in headings.iter().enumerate() {
            assert!(lines[i].starts_with(&format!("## {}. [", n + 1)));
            assert!(
                lines[i + 1].starts_with("**Source**: "),
                "line after heading {}: {:?}",
                n + 1,
                lines[i + 1]
            );
        }
    }

    #[test]
    fn empty_selection_renders_header_and_footer() {
        let md = render_markdown(&[], fixed_time());
        assert!(md.starts_with("# Today's Hot News Top 0"));
        assert!(!md.contains("## "));
        assert!(md.contains("automatically"));
    }

    #[test]
    fn render_json_shape() {
        let out = render(vec![article("Only", "")], OutputFormat::Json);
        let records = out.articles().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].summary.starts_with("Details for 'Only'"));

        let value = serde_json::to_value(&out).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["title"], "Only");
        assert_eq!(value[0]["source"], "Example RSS");
    }

    #[test]
    fn render_markdown_shape() {
        let out = render(vec![article("Only", "")], OutputFormat::Markdown);
        let md = out.markdown().unwrap();
        assert!(md.contains("## 1. [Only]"));

        let value = serde_json::to_value(&out).unwrap();
        assert!(value["markdown"].as_str().unwrap().starts_with("# Today's Hot News Top 1"));
    }
}
