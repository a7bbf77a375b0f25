//! Core domain types for HotNews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HotNewsError, Result};

/// Smallest number of articles a caller may ask for.
pub const MIN_TOP_N: usize = 1;

/// Largest number of articles a caller may ask for.
pub const MAX_TOP_N: usize = 20;

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// A single news article as it flows through the pipeline.
///
/// Created fresh by a source adapter for every request. Only `hotness_score`
/// changes after creation (seed → merge bonus → source weight), and it never
/// decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier assigned by an outside persistence layer; unused here.
    #[serde(default)]
    pub id: Option<i64>,
    /// Headline. Never empty; the sole dedup key.
    pub title: String,
    /// Link to the article. Opaque, not checked for uniqueness.
    pub url: String,
    /// Free-text provenance label, matched by substring when scoring.
    pub source: String,
    /// Publication time, or capture time when the source gave none.
    pub published_at: DateTime<Utc>,
    /// Raw excerpt from the source; may be empty.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub comment_count: i64,
    /// Accumulated ranking score.
    #[serde(default)]
    pub hotness_score: f64,
}

impl Article {
    /// Build an article captured now, with an empty summary and zero score.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            url: url.into(),
            source: source.into(),
            published_at: Utc::now(),
            summary: String::new(),
            view_count: 0,
            comment_count: 0,
            hotness_score: 0.0,
        }
    }

    /// Set the publication time.
    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = at;
        self
    }

    /// Set the raw summary excerpt.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Seed the hotness score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.hotness_score = score;
        self
    }
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

/// Shape of a top-news response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Ordered list of enriched article records.
    #[default]
    Json,
    /// A single rendered Markdown document.
    Markdown,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Markdown => f.write_str("markdown"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = HotNewsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(HotNewsError::validation(format!(
                "unknown output format '{other}': expected 'json' or 'markdown'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_defaults() {
        let article = Article::new("Title", "https://example.com/a", "Example RSS");
        assert_eq!(article.id, None);
        assert!(article.summary.is_empty());
        assert_eq!(article.view_count, 0);
        assert_eq!(article.comment_count, 0);
        assert_eq!(article.hotness_score, 0.0);
    }

    #[test]
    fn article_serializes_timestamp_as_rfc3339() {
        let at = DateTime::parse_from_rfc3339("2025-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let article = Article::new("Title", "https://example.com/a", "Example RSS").published(at);

        let json = serde_json::to_value(&article).expect("serialize");
        assert_eq!(json["published_at"], "2025-03-01T09:30:00Z");
        assert_eq!(json["hotness_score"], 0.0);
        assert!(json["id"].is_null());
    }

    #[test]
    fn article_deserializes_with_missing_counters() {
        let json = r#"{
            "title": "Title",
            "url": "https://example.com/a",
            "source": "Example",
            "published_at": "2025-03-01T09:30:00Z"
        }"#;
        let article: Article = serde_json::from_str(json).expect("deserialize");
        assert_eq!(article.view_count, 0);
        assert_eq!(article.hotness_score, 0.0);
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "Markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
