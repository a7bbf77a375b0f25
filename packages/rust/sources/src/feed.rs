//! Syndication feed adapter.
//!
//! Reads RSS, Atom, or JSON Feed documents via `feed-rs` and turns the first
//! `limit` entries, in feed order, into articles stamped with a fixed label.

use chrono::Utc;
use feed_rs::model::Entry;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use hotnews_shared::{Article, HotNewsError, Result};

use crate::http::fetch_bytes;
use crate::text::{flatten_html, parse_timestamp};

/// A feed URL plus the label its articles carry.
#[derive(Debug, Clone)]
pub struct FeedSource {
    url: String,
    label: String,
    limit: usize,
}

impl FeedSource {
    pub fn new(url: &str, label: &str, limit: usize) -> Result<Self> {
        Url::parse(url)
            .map_err(|e| HotNewsError::config(format!("feed '{label}' has invalid URL '{url}': {e}")))?;
        if limit == 0 {
            return Err(HotNewsError::config(format!("feed '{label}' has limit 0")));
        }

        Ok(Self {
            url: url.to_string(),
            label: label.to_string(),
            limit,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Cap this source at a different (non-zero) limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Fetch and parse the feed.
    #[instrument(skip_all, fields(url = %self.url, limit = self.limit))]
    pub async fn fetch(&self, client: &Client) -> Result<Vec<Article>> {
        let body = fetch_bytes(client, &self.url).await?;
        self.parse(&body)
    }

    /// Parse a feed document into at most `limit` articles.
    pub fn parse(&self, body: &[u8]) -> Result<Vec<Article>> {
        let parser = feed_rs::parser::Builder::new()
            .timestamp_parser(parse_timestamp)
            .build();
        let feed = parser
            .parse(body)
            .map_err(|e| HotNewsError::parse(format!("{}: {e}", self.url)))?;

        let articles: Vec<Article> = feed
            .entries
            .into_iter()
            .take(self.limit)
            .filter_map(|entry| self.to_article(entry))
            .collect();

        debug!(count = articles.len(), "feed parsed");
        Ok(articles)
    }

    fn to_article(&self, entry: Entry) -> Option<Article> {
        let title = entry
            .title
            .map(|t| t.content.trim().to_string())
            .unwrap_or_default();
        let url = entry
            .links
            .first()
            .map(|l| l.href.trim().to_string())
            .unwrap_or_default();

        if title.is_empty() || url.is_empty() {
            debug!(id = %entry.id, "entry without title or link, skipping");
            return None;
        }

        let published_at = entry
            .published
            .or(entry.updated)
            .unwrap_or_else(Utc::now);
        let summary = entry
            .summary
            .map(|s| flatten_html(&s.content))
            .unwrap_or_default();

        Some(
            Article::new(title, url, self.label.as_str())
                .published(published_at)
                .with_summary(summary),
        )
    }
}
