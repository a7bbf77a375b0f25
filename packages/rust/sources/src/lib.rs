//! News source adapters.
//!
//! This crate provides:
//! - [`feed`]: syndication feed adapter (RSS, Atom, JSON Feed via `feed-rs`)
//! - [`hot_page`]: HTML "hot news" page adapter with ordered extraction strategies
//! - [`Source`]: a configured adapter, and [`SourceOutcome`], the explicit
//!   success/failure value every invocation produces

pub mod feed;
pub mod hot_page;
mod http;
mod text;

use reqwest::Client;
use tracing::{info, instrument, warn};

use hotnews_shared::{Article, Result, SourceConfig};

pub use feed::FeedSource;
pub use hot_page::{HotPageSource, Strategy};
pub use http::build_client;
pub use text::{flatten_html, parse_timestamp};

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// A configured, ready-to-run source adapter.
///
/// Cheap to clone; compiled selectors are shared.
#[derive(Debug, Clone)]
pub enum Source {
    Feed(FeedSource),
    HotPage(HotPageSource),
}

impl Source {
    /// Build an adapter from its config entry, compiling selectors and patterns.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        match config {
            SourceConfig::Feed { url, label, limit } => {
                Ok(Self::Feed(FeedSource::new(url, label, *limit)?))
            }
            SourceConfig::HotPage {
                url,
                tag,
                limit,
                seed_score,
                strategies,
            } => Ok(Self::HotPage(HotPageSource::new(
                url,
                tag,
                *limit,
                *seed_score,
                strategies,
            )?)),
        }
    }

    /// Name used in logs and outcomes.
    pub fn name(&self) -> &str {
        match self {
            Self::Feed(s) => s.label(),
            Self::HotPage(s) => s.tag(),
        }
    }

    /// The same adapter capped at a different limit.
    pub fn with_limit(&self, limit: usize) -> Self {
        match self {
            Self::Feed(s) => Self::Feed(s.clone().with_limit(limit)),
            Self::HotPage(s) => Self::HotPage(s.clone().with_limit(limit)),
        }
    }

    /// Maximum number of articles this adapter emits.
    pub fn limit(&self) -> usize {
        match self {
            Self::Feed(s) => s.limit(),
            Self::HotPage(s) => s.limit(),
        }
    }

    /// Fetch articles, propagating the failure reason.
    pub async fn fetch(&self, client: &Client) -> Result<Vec<Article>> {
        match self {
            Self::Feed(s) => s.fetch(client).await,
            Self::HotPage(s) => s.fetch(client).await,
        }
    }

    /// Fetch articles and fold the result into an outcome. Never fails.
    #[instrument(skip_all, fields(source = %self.name()))]
    pub async fn collect(&self, client: &Client) -> SourceOutcome {
        match self.fetch(client).await {
            Ok(articles) => {
                info!(count = articles.len(), "source fetched");
                SourceOutcome::Fetched {
                    source: self.name().to_string(),
                    articles,
                }
            }
            Err(e) => {
                warn!(error = %e, "source failed, continuing without it");
                SourceOutcome::Failed {
                    source: self.name().to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SourceOutcome
// ---------------------------------------------------------------------------

/// Result of invoking one source once.
#[derive(Debug, Clone)]
pub enum SourceOutcome {
    /// The source answered; `articles` may still be empty.
    Fetched {
        source: String,
        articles: Vec<Article>,
    },
    /// The source could not be read.
    Failed { source: String, reason: String },
}

impl SourceOutcome {
    /// Name of the source this outcome belongs to.
    pub fn source(&self) -> &str {
        match self {
            Self::Fetched { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    /// Articles produced, empty on failure.
    pub fn articles(&self) -> &[Article] {
        match self {
            Self::Fetched { articles, .. } => articles,
            Self::Failed { .. } => &[],
        }
    }

    /// Take the articles, empty on failure.
    pub fn into_articles(self) -> Vec<Article> {
        match self {
            Self::Fetched { articles, .. } => articles,
            Self::Failed { .. } => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotnews_shared::AppConfig;

    #[test]
    fn default_sources_compile() {
        let config = AppConfig::default();
        let sources: Vec<Source> = config
            .sources
            .iter()
            .map(|c| Source::from_config(c).expect("compile source"))
            .collect();

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].name(), "SBS News RSS");
        assert!(matches!(sources[2], Source::HotPage(_)));
    }

    #[test]
    fn with_limit_keeps_identity() {
        let config = AppConfig::default();
        let source = Source::from_config(&config.sources[2]).unwrap();
        let sample = source.with_limit(1);
        assert_eq!(sample.name(), source.name());
        assert_eq!(sample.limit(), 1);
        assert_eq!(source.limit(), 10);
    }

    #[test]
    fn outcome_accessors() {
        let ok = SourceOutcome::Fetched {
            source: "A".into(),
            articles: vec![Article::new("t", "https://a.example/1", "A")],
        };
        assert_eq!(ok.source(), "A");
        assert_eq!(ok.articles().len(), 1);
        assert!(!ok.is_failed());

        let failed = SourceOutcome::Failed {
            source: "B".into(),
            reason: "HTTP 500".into(),
        };
        assert!(failed.is_failed());
        assert!(failed.articles().is_empty());
        assert!(failed.into_articles().is_empty());
    }

    #[tokio::test]
    async fn collect_turns_errors_into_failed_outcomes() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = Source::from_config(&SourceConfig::Feed {
            url: format!("{}/rss.xml", server.uri()),
            label: "Broken RSS".into(),
            limit: 5,
        })
        .unwrap();

        let client = build_client(&Default::default()).unwrap();
        let outcome = source.collect(&client).await;

        match outcome {
            SourceOutcome::Failed { source, reason } => {
                assert_eq!(source, "Broken RSS");
                assert!(reason.contains("503"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
