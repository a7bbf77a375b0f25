//! End-to-end top-news pipeline.
//!
//! Gather → deduplicate → score and rank → top-N → present. A
//! [`NewsService`] holds only read-only configuration and a shared HTTP
//! client; each request builds and drops its own article collection.

use std::time::Instant;

use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};

use hotnews_shared::{
    AppConfig, Article, HotNewsError, MAX_TOP_N, MIN_TOP_N, OutputFormat, Result, ScoringConfig,
};
use hotnews_sources::{Source, SourceOutcome, build_client};

use crate::aggregator::{self, Aggregation};
use crate::dedup::deduplicate;
use crate::presenter::{self, TopNews};
use crate::scoring::{score_and_rank, top_n};

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called as each source's outcome is collected, in source order.
    fn source_done(&self, outcome: &SourceOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn source_done(&self, _outcome: &SourceOutcome) {}
}

// ---------------------------------------------------------------------------
// Requests and reports
// ---------------------------------------------------------------------------

/// A validated top-news request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopNewsRequest {
    count: usize,
    format: OutputFormat,
}

impl TopNewsRequest {
    /// Validate the requested count against `[1, 20]`.
    pub fn new(count: usize, format: OutputFormat) -> Result<Self> {
        if !(MIN_TOP_N..=MAX_TOP_N).contains(&count) {
            return Err(HotNewsError::validation(format!(
                "count must be between {MIN_TOP_N} and {MAX_TOP_N}, got {count}"
            )));
        }
        Ok(Self { count, format })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Default for TopNewsRequest {
    fn default() -> Self {
        Self {
            count: 5,
            format: OutputFormat::Json,
        }
    }
}

/// Raw samples from the first feed and the first hot page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeReport {
    pub feed_sample: Vec<Article>,
    pub hot_sample: Vec<Article>,
    pub total_fetched: usize,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Deduplicate, score, rank, and cut a gathered batch down to `n`.
pub fn select_top(articles: Vec<Article>, n: usize, scoring: &ScoringConfig) -> Vec<Article> {
    let unique = deduplicate(articles, scoring);
    let ranked = score_and_rank(unique, scoring);
    top_n(ranked, n)
}

/// Configured sources plus the client used to reach them.
#[derive(Debug, Clone)]
pub struct NewsService {
    config: AppConfig,
    sources: Vec<Source>,
    client: Client,
}

impl NewsService {
    /// Validate the config, compile every source, and build the HTTP client.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let sources = config
            .sources
            .iter()
            .map(Source::from_config)
            .collect::<Result<Vec<_>>>()?;
        let client = build_client(&config.fetch)?;

        Ok(Self {
            config,
            sources,
            client,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Build a request from the configured defaults.
    pub fn default_request(&self) -> Result<TopNewsRequest> {
        TopNewsRequest::new(self.config.defaults.count, self.config.defaults.format)
    }

    /// Gather from every source without further processing.
    pub async fn gather(&self, progress: &dyn ProgressReporter) -> Aggregation {
        aggregator::gather(&self.sources, &self.client, &self.config.fetch, progress).await
    }

    /// Run the full pipeline for one request.
    ///
    /// Fails with [`HotNewsError::NoArticles`] only when no source produced
    /// anything; partial source failures are logged and skipped.
    #[instrument(skip_all, fields(count = request.count(), format = %request.format()))]
    pub async fn top_news(
        &self,
        request: &TopNewsRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<TopNews> {
        let start = Instant::now();

        progress.phase("Fetching sources");
        let gathered = self.gather(progress).await.into_articles();
        if gathered.is_empty() {
            return Err(HotNewsError::NoArticles);
        }
        let fetched = gathered.len();

        progress.phase("Ranking articles");
        let selected = select_top(gathered, request.count(), &self.config.scoring);

        info!(
            fetched,
            selected = selected.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "top news ready"
        );
        Ok(presenter::render(selected, request.format()))
    }

    /// Fetch one article from the first feed and one from the first hot page.
    ///
    /// A missing source kind, or a failing one, leaves its sample empty.
    #[instrument(skip_all)]
    pub async fn probe(&self, progress: &dyn ProgressReporter) -> Result<ProbeReport> {
        let feed = self
            .sources
            .iter()
            .find(|s| matches!(s, Source::Feed(_)))
            .map(|s| s.with_limit(1));
        let hot = self
            .sources
            .iter()
            .find(|s| matches!(s, Source::HotPage(_)))
            .map(|s| s.with_limit(1));

        let picked: Vec<Source> = feed.iter().chain(hot.iter()).cloned().collect();
        progress.phase("Probing sources");
        let mut outcomes =
            aggregator::gather(&picked, &self.client, &self.config.fetch, progress)
                .await
                .outcomes
                .into_iter();

        let feed_sample = match feed {
            Some(_) => outcomes.next().map(SourceOutcome::into_articles).unwrap_or_default(),
            None => Vec::new(),
        };
        let hot_sample = match hot {
            Some(_) => outcomes.next().map(SourceOutcome::into_articles).unwrap_or_default(),
            None => Vec::new(),
        };

        let total_fetched = feed_sample.len() + hot_sample.len();
        info!(total_fetched, "probe finished");
        Ok(ProbeReport {
            feed_sample,
            hot_sample,
            total_fetched,
        })
    }
}
