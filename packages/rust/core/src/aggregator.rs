//! Concurrent source fan-out.
//!
//! Every source runs as its own task, bounded by a semaphore and a per-source
//! timeout. All tasks are joined before anything is concatenated, and the
//! result follows configuration order no matter which source finished first.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use hotnews_shared::{Article, FetchConfig, HotNewsError};
use hotnews_sources::{Source, SourceOutcome};

use crate::pipeline::ProgressReporter;

/// Outcomes of one fan-out, in source order.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub outcomes: Vec<SourceOutcome>,
}

impl Aggregation {
    /// Number of articles across all successful sources.
    pub fn total(&self) -> usize {
        self.outcomes.iter().map(|o| o.articles().len()).sum()
    }

    /// Number of sources that failed or timed out.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Concatenate successful articles in source order.
    pub fn into_articles(self) -> Vec<Article> {
        self.outcomes
            .into_iter()
            .flat_map(SourceOutcome::into_articles)
            .collect()
    }
}

/// Run every source concurrently and collect one outcome per source.
///
/// Never fails: errors, timeouts, and panicked tasks all become
/// [`SourceOutcome::Failed`].
#[instrument(skip_all, fields(sources = sources.len(), concurrency = fetch.concurrency))]
pub async fn gather(
    sources: &[Source],
    client: &Client,
    fetch: &FetchConfig,
    progress: &dyn ProgressReporter,
) -> Aggregation {
    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(fetch.concurrency.max(1)));
    let budget = Duration::from_secs(fetch.timeout_secs);
    let secs = fetch.timeout_secs;

    let mut handles = Vec::with_capacity(sources.len());
    for source in sources {
        let source = source.clone();
        let client = client.clone();
        let sem = semaphore.clone();
        let name = source.name().to_string();

        let handle = tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return SourceOutcome::Failed {
                    source: source.name().to_string(),
                    reason: "fetch pool closed".into(),
                };
            };

            match tokio::time::timeout(budget, source.collect(&client)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let err = HotNewsError::Timeout {
                        source_name: source.name().to_string(),
                        secs,
                    };
                    warn!(source = %source.name(), error = %err, "source timed out");
                    SourceOutcome::Failed {
                        source: source.name().to_string(),
                        reason: err.to_string(),
                    }
                }
            }
        });
        handles.push((name, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(source = %name, error = %e, "source task aborted");
                SourceOutcome::Failed {
                    source: name,
                    reason: format!("task failed: {e}"),
                }
            }
        };
        progress.source_done(&outcome);
        outcomes.push(outcome);
    }

    let aggregation = Aggregation { outcomes };
    info!(
        articles = aggregation.total(),
        failed = aggregation.failed(),
        duration_ms = start.elapsed().as_millis() as u64,
        "sources gathered"
    );
    aggregation
}
