//! Source weighting, ranking, and top-N selection.

use tracing::{debug, instrument};

use hotnews_shared::{Article, ScoringConfig};

/// Weight added for an article's provenance label.
///
/// A label containing the hot-page marker earns the larger bonus; otherwise a
/// label containing the feed marker earns the smaller one. Matching is a
/// case-sensitive substring test, so "RSS Main" counts as a hot page.
pub fn source_weight(source: &str, scoring: &ScoringConfig) -> f64 {
    if source.contains(scoring.main_marker.as_str()) {
        scoring.main_bonus
    } else if source.contains(scoring.feed_marker.as_str()) {
        scoring.feed_bonus
    } else {
        0.0
    }
}

/// Add source weights and sort by score, highest first.
///
/// The sort is stable: equal scores keep their input order.
#[instrument(skip_all, fields(count = articles.len()))]
pub fn score_and_rank(mut articles: Vec<Article>, scoring: &ScoringConfig) -> Vec<Article> {
    for article in &mut articles {
        article.hotness_score += source_weight(&article.source, scoring);
    }
    articles.sort_by(|a, b| b.hotness_score.total_cmp(&a.hotness_score));

    if let Some(top) = articles.first() {
        debug!(top_score = top.hotness_score, top_title = %top.title, "ranked");
    }
    articles
}

/// The first `n` ranked articles, or all of them when fewer exist.
pub fn top_n(mut ranked: Vec<Article>, n: usize) -> Vec<Article> {
    ranked.truncate(n);
    ranked
}
