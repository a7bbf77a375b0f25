//! Near-duplicate merging.
//!
//! Articles are visited in input order. Each one is compared against the
//! already-kept representatives, in the order they were kept; the first whose
//! title similarity strictly exceeds the threshold absorbs it and gains the
//! merge bonus. Otherwise the article becomes a new representative. Merging
//! is not transitive: a kept title is never re-checked against later ones.

use tracing::{debug, instrument};

use hotnews_shared::{Article, ScoringConfig};

use crate::similarity::ratio;

/// Collapse near-duplicate titles, keeping the first of each group.
#[instrument(skip_all, fields(input = articles.len()))]
pub fn deduplicate(articles: Vec<Article>, scoring: &ScoringConfig) -> Vec<Article> {
    let mut kept: Vec<Article> = Vec::with_capacity(articles.len());
    let mut merged = 0usize;

    for candidate in articles {
        let representative = kept
            .iter_mut()
            .find(|k| ratio(&candidate.title, &k.title) > scoring.similarity_threshold);

        match representative {
            Some(rep) => {
                rep.hotness_score += scoring.merge_bonus;
                merged += 1;
                debug!(kept = %rep.title, dropped = %candidate.title, "merged near-duplicate");
            }
            None => kept.push(candidate),
        }
    }

    debug!(kept = kept.len(), merged, "deduplication done");
    kept
}
