//! Core pipeline orchestration and ranking logic for HotNews.
//!
//! This crate ties the source adapters together into the top-news workflow:
//! concurrent gathering, near-duplicate merging, source weighting, top-N
//! selection, and presentation as JSON records or Markdown.

pub mod aggregator;
pub mod dedup;
pub mod pipeline;
pub mod presenter;
pub mod scoring;
pub mod similarity;

pub use aggregator::Aggregation;
pub use pipeline::{
    NewsService, ProbeReport, ProgressReporter, SilentProgress, TopNewsRequest, select_top,
};
pub use presenter::TopNews;
