//! Hot-page adapter.
//!
//! Scrapes a single "most read" HTML page. Page layouts drift, so extraction
//! is an ordered list of [`Strategy`] values: each one either yields items or
//! comes back empty, and the first non-empty result is used. Every article
//! from this page starts with the configured seed score.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use hotnews_shared::{Article, ExtractionStrategy, HotNewsError, Result};

use crate::http::fetch_bytes;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A compiled extraction strategy.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Item containers with a title link and optional byline inside each.
    Selector {
        container: Selector,
        titles: Vec<Selector>,
        byline: Option<Selector>,
    },
    /// Every link on the page whose target looks like an article.
    LinkScan {
        links: Selector,
        href_pattern: Regex,
        min_title_chars: usize,
    },
}

/// One headline found on the page, before it becomes an [`Article`].
#[derive(Debug, Clone, PartialEq)]
struct HotItem {
    title: String,
    url: String,
    byline: Option<String>,
}

impl Strategy {
    /// Compile a strategy from config, rejecting bad selectors or patterns.
    pub fn compile(config: &ExtractionStrategy) -> Result<Self> {
        match config {
            ExtractionStrategy::Selector {
                container,
                title,
                byline,
            } => {
                if title.is_empty() {
                    return Err(HotNewsError::config(format!(
                        "selector strategy '{container}' has no title selectors"
                    )));
                }
                Ok(Self::Selector {
                    container: parse_selector(container)?,
                    titles: title
                        .iter()
                        .map(|s| parse_selector(s))
                        .collect::<Result<_>>()?,
                    byline: byline.as_deref().map(parse_selector).transpose()?,
                })
            }
            ExtractionStrategy::LinkScan {
                href_pattern,
                min_title_chars,
            } => Ok(Self::LinkScan {
                links: parse_selector("a[href]")?,
                href_pattern: Regex::new(href_pattern).map_err(|e| {
                    HotNewsError::config(format!("invalid href pattern '{href_pattern}': {e}"))
                })?,
                min_title_chars: *min_title_chars,
            }),
        }
    }

    /// Short name for tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Selector { .. } => "selector",
            Self::LinkScan { .. } => "link_scan",
        }
    }

    fn extract(&self, doc: &Html, base: &Url, limit: usize) -> Vec<HotItem> {
        match self {
            Self::Selector {
                container,
                titles,
                byline,
            } => doc
                .select(container)
                .take(limit)
                .filter_map(|item| {
                    let link = titles.iter().find_map(|sel| item.select(sel).next())?;
                    let title = element_text(&link);
                    let url = resolve(base, link.value().attr("href")?)?;
                    if title.is_empty() {
                        return None;
                    }
                    let byline = byline
                        .as_ref()
                        .and_then(|sel| item.select(sel).next())
                        .map(|el| element_text(&el))
                        .filter(|b| !b.is_empty());
                    Some(HotItem { title, url, byline })
                })
                .collect(),

            Self::LinkScan {
                links,
                href_pattern,
                min_title_chars,
            } => {
                let mut seen = HashSet::new();
                doc.select(links)
                    .filter_map(|a| {
                        let href = a.value().attr("href")?;
                        if !href_pattern.is_match(href) {
                            return None;
                        }
                        let title = element_text(&a);
                        if title.chars().count() <= *min_title_chars {
                            return None;
                        }
                        let url = resolve(base, href)?;
                        Some(HotItem {
                            title,
                            url,
                            byline: None,
                        })
                    })
                    .filter(|item| seen.insert(item.url.clone()))
                    .take(limit)
                    .collect()
            }
        }
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| HotNewsError::config(format!("invalid CSS selector '{css}': {e}")))
}

/// Trimmed text content with internal whitespace collapsed.
fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve an `href` against the page URL, skipping non-navigational links.
fn resolve(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    base.join(href).ok().map(String::from)
}

// ---------------------------------------------------------------------------
// HotPageSource
// ---------------------------------------------------------------------------

/// A hot page plus the strategies used to read it.
#[derive(Debug, Clone)]
pub struct HotPageSource {
    url: Url,
    tag: String,
    limit: usize,
    seed_score: f64,
    strategies: Arc<[Strategy]>,
}

impl HotPageSource {
    pub fn new(
        url: &str,
        tag: &str,
        limit: usize,
        seed_score: f64,
        strategies: &[ExtractionStrategy],
    ) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| HotNewsError::config(format!("hot page '{tag}' has invalid URL '{url}': {e}")))?;
        if limit == 0 {
            return Err(HotNewsError::config(format!("hot page '{tag}' has limit 0")));
        }
        if strategies.is_empty() {
            return Err(HotNewsError::config(format!(
                "hot page '{tag}' has no extraction strategies"
            )));
        }

        let strategies = strategies
            .iter()
            .map(Strategy::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            url,
            tag: tag.to_string(),
            limit,
            seed_score,
            strategies: strategies.into(),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn url(&self) -> &Url {
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

    /// Fetch the page and extract its headlines.
    #[instrument(skip_all, fields(url = %self.url, limit = self.limit))]
    pub async fn fetch(&self, client: &Client) -> Result<Vec<Article>> {
        let body = fetch_bytes(client, self.url.as_str()).await?;
        let html = String::from_utf8_lossy(&body);
        Ok(self.extract(&html))
    }

    /// Run the strategies in order against a page and build articles from
    /// the first one that yields a usable item. Containers without a title
    /// link count as a miss.
    pub fn extract(&self, html: &str) -> Vec<Article> {
        let doc = Html::parse_document(html);

        for strategy in self.strategies.iter() {
            let items = strategy.extract(&doc, &self.url, self.limit);
            if items.is_empty() {
                debug!(strategy = strategy.name(), "strategy found nothing");
                continue;
            }

            debug!(strategy = strategy.name(), count = items.len(), "strategy matched");
            let captured_at = Utc::now();
            return items
                .into_iter()
                .map(|item| {
                    let source = match &item.byline {
                        Some(byline) => format!("{} ({byline})", self.tag),
                        None => self.tag.clone(),
                    };
                    Article::new(item.title, item.url, source)
                        .published(captured_at)
                        .with_score(self.seed_score)
                })
                .collect();
        }

        debug!("no strategy matched the page");
        Vec::new()
    }
}
