//! Application configuration for HotNews.
//!
//! User config lives at `~/.hotnews/hotnews.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HotNewsError, Result};
use crate::types::OutputFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "hotnews.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".hotnews";

/// Browser-like User-Agent; the hot page serves a stripped page to bots.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// ---------------------------------------------------------------------------
// Config structs (matching hotnews.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Request defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTTP fetch settings shared by every source.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Dedup and ranking policy constants.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Sources, invoked and concatenated in this order.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            fetch: FetchConfig::default(),
            scoring: ScoringConfig::default(),
            sources: default_sources(),
        }
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Number of articles returned when the caller does not say.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Output format used when the caller does not say.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            format: OutputFormat::Json,
        }
    }
}

fn default_count() -> usize {
    5
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Time budget for a single source, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of sources fetched at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_concurrency() -> usize {
    4
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

/// `[scoring]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Titles whose similarity ratio exceeds this are near-duplicates.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Added to a representative for each duplicate it absorbs.
    #[serde(default = "default_merge_bonus")]
    pub merge_bonus: f64,

    /// Substring marking a hot-page source.
    #[serde(default = "default_main_marker")]
    pub main_marker: String,

    /// Weight for sources containing `main_marker`.
    #[serde(default = "default_main_bonus")]
    pub main_bonus: f64,

    /// Substring marking a feed source.
    #[serde(default = "default_feed_marker")]
    pub feed_marker: String,

    /// Weight for sources containing `feed_marker`.
    #[serde(default = "default_feed_bonus")]
    pub feed_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            merge_bonus: default_merge_bonus(),
            main_marker: default_main_marker(),
            main_bonus: default_main_bonus(),
            feed_marker: default_feed_marker(),
            feed_bonus: default_feed_bonus(),
        }
    }
}

fn default_similarity_threshold() -> f64 {
    0.8
}
fn default_merge_bonus() -> f64 {
    5.0
}
fn default_main_marker() -> String {
    "Main".into()
}
fn default_main_bonus() -> f64 {
    10.0
}
fn default_feed_marker() -> String {
    "RSS".into()
}
fn default_feed_bonus() -> f64 {
    5.0
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// `[[sources]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A syndication feed (RSS, Atom, or JSON Feed).
    Feed {
        url: String,
        /// Provenance label stamped on every article.
        label: String,
        limit: usize,
    },
    /// A single HTML "hot news" page scraped with ordered strategies.
    HotPage {
        url: String,
        /// Fixed tag combined with per-item bylines into the source label.
        tag: String,
        limit: usize,
        /// Score every article from this page starts with.
        #[serde(default = "default_seed_score")]
        seed_score: f64,
        /// Tried in order; the first non-empty result wins.
        #[serde(default = "default_strategies")]
        strategies: Vec<ExtractionStrategy>,
    },
}

impl SourceConfig {
    /// Human-readable name used in logs and outcomes.
    pub fn name(&self) -> &str {
        match self {
            Self::Feed { label, .. } => label,
            Self::HotPage { tag, .. } => tag,
        }
    }

    /// Maximum number of articles this source contributes.
    pub fn limit(&self) -> usize {
        match self {
            Self::Feed { limit, .. } | Self::HotPage { limit, .. } => *limit,
        }
    }
}

/// `[[sources.strategies]]` entry for a hot page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Select item containers, then a title link and optional byline inside each.
    Selector {
        container: String,
        /// Candidate title-link selectors, first match wins.
        title: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        byline: Option<String>,
    },
    /// Scan every link on the page for article-shaped targets.
    LinkScan {
        /// Regex an `href` must match.
        href_pattern: String,
        /// Link text must be strictly longer than this many characters.
        #[serde(default = "default_min_title_chars")]
        min_title_chars: usize,
    },
}

fn default_seed_score() -> f64 {
    15.0
}
fn default_min_title_chars() -> usize {
    10
}

fn default_strategies() -> Vec<ExtractionStrategy> {
    let selector = |container: &str| ExtractionStrategy::Selector {
        container: container.into(),
        title: vec!["a.sa_text_title".into(), "a".into()],
        byline: Some(".sa_text_press".into()),
    };

    vec![
        selector("div.sa_text"),
        selector(".cluster_text"),
        selector(".nmain_news_list_group"),
        ExtractionStrategy::LinkScan {
            href_pattern: "/mnews/article/".into(),
            min_title_chars: default_min_title_chars(),
        },
    ]
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::Feed {
            url: "https://news.sbs.co.kr/news/rss.do?section=01".into(),
            label: "SBS News RSS".into(),
            limit: 5,
        },
        SourceConfig::Feed {
            url: "https://www.yna.co.kr/rss/politics.xml".into(),
            label: "Yonhap RSS".into(),
            limit: 5,
        },
        SourceConfig::HotPage {
            url: "https://news.naver.com/main/main.naver?mode=LSD&mid=shm&sid1=100".into(),
            tag: "Naver News Main".into(),
            limit: 10,
            seed_score: default_seed_score(),
            strategies: default_strategies(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.concurrency == 0 {
            return Err(HotNewsError::config("fetch.concurrency must be at least 1"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(HotNewsError::config("fetch.timeout_secs must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.scoring.similarity_threshold) {
            return Err(HotNewsError::config(format!(
                "scoring.similarity_threshold {} is outside 0.0..=1.0",
                self.scoring.similarity_threshold
            )));
        }
        let bonuses = [
            self.scoring.merge_bonus,
            self.scoring.main_bonus,
            self.scoring.feed_bonus,
        ];
        if bonuses.iter().any(|b| !b.is_finite() || *b < 0.0) {
            return Err(HotNewsError::config(
                "scoring bonuses must be finite and not negative",
            ));
        }
        for source in &self.sources {
            if source.limit() == 0 {
                return Err(HotNewsError::config(format!(
                    "source '{}' has limit 0",
                    source.name()
                )));
            }
            if let SourceConfig::HotPage {
                strategies,
                seed_score,
                ..
            } = source
            {
                if strategies.is_empty() {
                    return Err(HotNewsError::config(format!(
                        "hot page '{}' has no extraction strategies",
                        source.name()
                    )));
                }
                if !seed_score.is_finite() || *seed_score < 0.0 {
                    return Err(HotNewsError::config(format!(
                        "hot page '{}' has a negative or non-finite seed score",
                        source.name()
                    )));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.hotnews/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| HotNewsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.hotnews/hotnews.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HotNewsError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        HotNewsError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_dir()?.join(CONFIG_FILE_NAME);
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| HotNewsError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| HotNewsError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| HotNewsError::io(path, e))?;
    tracing::info!(?path, "created default config file");
    Ok(())
}
