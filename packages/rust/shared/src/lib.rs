//! Shared types, error model, and configuration for HotNews.
//!
//! This crate is the foundation depended on by all other HotNews crates.
//! It provides:
//! - [`HotNewsError`]: the unified error type
//! - Domain types ([`Article`], [`OutputFormat`])
//! - Configuration ([`AppConfig`], [`SourceConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ExtractionStrategy, FetchConfig, ScoringConfig, SourceConfig,
    config_dir, config_file_path, init_config, init_config_at, load_config, load_config_from,
};
pub use error::{HotNewsError, Result};
pub use types::{Article, MAX_TOP_N, MIN_TOP_N, OutputFormat};
