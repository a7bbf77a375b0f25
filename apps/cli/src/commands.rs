//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use hotnews_core::{NewsService, ProgressReporter, TopNews, TopNewsRequest};
use hotnews_shared::{
    AppConfig, OutputFormat, init_config, init_config_at, load_config, load_config_from,
};
use hotnews_sources::SourceOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// HotNews: today's top headlines, deduplicated and ranked.
#[derive(Parser)]
#[command(
    name = "hotnews",
    version,
    about = "Collect headlines from news feeds and hot pages, merge duplicates, and print the top N.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.hotnews/hotnews.toml.
    #[arg(long, global = true, env = "HOTNEWS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch, rank, and print the top news.
    Top {
        /// Number of articles (1-20). Defaults to the configured count.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Output format: json or markdown. Defaults to the configured format.
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Fetch one raw sample from the first feed and the first hot page.
    Probe,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "hotnews=info",
        1 => "hotnews=debug",
        _ => "hotnews=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Top { count, format } => cmd_top(config_path, count, format).await,
        Command::Probe => cmd_probe(config_path).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config from `--config` when given, else the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_top(
    config_path: Option<&Path>,
    count: Option<usize>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let request = TopNewsRequest::new(
        count.unwrap_or(config.defaults.count),
        format.unwrap_or(config.defaults.format),
    )?;
    let service = NewsService::new(config)?;

    info!(
        count = request.count(),
        format = %request.format(),
        sources = service.sources().len(),
        "collecting top news"
    );

    let reporter = CliProgress::new();
    let result = service.top_news(&request, &reporter).await;
    reporter.finish();

    match result? {
        TopNews::Document { markdown } => print!("{markdown}"),
        articles @ TopNews::Articles(_) => {
            println!("{}", serde_json::to_string_pretty(&articles)?)
        }
    }
    Ok(())
}

async fn cmd_probe(config_path: Option<&Path>) -> Result<()> {
    let service = NewsService::new(resolve_config(config_path)?)?;

    let reporter = CliProgress::new();
    let report = service.probe(&reporter).await;
    reporter.finish();

    println!("{}", serde_json::to_string_pretty(&report?)?);
    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => {
            init_config_at(path)?;
            path.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn source_done(&self, outcome: &SourceOutcome) {
        let line = match outcome {
            SourceOutcome::Fetched { source, articles } => {
                format!("{source}: {} articles", articles.len())
            }
            SourceOutcome::Failed { source, reason } => format!("{source}: failed ({reason})"),
        };
        self.spinner.set_message(line);
    }
}
