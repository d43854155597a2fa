// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use subsieve::app_config::{self, Config};
use subsieve::{HttpFetcher, PageFetcher, ReconciliationPipeline};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the catalog, keeping only titles that have subtitles
    Search {
        /// Search keyword
        #[arg(value_name = "KEYWORD")]
        keyword: String,
    },

    /// List the episodes of a title that have subtitles
    Episodes {
        /// Title page URL, as returned by `search`
        #[arg(value_name = "TITLE_URL")]
        title_url: String,
    },

    /// Resolve the stream and subtitle URL of an episode
    Stream {
        /// Watch page URL, as returned by `episodes`
        #[arg(value_name = "EPISODE_URL")]
        episode_url: String,
    },

    /// Show description, aliases, and airing season of a title
    Details {
        /// Title page URL, as returned by `search`
        #[arg(value_name = "TITLE_URL")]
        title_url: String,
    },

    /// Generate shell completions for subsieve
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subsieve - streaming catalog search filtered by subtitle availability
#[derive(Parser, Debug)]
#[command(name = "subsieve")]
#[command(version)]
#[command(about = "Find anime titles and episodes that have subtitles")]
#[command(long_about = "subsieve searches a streaming catalog and cross-references every result
against a community subtitle index. Only titles and episodes with subtitles are reported.

EXAMPLES:
    subsieve search frieren                                  # Titles with subtitles
    subsieve episodes https://www.animeparadise.moe/anime/x  # Episodes with subtitles
    subsieve stream 'https://www.animeparadise.moe/watch/y?origin=z'
    subsieve details https://www.animeparadise.moe/anime/x
    subsieve completions bash > subsieve.bash                # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The subtitle index API key can also be given
    with --api-key or the SUBSIEVE_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Subtitle index API key
    #[arg(long, env = "SUBSIEVE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Only keep titles whose identifier is known to the subtitle index
    #[arg(long, global = true)]
    no_title_fallback: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subsieve", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::from_config(&config.http));
    let pipeline = ReconciliationPipeline::from_config(fetcher, &config);
    debug!("Catalog at {}", pipeline.urls().base_url());

    match cli.command {
        Commands::Search { keyword } => print_json(&pipeline.search(&keyword).await),
        Commands::Episodes { title_url } => print_json(&pipeline.list_episodes(&title_url).await),
        Commands::Stream { episode_url } => print_json(&pipeline.resolve_stream(&episode_url).await),
        Commands::Details { title_url } => print_json(&pipeline.details(&title_url).await),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load or create the configuration, then apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config
            .save(config_path)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(api_key) = &cli.api_key {
        config.subtitle_index.api_key = api_key.clone();
    }

    if cli.no_title_fallback {
        config.matching.title_fallback = false;
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
