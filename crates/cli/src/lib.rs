pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dealfeed_core::config::{AppConfig, LoadOptions, LogFormat};
use tracing_subscriber::EnvFilter;

use crate::commands::rank::RankArgs;

#[derive(Debug, Parser)]
#[command(
    name = "dealfeed",
    about = "Dealfeed ranking CLI",
    long_about = "Rank storefront deal feeds against a user's genre preferences, inspect the \
                  genre taxonomy, and check the effective configuration.",
    after_help = "Examples:\n  dealfeed rank --items deals.json --profile prefs.json --page 1\n  \
                  dealfeed taxonomy --lang de\n  dealfeed config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a dealfeed.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank a candidate pool and print one page with its metadata")]
    Rank {
        #[arg(long, help = "JSON array of candidate items")]
        items: PathBuf,
        #[arg(long, help = "JSON user preference profile; omit for the no-preference feed")]
        profile: Option<PathBuf>,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
        #[arg(long, allow_negative_numbers = true, help = "Defaults to ranking.default_page_size")]
        page_size: Option<i64>,
        #[arg(long, help = "Explicit RNG seed; overrides --date and --identity")]
        seed: Option<u64>,
        #[arg(long, help = "Calendar day (YYYY-MM-DD) for the daily seed; defaults to today")]
        date: Option<NaiveDate>,
        #[arg(long, help = "User or device identifier for the daily seed")]
        identity: Option<String>,
    },
    #[command(about = "List canonical genres with labels for an onboarding picker")]
    Taxonomy {
        #[arg(long = "lang", help = "Label language, falls back to English")]
        language: Option<String>,
    },
    #[command(about = "Show the canonical genres each candidate item normalizes to")]
    Normalize {
        #[arg(long, help = "JSON array of candidate items")]
        items: PathBuf,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let logging_config = AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        ..LoadOptions::default()
    })
    .unwrap_or_default();
    init_logging(&logging_config);

    dispatch(cli)
}

pub fn dispatch(cli: Cli) -> ExitCode {
    let config_path = cli.config;
    let result = match cli.command {
        Command::Rank { items, profile, page, page_size, seed, date, identity } => {
            commands::rank::run(RankArgs {
                items,
                profile,
                page,
                page_size,
                seed,
                date,
                identity,
                config_path,
            })
        }
        Command::Taxonomy { language } => commands::taxonomy::run(language, config_path),
        Command::Normalize { items } => commands::normalize::run(&items, config_path),
        Command::Config => commands::config::run(config_path),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a clean JSON document.
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
