//! Command line interface for the examai past paper scraper.
//!
//! This crate provides the `examai` binary on top of the `examai` library. It supports:
//! - Writing a configuration file and creating the local stores
//! - Scraping the configured index page, optionally filtered by year and paper
//! - Listing, showing and removing stored papers
//! - Printing a summary of the store and cleaning it up
//!
//! # Usage
//!
//! ```bash
//! # Write ~/.examai/config.toml and create the database
//! examai init
//!
//! # Scrape and store every 2023 Paper 1 document
//! examai scrape --year 2023 --paper "Paper 1"
//!
//! # Browse what was stored
//! examai list --type mark
//! examai get https://www.aqa.org.uk/past-papers/2023-paper-1-qp
//! examai stats
//!
//! # Remove the database and mirror
//! examai clean
//! ```
//!
//! Destructive operations ask for confirmation unless `--accept-defaults` is given. Logging goes
//! to stderr; raise its level with `-v` or set `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Args, Parser, Subcommand, ValueEnum};
use console::style;
use examai::{
  config::Config,
  error::ExamaiError,
  paper::{Outcome, PaperType, ProcessedPaper},
  scrape::{ScrapeOptions, Scraper},
  source::DocumentSource,
  storage::{PaperStorage, StorageSummary},
};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Scrape, store and browse A-Level Psychology past papers")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. Defaults to `~/.examai/config.toml`.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Reads the configuration every command except `init` depends on.
fn load_config(path: &Path) -> Result<Config> {
  if !path.exists() {
    return Err(ExamaidError::from(ExamaiError::Config(format!(
      "No configuration at {}. Run `examai init` first.",
      path.display()
    ))));
  }
  trace!("Using configuration at {}", path.display());
  Ok(Config::load(path)?)
}

/// Runs one subcommand, loading the configuration for every command but `init`.
async fn run<I: UserInteraction>(
  interaction: &I,
  config_path: &Path,
  command: Commands,
) -> Result<()> {
  match command {
    Commands::Init(options) => init(interaction, config_path, options).await,
    Commands::Scrape(options) => scrape(interaction, &load_config(config_path)?, options).await,
    Commands::List(options) => list(interaction, &load_config(config_path)?, options).await,
    Commands::Get(options) => get(interaction, &load_config(config_path)?, options).await,
    Commands::Remove(options) => remove(interaction, &load_config(config_path)?, options).await,
    Commands::Stats => stats(interaction, &load_config(config_path)?).await,
    Commands::Clean => clean(interaction, &load_config(config_path)?).await,
  }
}

/// Entry point for the examai CLI application
///
/// # Errors
///
/// Returns an [`ExamaidError`] when the configuration is missing or invalid, when the index page
/// cannot be scraped, when a storage write fails, or when user interaction fails.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let terminal = Terminal::new(cli.accept_defaults);
  let config_path = match cli.config {
    Some(path) => path,
    None => Config::default_path()?,
  };

  let result = run(&terminal, &config_path, cli.command).await;
  if let Err(e) = &result {
    terminal.reply(ResponseContent::Error(&e.to_string()))?;
  }
  result
}
