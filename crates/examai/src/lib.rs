//! Past exam paper scraping and local storage.
//!
//! `examai` downloads A-Level Psychology past papers and mark schemes from a public index page,
//! extracts question-level data from each document, and keeps the results in a local store:
//!
//! - Configuration-driven document sources (see [`source`])
//! - Rate-limited, retrying HTTP fetching (see [`fetch`] and [`rate_limit`])
//! - Sequential scraping with a per-instance result cache (see [`scrape`])
//! - A SQLite database with a flat JSON mirror used as a read cache (see [`storage`])
//!
//! # Getting Started
//!
//! ```no_run
//! use examai::{
//!   config::Config,
//!   scrape::{ScrapeOptions, Scraper},
//!   storage::PaperStorage,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::load(Config::default_path()?)?;
//!   let mut scraper = Scraper::from_config(&config)?;
//!   let storage = PaperStorage::open(&config.database_path, &config.mirror_path).await?;
//!
//!   let papers = scraper.scrape_past_papers(&ScrapeOptions::new().with_year("2023")).await?;
//!   for paper in &papers {
//!     storage.store_paper(paper).await?;
//!   }
//!
//!   let mark_schemes = storage.get_papers_by_type(examai::paper::PaperType::MarkScheme).await;
//!   println!("{} mark schemes stored", mark_schemes.len());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`paper`]: Paper links, questions and processed-paper records
//! - [`source`]: The [`DocumentSource`](source::DocumentSource) trait and its HTML implementation
//! - [`fetch`]: HTTP fetching with headers, pacing and retries
//! - [`rate_limit`]: Token bucket used for outbound pacing
//! - [`scrape`]: Index → links → papers pipeline
//! - [`database`], [`mirror`], [`storage`]: Persistence
//! - [`config`]: TOML configuration
//! - [`error`]: Error type shared by the whole crate

#![warn(missing_docs)]

use std::{
  collections::{BTreeMap, HashMap},
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod config;
pub mod database;
pub mod error;
pub mod fetch;
pub mod mirror;
pub mod paper;
pub mod rate_limit;
pub mod scrape;
pub mod source;
pub mod storage;

use crate::{
  config::{Config, ScraperConfig},
  error::*,
  fetch::Fetcher,
  paper::{PaperLink, PaperType, ProcessedPaper, Question, QuestionType},
};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use examai::prelude::*;
///
/// fn describe(source: &dyn DocumentSource) -> &str { source.base_url() }
/// ```
pub mod prelude {
  pub use crate::{
    error::{ExamaiError, Result},
    paper::{PaperType, ProcessedPaper, QuestionType},
    source::DocumentSource,
  };
}
