//! Subcommands of the `examai` binary.

use super::*;

pub mod clean;
pub mod get;
pub mod init;
pub mod list;
pub mod remove;
pub mod scrape;
pub mod stats;

pub use clean::clean;
pub use get::{get, GetOptions};
pub use init::{init, InitOptions};
pub use list::{list, ListOptions};
pub use remove::{remove, RemoveOptions};
pub use scrape::{scrape, ScrapeArgs};
pub use stats::stats;

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file and create the local stores
  Init(InitOptions),

  /// Scrape the configured index page and store every paper found
  Scrape(ScrapeArgs),

  /// List stored papers
  List(ListOptions),

  /// Show a stored paper and its questions
  Get(GetOptions),

  /// Remove a stored paper
  Remove(RemoveOptions),

  /// Print totals for the stored papers
  Stats,

  /// Removes the database and mirror after confirmation
  Clean,
}
