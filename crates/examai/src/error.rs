//! Error types for the examai library.
//!
//! A single error enum covers every failure mode of the crate:
//! - Network and HTTP status errors while fetching pages
//! - HTML and configuration problems (selectors, patterns, URLs)
//! - Database and mirror storage operations
//! - Configuration file handling
//!
//! # Examples
//!
//! ```no_run
//! use examai::{config::Config, error::ExamaiError, fetch::Fetcher};
//!
//! # async fn example() -> Result<(), ExamaiError> {
//! let fetcher = Fetcher::new(&Config::default().scraper)?;
//! match fetcher.fetch("https://example.com/past-papers").await {
//!   Err(ExamaiError::Status { status, .. }) => println!("Server answered {status}"),
//!   Err(ExamaiError::Network(e)) => println!("Network error: {e}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(html) => println!("Fetched {} bytes", html.len()),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Error type alias used for the [`examai`](crate) crate.
pub type Result<T> = core::result::Result<T, ExamaiError>;

/// Errors that can occur while scraping, parsing or storing papers.
#[derive(Error, Debug)]
pub enum ExamaiError {
  /// A network request failed before a response was received.
  ///
  /// This covers DNS failures, refused connections, TLS errors and invalid request headers.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The server answered with a non-success status code.
  #[error("HTTP error {status} while fetching {url}")]
  Status {
    /// The URL that was requested
    url:    String,
    /// The numeric HTTP status code
    status: u16,
  },

  /// A link or base URL could not be parsed or resolved.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// A document-type label did not name a question paper or a mark scheme.
  #[error("Invalid paper type \"{0}\", expected \"Question Paper\" or \"Mark Scheme\"")]
  InvalidPaperType(String),

  /// A CSS selector in the source configuration could not be parsed.
  #[error("Invalid CSS selector: {0}")]
  Selector(String),

  /// A regular expression in the source configuration could not be compiled.
  #[error(transparent)]
  Regex(#[from] regex::Error),

  /// A SQLite operation failed.
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  ///
  /// This wraps errors from the `tokio-rusqlite` crate, including failures of the
  /// background connection thread.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// A file system operation failed.
  ///
  /// This occurs when:
  /// - Creating the database or mirror directories fails
  /// - Reading or writing the mirror or the configuration file fails
  /// - Permission errors occur
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A record could not be serialized to or deserialized from JSON.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration could not be written as TOML.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// Any other configuration problem.
  #[error("{0}")]
  Config(String),
}
