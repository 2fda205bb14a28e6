//! Error types for the examai command line tool.

use thiserror::Error;

use super::*;

/// Error type alias used for the examaid crate.
pub type Result<T> = core::result::Result<T, ExamaidError>;

/// Errors raised while running a CLI command.
#[derive(Error, Debug)]
pub enum ExamaidError {
  /// Scraping, storage or configuration failed in the library
  #[error(transparent)]
  Examai(#[from] ExamaiError),

  /// A prompt could not be shown or answered
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// A file could not be removed or written
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A path produced an invalid glob pattern
  #[error(transparent)]
  Glob(#[from] glob::PatternError),
}
