//! Persistence facade over the SQLite [`Database`] and the JSON [`Mirror`].
//!
//! The database is the source of truth and the mirror is a read cache in front of it:
//!
//! - Writes commit to the database first. A database error is returned and the mirror is left
//!   alone. If the mirror then cannot be updated, it is discarded so it can never serve a stale
//!   record; only when it can be neither updated nor discarded does the write fail.
//! - [`PaperStorage::get_paper`] tries the mirror, then the database.
//! - Listing and filtering always scan the database.
//! - Read errors are logged and turn into `None` or an empty list.
//!
//! # Examples
//!
//! ```no_run
//! # use examai::{paper::PaperType, storage::PaperStorage};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = PaperStorage::open("examai.db", "papers.json").await?;
//!
//! for paper in storage.get_papers_by_year("2023").await {
//!   println!("{} ({})", paper.link.paper, paper.link.kind);
//! }
//!
//! let summary = storage.summary().await;
//! println!("{} records, {} failed", summary.total, summary.failed);
//! # Ok(())
//! # }
//! ```

use tokio::sync::Mutex;

use crate::{database::Database, mirror::Mirror};

use super::*;

/// Counts over every stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageSummary {
  /// Number of stored records
  pub total:           usize,
  /// Records per examination year
  pub by_year:         BTreeMap<String, usize>,
  /// Records whose type is [`PaperType::QuestionPaper`]
  pub question_papers: usize,
  /// Records whose type is [`PaperType::MarkScheme`]
  pub mark_schemes:    usize,
  /// Records that carry a processing error
  pub failed:          usize,
}

impl StorageSummary {
  /// Tallies `papers`.
  pub fn from_papers(papers: &[ProcessedPaper]) -> Self {
    let mut summary = Self { total: papers.len(), ..Self::default() };
    for paper in papers {
      *summary.by_year.entry(paper.link.year.clone()).or_default() += 1;
      match paper.link.kind {
        PaperType::QuestionPaper => summary.question_papers += 1,
        PaperType::MarkScheme => summary.mark_schemes += 1,
      }
      if paper.is_failed() {
        summary.failed += 1;
      }
    }
    summary
  }
}

/// Durable store for processed papers.
pub struct PaperStorage {
  database:     Database,
  mirror:       Mirror,
  /// Serializes read-modify-write cycles on the mirror file
  mirror_guard: Mutex<()>,
}

impl PaperStorage {
  /// Opens (creating if needed) the database at `database_path` and the mirror at `mirror_path`.
  pub async fn open(
    database_path: impl AsRef<Path>,
    mirror_path: impl Into<PathBuf>,
  ) -> Result<Self> {
    Ok(Self {
      database:     Database::open(database_path).await?,
      mirror:       Mirror::new(mirror_path),
      mirror_guard: Mutex::new(()),
    })
  }

  /// Opens the stores named by `config`.
  pub async fn from_config(config: &Config) -> Result<Self> {
    Self::open(&config.database_path, config.mirror_path.clone()).await
  }

  /// The mirror in front of the database.
  pub fn mirror(&self) -> &Mirror { &self.mirror }

  /// Stores `paper`, replacing any record with the same URL.
  ///
  /// # Errors
  ///
  /// Returns an error if the database write fails, or if the mirror could not be updated and
  /// could not be discarded either.
  pub async fn store_paper(&self, paper: &ProcessedPaper) -> Result<()> {
    self.database.put_paper(paper).await?;

    let _guard = self.mirror_guard.lock().await;
    if let Err(e) = self.mirror.insert(paper).await {
      warn!("Failed to mirror {}: {}", paper.url(), e);
      self.discard_mirror().await?;
    }
    debug!("Stored {}", paper.url());
    Ok(())
  }

  /// Looks up one record by URL, trying the mirror before the database.
  pub async fn get_paper(&self, url: &str) -> Option<ProcessedPaper> {
    match self.mirror.get(url).await {
      Ok(Some(paper)) => return Some(paper),
      Ok(None) => {},
      Err(e) => error!("Error reading mirror {}: {}", self.mirror.path().display(), e),
    }

    match self.database.get_paper(url).await {
      Ok(paper) => paper,
      Err(e) => {
        error!("Error retrieving paper {}: {}", url, e);
        None
      },
    }
  }

  /// Every stored record, ordered by URL.
  pub async fn get_all_papers(&self) -> Vec<ProcessedPaper> {
    self.database.all_papers().await.unwrap_or_else(|e| {
      error!("Error retrieving papers: {}", e);
      Vec::new()
    })
  }

  /// Records whose year is exactly `year`.
  pub async fn get_papers_by_year(&self, year: &str) -> Vec<ProcessedPaper> {
    self.filtered(|paper| paper.link.year == year).await
  }

  /// Records of the given document type.
  pub async fn get_papers_by_type(&self, kind: PaperType) -> Vec<ProcessedPaper> {
    self.filtered(|paper| paper.link.kind == kind).await
  }

  /// Removes the record for `url` from both stores, returning whether the database held one.
  /// Removing an absent record is not an error.
  pub async fn delete_paper(&self, url: &str) -> Result<bool> {
    let existed = self.database.delete_paper(url).await?;

    let _guard = self.mirror_guard.lock().await;
    if let Err(e) = self.mirror.remove(url).await {
      warn!("Failed to remove {} from mirror: {}", url, e);
      self.discard_mirror().await?;
    }
    Ok(existed)
  }

  /// Totals by year, by document type and of failed records.
  pub async fn summary(&self) -> StorageSummary {
    StorageSummary::from_papers(&self.get_all_papers().await)
  }

  async fn filtered(&self, predicate: impl Fn(&ProcessedPaper) -> bool) -> Vec<ProcessedPaper> {
    self.get_all_papers().await.into_iter().filter(|paper| predicate(paper)).collect()
  }

  async fn discard_mirror(&self) -> Result<()> {
    self.mirror.discard().await.map_err(|e| {
      error!("Mirror {} is stale and could not be discarded: {}", self.mirror.path().display(), e);
      e
    })
  }
}
