//! Local SQLite store for processed papers.
//!
//! Records live in a single `papers` table keyed by `url`. The full record is kept as JSON in
//! the `record` column next to a few plain columns for inspection with external tools; lookups
//! other than by `url` scan the whole table.
//!
//! The schema is created automatically when a database is opened.
//!
//! # Examples
//!
//! ```no_run
//! # use examai::{database::Database, paper::{PaperLink, PaperType, ProcessedPaper}};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open("papers.db").await?;
//!
//! let link = PaperLink::new("2023", "Paper 1", PaperType::MarkScheme, "https://example.com/p1-ms");
//! db.put_paper(&ProcessedPaper::processed(link, Vec::new())).await?;
//!
//! for paper in db.all_papers().await? {
//!   println!("{} {} {}", paper.link.year, paper.link.paper, paper.link.kind);
//! }
//! # Ok(())
//! # }
//! ```

use rusqlite::params;
use tokio_rusqlite::Connection;

use super::*;

/// Handle for the paper database.
///
/// Wraps an async SQLite connection; all statements run on the connection's background thread.
pub struct Database {
  /// Async SQLite connection handle
  conn: Connection,
}

impl Database {
  /// Opens an existing database or creates a new one at the specified path.
  ///
  /// Missing parent directories are created, and the schema from `migrations/init.sql` is
  /// applied.
  ///
  /// # Examples
  ///
  /// ```no_run
  /// # use examai::database::Database;
  /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
  /// let db = Database::open(Database::default_path()).await?;
  /// # Ok(())
  /// # }
  /// ```
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }
    let conn = Connection::open(path).await?;

    conn
      .call(|conn| {
        conn.execute_batch(include_str!(concat!(
          env!("CARGO_MANIFEST_DIR"),
          "/migrations/init.sql"
        )))?;
        Ok(())
      })
      .await?;

    debug!("Opened database at {}", path.display());
    Ok(Self { conn })
  }

  /// Returns the default path for the database file, `~/.examai/examai.db`.
  pub fn default_path() -> PathBuf { Config::default_dir().join("examai.db") }

  /// Inserts or replaces the record stored under `paper.url()`.
  pub async fn put_paper(&self, paper: &ProcessedPaper) -> Result<()> {
    let record = serde_json::to_string(paper)?;
    let url = paper.link.url.clone();
    let year = paper.link.year.clone();
    let number = paper.link.paper.clone();
    let kind = paper.link.kind.to_string();
    let stored_at = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO papers (url, year, paper, doc_type, record, stored_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![url, year, number, kind, record, stored_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Looks up one record by URL.
  pub async fn get_paper(&self, url: &str) -> Result<Option<ProcessedPaper>> {
    let url = url.to_string();
    let record = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached("SELECT record FROM papers WHERE url = ?1")?;
        match stmt.query_row([url], |row| row.get::<_, String>(0)) {
          Ok(record) => Ok(Some(record)),
          Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    record.map(|record| serde_json::from_str(&record)).transpose().map_err(ExamaiError::from)
  }

  /// Returns every stored record, ordered by URL.
  pub async fn all_papers(&self) -> Result<Vec<ProcessedPaper>> {
    let records = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached("SELECT record FROM papers ORDER BY url")?;
        let records = stmt
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
      })
      .await?;

    records.iter().map(|record| serde_json::from_str(record).map_err(ExamaiError::from)).collect()
  }

  /// Removes the record stored under `url`, returning whether one existed.
  pub async fn delete_paper(&self, url: &str) -> Result<bool> {
    let url = url.to_string();
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM papers WHERE url = ?1", [url])?))
      .await?;
    Ok(removed > 0)
  }

  /// Number of stored records.
  pub async fn count(&self) -> Result<usize> {
    let count = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM papers", [], |row| row.get::<_, i64>(0))?)
      })
      .await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Helper function to set up a test database
  async fn setup_test_db() -> (Database, PathBuf, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(&path).await.unwrap();
    (db, path, dir)
  }

  fn create_test_paper(url: &str, kind: PaperType) -> ProcessedPaper {
    let link = PaperLink::new("2023", "Paper 1", kind, url);
    ProcessedPaper::processed(link, vec![
      Question::from_text(1, "Describe the procedure of the study. [4 marks]"),
      Question::from_text(2, "Evaluate the study. [12 marks]"),
    ])
  }

  #[traced_test]
  #[tokio::test]
  async fn test_database_creation() {
    let (_db, path, _dir) = setup_test_db().await;

    // Check that file exists
    assert!(path.exists());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("examai.db");
    Database::open(&path).await.unwrap();
    assert!(path.exists());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_put_and_get_paper() {
    let (db, _path, _dir) = setup_test_db().await;
    let paper = create_test_paper("https://example.com/p1", PaperType::QuestionPaper);

    db.put_paper(&paper).await.unwrap();
    let retrieved = db.get_paper("https://example.com/p1").await.unwrap().expect("Paper should exist");

    assert_eq!(retrieved, paper);
    assert_eq!(db.count().await.unwrap(), 1);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_get_nonexistent_paper() {
    let (db, _path, _dir) = setup_test_db().await;
    assert!(db.get_paper("https://example.com/nothing").await.unwrap().is_none());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_put_replaces_same_url() {
    let (db, _path, _dir) = setup_test_db().await;
    let first = create_test_paper("https://example.com/p1", PaperType::QuestionPaper);
    let second = ProcessedPaper::failed(first.link.clone(), "HTTP error 500");

    db.put_paper(&first).await.unwrap();
    db.put_paper(&second).await.unwrap();

    assert_eq!(db.count().await.unwrap(), 1);
    assert_eq!(db.get_paper(first.url()).await.unwrap(), Some(second));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_all_papers_ordered_by_url() {
    let (db, _path, _dir) = setup_test_db().await;
    for url in ["https://example.com/c", "https://example.com/a", "https://example.com/b"] {
      db.put_paper(&create_test_paper(url, PaperType::MarkScheme)).await.unwrap();
    }

    let urls = db.all_papers().await.unwrap().into_iter().map(|p| p.link.url).collect::<Vec<_>>();
    assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b", "https://example.com/c"]);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_delete_paper() {
    let (db, _path, _dir) = setup_test_db().await;
    let paper = create_test_paper("https://example.com/p1", PaperType::QuestionPaper);
    db.put_paper(&paper).await.unwrap();

    assert!(db.delete_paper(paper.url()).await.unwrap());
    assert!(!db.delete_paper(paper.url()).await.unwrap());
    assert!(db.get_paper(paper.url()).await.unwrap().is_none());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_records_persist_across_reopen() {
    let (db, path, _dir) = setup_test_db().await;
    let paper = create_test_paper("https://example.com/p1", PaperType::QuestionPaper);
    db.put_paper(&paper).await.unwrap();
    drop(db);

    let db = Database::open(&path).await.unwrap();
    assert_eq!(db.get_paper(paper.url()).await.unwrap(), Some(paper));
  }
}
