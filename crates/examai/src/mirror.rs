//! Flat JSON mirror of the paper store.
//!
//! The mirror is a single JSON object mapping each record's `url` to the record itself. It is a
//! derived copy of the database: a missing file is an empty mirror, and the file may be thrown
//! away at any time with [`Mirror::discard`].

use super::*;

/// Contents of a mirror file, keyed by URL.
pub type MirrorEntries = BTreeMap<String, ProcessedPaper>;

/// A JSON mirror file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
  path: PathBuf,
}

impl Mirror {
  /// Mirror stored at `path`. Nothing is read or created until first use.
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  /// Returns the default mirror location, `~/.examai/papers.json`.
  pub fn default_path() -> PathBuf { Config::default_dir().join("papers.json") }

  /// Location of the mirror file.
  pub fn path(&self) -> &Path { &self.path }

  /// Reads every entry. A missing file yields an empty map.
  ///
  /// # Errors
  ///
  /// Returns an error when the file exists but cannot be read or is not a valid mirror.
  pub async fn load(&self) -> Result<MirrorEntries> {
    match tokio::fs::read_to_string(&self.path).await {
      Ok(contents) => Ok(serde_json::from_str(&contents)?),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(MirrorEntries::new()),
      Err(e) => Err(e.into()),
    }
  }

  /// Replaces the mirror contents with `entries`.
  ///
  /// The file is written next to its final location and then renamed over it, so readers never
  /// see a half-written mirror.
  pub async fn save(&self, entries: &MirrorEntries) -> Result<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }
    let contents = serde_json::to_string_pretty(entries)?;
    let staging = self.path.with_extension("json.tmp");
    tokio::fs::write(&staging, contents).await?;
    tokio::fs::rename(&staging, &self.path).await?;
    trace!("Wrote {} mirror entries to {}", entries.len(), self.path.display());
    Ok(())
  }

  /// Looks up a single entry.
  pub async fn get(&self, url: &str) -> Result<Option<ProcessedPaper>> {
    Ok(self.load().await?.remove(url))
  }

  /// Adds or replaces the entry for `paper.url()`.
  pub async fn insert(&self, paper: &ProcessedPaper) -> Result<()> {
    let mut entries = self.load().await?;
    entries.insert(paper.url().to_string(), paper.clone());
    self.save(&entries).await
  }

  /// Removes the entry for `url`, returning whether one existed. The file is left untouched when
  /// there is nothing to remove.
  pub async fn remove(&self, url: &str) -> Result<bool> {
    let mut entries = self.load().await?;
    if entries.remove(url).is_none() {
      return Ok(false);
    }
    self.save(&entries).await?;
    Ok(true)
  }

  /// Deletes the mirror file. Succeeds if it is already gone.
  pub async fn discard(&self) -> Result<()> {
    match tokio::fs::remove_file(&self.path).await {
      Ok(()) => {
        warn!("Discarded mirror {}", self.path.display());
        Ok(())
      },
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn paper(url: &str) -> ProcessedPaper {
    let link = PaperLink::new("2023", "Paper 2", PaperType::MarkScheme, url);
    ProcessedPaper::processed(link, vec![Question::from_text(1, "Discuss [8 marks]")])
  }

  #[tokio::test]
  async fn test_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let mirror = Mirror::new(dir.path().join("papers.json"));
    assert!(mirror.load().await.unwrap().is_empty());
    assert_eq!(mirror.get("https://example.com/a").await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_insert_get_remove() {
    let dir = tempdir().unwrap();
    let mirror = Mirror::new(dir.path().join("nested").join("papers.json"));
    let a = paper("https://example.com/a");
    let b = paper("https://example.com/b");

    mirror.insert(&a).await.unwrap();
    mirror.insert(&b).await.unwrap();
    assert_eq!(mirror.get(a.url()).await.unwrap(), Some(a.clone()));
    assert_eq!(mirror.load().await.unwrap().len(), 2);

    assert!(mirror.remove(a.url()).await.unwrap());
    assert!(!mirror.remove(a.url()).await.unwrap());
    assert_eq!(mirror.get(a.url()).await.unwrap(), None);
    assert_eq!(mirror.get(b.url()).await.unwrap(), Some(b));
  }

  #[tokio::test]
  async fn test_file_is_a_url_keyed_object() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("papers.json");
    let mirror = Mirror::new(&path);
    mirror.insert(&paper("https://example.com/a")).await.unwrap();

    let value: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["https://example.com/a"]["type"], "Mark Scheme");
    assert_eq!(value["https://example.com/a"]["url"], "https://example.com/a");
    assert!(!dir.path().join("papers.json.tmp").exists());
  }

  #[tokio::test]
  async fn test_corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("papers.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mirror = Mirror::new(&path);
    assert!(matches!(mirror.load().await, Err(ExamaiError::Json(_))));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_discard() {
    let dir = tempdir().unwrap();
    let mirror = Mirror::new(dir.path().join("papers.json"));
    mirror.insert(&paper("https://example.com/a")).await.unwrap();

    mirror.discard().await.unwrap();
    assert!(!mirror.path().exists());
    assert!(logs_contain("Discarded mirror"));

    // already gone
    mirror.discard().await.unwrap();
  }
}
