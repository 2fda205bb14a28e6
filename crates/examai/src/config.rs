//! TOML configuration for scraping and storage.
//!
//! Every field has a default, and a configuration file only needs the fields it changes:
//!
//! ```toml
//! database_path = "/home/me/.examai/examai.db"
//!
//! [scraper.rate_limit]
//! requests_per_minute = 20
//!
//! [source]
//! type = "html"
//! base_url = "https://www.aqa.org.uk/subjects/psychology/as-and-a-level/psychology-7181-7182"
//! ```
//!
//! See `config/default.toml` in this crate for the full set of options.

use super::*;
use crate::{rate_limit::RateLimitConfig, source::SourceConfig};

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "ExamAI/1.0 (Educational Tool)";

/// Default accept header sent with every request.
pub const DEFAULT_ACCEPT: &str =
  "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Location of the SQLite database
  pub database_path: PathBuf,
  /// Location of the flat JSON mirror
  pub mirror_path:   PathBuf,
  /// HTTP behaviour shared by every source
  pub scraper:       ScraperConfig,
  /// Where papers are discovered and how pages are parsed
  pub source:        SourceConfig,
}

impl Default for Config {
  fn default() -> Self {
    let dir = Self::default_dir();
    Self {
      database_path: dir.join("examai.db"),
      mirror_path:   dir.join("papers.json"),
      scraper:       ScraperConfig::default(),
      source:        SourceConfig::default(),
    }
  }
}

/// HTTP settings applied to every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
  /// Header name → value, sent with every request
  pub headers:    BTreeMap<String, String>,
  /// Outbound pacing
  pub rate_limit: RateLimitConfig,
  /// Retry behaviour for failed requests
  pub retry:      RetryPolicy,
}

impl Default for ScraperConfig {
  fn default() -> Self {
    let headers = BTreeMap::from([
      ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
      ("Accept".to_string(), DEFAULT_ACCEPT.to_string()),
    ]);
    Self { headers, rate_limit: RateLimitConfig::default(), retry: RetryPolicy::default() }
  }
}

/// How often and how patiently a failed request is retried.
///
/// The wait before retry `n` (1-based) is `backoff_ms * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
  /// Total number of attempts, including the first
  pub attempts:   u32,
  /// Base backoff in milliseconds
  pub backoff_ms: u64,
}

impl Default for RetryPolicy {
  fn default() -> Self { Self { attempts: 3, backoff_ms: 1000 } }
}

impl RetryPolicy {
  /// Delay to wait after failed attempt number `attempt` (1-based).
  pub fn backoff(&self, attempt: u32) -> Duration {
    Duration::from_millis(self.backoff_ms.saturating_mul(u64::from(attempt)))
  }
}

impl Config {
  /// Returns the default directory for examai state: `~/.examai`, or `./.examai` when no home
  /// directory can be found.
  pub fn default_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".examai")
  }

  /// Returns the default configuration file location, `~/.examai/config.toml`.
  pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
      .ok_or_else(|| ExamaiError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".examai").join("config.toml"))
  }

  /// Reads a configuration file, filling every omitted field with its default.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Self::from_toml(&content)
  }

  /// Parses a configuration from a TOML string.
  pub fn from_toml(content: &str) -> Result<Self> { Ok(toml::from_str(content)?) }

  /// Writes this configuration as TOML, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    debug!("Saved configuration to {}", path.display());
    Ok(())
  }

  /// Sets the database location.
  pub fn with_database_path(mut self, path: impl AsRef<Path>) -> Self {
    self.database_path = path.as_ref().to_path_buf();
    self
  }

  /// Sets the mirror location.
  pub fn with_mirror_path(mut self, path: impl AsRef<Path>) -> Self {
    self.mirror_path = path.as_ref().to_path_buf();
    self
  }

  /// Replaces the HTTP settings.
  pub fn with_scraper(mut self, scraper: ScraperConfig) -> Self {
    self.scraper = scraper;
    self
  }

  /// Replaces the document source.
  pub fn with_source(mut self, source: SourceConfig) -> Self {
    self.source = source;
    self
  }
}
