//! Document sources: where papers are listed and how their pages are read.
//!
//! A [`DocumentSource`] knows four things:
//!
//! - how to fetch its index page,
//! - how to turn the index page into [`PaperLink`]s,
//! - how to fetch a single document page,
//! - how to turn a document page into [`Question`]s.
//!
//! Fetching goes through the shared [`Fetcher`] by default, so every source is paced by the same
//! rate limiter and retry policy. Sources are chosen by the `[source]` table of the configuration
//! file through [`SourceConfig`], rather than by branching in the scraper.
//!
//! # Examples
//!
//! ```toml
//! [source]
//! type = "html"
//! base_url = "https://www.aqa.org.uk/subjects/psychology/as-and-a-level/psychology-7181-7182"
//! link_selector = 'a[href*="/past-papers"]'
//! title_pattern = '(\d{4})\s+(Paper\s+\d)\s+(Question\s+Paper|Mark\s+Scheme)'
//! question_selector = ".question-content"
//! ```

use super::*;

pub mod html;

pub use self::html::{HtmlSource, HtmlSourceConfig};

/// Capability interface for a site that publishes past papers.
#[async_trait]
pub trait DocumentSource: Send + Sync {
  /// URL of the page listing every document.
  fn base_url(&self) -> &str;

  /// Downloads the index page.
  async fn fetch_index(&self, fetcher: &Fetcher) -> Result<String> {
    fetcher.fetch(self.base_url()).await
  }

  /// Extracts paper links from the index page, in document order.
  fn parse_links(&self, html: &str) -> Result<Vec<PaperLink>>;

  /// Downloads the page behind a single link.
  async fn fetch_document(&self, fetcher: &Fetcher, link: &PaperLink) -> Result<String> {
    fetcher.fetch(&link.url).await
  }

  /// Extracts the questions from a document page.
  fn parse_document(&self, html: &str) -> Result<Vec<Question>>;
}

/// Source selection, tagged by `type` in the configuration file. A table without `type` is read
/// as an `html` source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SourceConfig {
  /// Server-rendered HTML pages scraped with CSS selectors
  #[serde(rename = "html")]
  Html(HtmlSourceConfig),
}

impl<'de> Deserialize<'de> for SourceConfig {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where D: serde::Deserializer<'de> {
    #[derive(Deserialize)]
    enum Kind {
      #[serde(rename = "html")]
      Html,
    }

    #[derive(Deserialize)]
    struct Tagged {
      #[serde(rename = "type", default)]
      kind:   Option<Kind>,
      #[serde(flatten)]
      fields: HtmlSourceConfig,
    }

    let tagged = Tagged::deserialize(deserializer)?;
    match tagged.kind.unwrap_or(Kind::Html) {
      Kind::Html => Ok(SourceConfig::Html(tagged.fields)),
    }
  }
}

impl Default for SourceConfig {
  fn default() -> Self { SourceConfig::Html(HtmlSourceConfig::default()) }
}

impl SourceConfig {
  /// Builds the configured source, validating its selectors and patterns.
  pub fn build(&self) -> Result<Box<dyn DocumentSource>> {
    match self {
      SourceConfig::Html(config) => Ok(Box::new(HtmlSource::new(config.clone())?)),
    }
  }

  /// The configured index page URL.
  pub fn base_url(&self) -> &str {
    match self {
      SourceConfig::Html(config) => &config.base_url,
    }
  }

  /// Returns a copy pointing at a different index page.
  pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
    match self {
      SourceConfig::Html(config) =>
        SourceConfig::Html(HtmlSourceConfig { base_url: base_url.into(), ..config }),
    }
  }
}
