//! The scraping pipeline: index page → paper links → processed papers.
//!
//! Papers are processed one at a time. A failure on the index page aborts the scrape, while a
//! failure on a single paper page only degrades that paper's record (see
//! [`Outcome::Failed`](crate::paper::Outcome::Failed)). Every processed paper is remembered in
//! the scraper's cache for the lifetime of the [`Scraper`].
//!
//! # Examples
//!
//! ```no_run
//! use examai::{
//!   config::Config,
//!   scrape::{ScrapeOptions, Scraper},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scraper = Scraper::from_config(&Config::default())?;
//! let options = ScrapeOptions::new().with_year("2023").with_paper("Paper 1");
//! for paper in scraper.scrape_past_papers(&options).await? {
//!   match paper.error() {
//!     Some(error) => println!("{}: failed ({error})", paper.url()),
//!     None => println!("{}: {} marks", paper.url(), paper.total_marks()),
//!   }
//! }
//! # Ok(())
//! # }
//! ```

use crate::source::DocumentSource;

use super::*;

/// Filters applied to the links found on the index page. Both filters must match when both are
/// set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeOptions {
  /// Only papers from this year, e.g. "2023"
  pub year:  Option<String>,
  /// Only this paper, e.g. "Paper 1"
  pub paper: Option<String>,
}

impl ScrapeOptions {
  /// No filtering.
  pub fn new() -> Self { Self::default() }

  /// Restricts the scrape to one year.
  pub fn with_year(mut self, year: impl Into<String>) -> Self {
    self.year = Some(year.into());
    self
  }

  /// Restricts the scrape to one paper identifier.
  pub fn with_paper(mut self, paper: impl Into<String>) -> Self {
    self.paper = Some(paper.into());
    self
  }

  /// Whether `link` passes every filter that is set.
  pub fn matches(&self, link: &PaperLink) -> bool {
    self.year.as_ref().map_or(true, |year| &link.year == year)
      && self.paper.as_ref().map_or(true, |paper| &link.paper == paper)
  }
}

/// Fetches and parses papers from one [`DocumentSource`].
pub struct Scraper {
  fetcher: Fetcher,
  source:  Box<dyn DocumentSource>,
  cache:   HashMap<String, ProcessedPaper>,
}

impl Scraper {
  /// Creates a scraper over an already built source.
  pub fn new(fetcher: Fetcher, source: Box<dyn DocumentSource>) -> Self {
    Self { fetcher, source, cache: HashMap::new() }
  }

  /// Creates a scraper from the `[scraper]` and `[source]` configuration.
  pub fn from_config(config: &Config) -> Result<Self> {
    Ok(Self::new(Fetcher::new(&config.scraper)?, config.source.build()?))
  }

  /// The source this scraper reads from.
  pub fn source(&self) -> &dyn DocumentSource { self.source.as_ref() }

  /// Scrapes the index page and processes every link that passes `options`.
  ///
  /// Records are returned in index-page order. Errors while fetching or parsing the index page
  /// are returned; errors on individual papers are recorded in the returned papers instead.
  pub async fn scrape_past_papers(
    &mut self,
    options: &ScrapeOptions,
  ) -> Result<Vec<ProcessedPaper>> {
    debug!("Scraping {} with {:?}", self.source.base_url(), options);
    let links = match self.fetch_links().await {
      Ok(links) => links,
      Err(e) => {
        error!("Error scraping past papers from {}: {}", self.source.base_url(), e);
        return Err(e);
      },
    };

    let links = links.into_iter().filter(|link| options.matches(link)).collect::<Vec<_>>();
    debug!("{} links left after filtering", links.len());

    let mut papers = Vec::with_capacity(links.len());
    for link in links {
      let paper = self.process_paper(link).await;
      self.cache.insert(paper.url().to_string(), paper.clone());
      papers.push(paper);
    }
    Ok(papers)
  }

  /// Downloads and parses the index page.
  pub async fn fetch_links(&self) -> Result<Vec<PaperLink>> {
    let html = self.source.fetch_index(&self.fetcher).await?;
    self.source.parse_links(&html)
  }

  /// Downloads one paper page and extracts its questions.
  ///
  /// Never fails: a fetch or parse error produces a record carrying the error message.
  pub async fn process_paper(&self, link: PaperLink) -> ProcessedPaper {
    let questions = match self.source.fetch_document(&self.fetcher, &link).await {
      Ok(html) => self.source.parse_document(&html),
      Err(e) => Err(e),
    };

    match questions {
      Ok(questions) => {
        debug!("Processed {} ({} questions)", link.url, questions.len());
        ProcessedPaper::processed(link, questions)
      },
      Err(e) => {
        warn!("Error processing paper {}: {}", link.url, e);
        ProcessedPaper::failed(link, e)
      },
    }
  }

  /// A paper processed earlier by this scraper.
  pub fn get_cached_paper(&self, url: &str) -> Option<&ProcessedPaper> { self.cache.get(url) }

  /// Number of cached papers.
  pub fn cached_len(&self) -> usize { self.cache.len() }

  /// Forgets every cached paper.
  pub fn clear_cache(&mut self) { self.cache.clear() }
}
