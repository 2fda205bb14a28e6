//! HTML source driven by CSS selectors and a link-title pattern.

use scraper::{Html, Selector};
use url::Url;

use super::*;

/// Default index page: AQA AS and A-level Psychology (7181, 7182).
pub const DEFAULT_BASE_URL: &str =
  "https://www.aqa.org.uk/subjects/psychology/as-and-a-level/psychology-7181-7182";

/// Default selector for candidate paper links.
pub const DEFAULT_LINK_SELECTOR: &str = r#"a[href*="/past-papers"]"#;

/// Default link-title pattern: year, paper identifier and document type.
pub const DEFAULT_TITLE_PATTERN: &str =
  r"(\d{4})\s+(Paper\s+\d)\s+(Question\s+Paper|Mark\s+Scheme)";

/// Default selector for question blocks on a document page.
pub const DEFAULT_QUESTION_SELECTOR: &str = ".question-content";

/// Settings for [`HtmlSource`], as written in the configuration file.
///
/// `title_pattern` is matched case-insensitively against the trimmed link text and must have
/// three capture groups: year, paper identifier, document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlSourceConfig {
  /// Index page URL; relative links are resolved against it
  pub base_url:          String,
  /// CSS selector for candidate links on the index page
  pub link_selector:     String,
  /// Regular expression applied to each candidate link's text
  pub title_pattern:     String,
  /// CSS selector for question blocks on a document page
  pub question_selector: String,
}

impl Default for HtmlSourceConfig {
  fn default() -> Self {
    Self {
      base_url:          DEFAULT_BASE_URL.to_string(),
      link_selector:     DEFAULT_LINK_SELECTOR.to_string(),
      title_pattern:     DEFAULT_TITLE_PATTERN.to_string(),
      question_selector: DEFAULT_QUESTION_SELECTOR.to_string(),
    }
  }
}

/// A [`DocumentSource`] over server-rendered HTML.
#[derive(Debug, Clone)]
pub struct HtmlSource {
  base_url:          Url,
  raw_base_url:      String,
  link_selector:     Selector,
  title_pattern:     Regex,
  question_selector: Selector,
}

impl HtmlSource {
  /// Compiles the selectors and pattern of `config`.
  ///
  /// # Errors
  ///
  /// Returns an error if the base URL is not absolute, a selector does not parse, or the title
  /// pattern is invalid or has fewer than three capture groups.
  pub fn new(config: HtmlSourceConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)?;
    let title_pattern =
      regex::RegexBuilder::new(&config.title_pattern).case_insensitive(true).build()?;
    // group 0 is the whole match
    if title_pattern.captures_len() < 4 {
      return Err(ExamaiError::Config(format!(
        "title_pattern needs capture groups for year, paper and type: {}",
        config.title_pattern
      )));
    }

    Ok(Self {
      base_url,
      raw_base_url: config.base_url,
      link_selector: parse_selector(&config.link_selector)?,
      title_pattern,
      question_selector: parse_selector(&config.question_selector)?,
    })
  }

  /// Interprets one link's text, returning `None` when it does not describe a paper.
  fn link_from_title(&self, title: &str, url: Url) -> Option<PaperLink> {
    let captures = self.title_pattern.captures(title)?;
    let (Some(year), Some(paper), Some(kind)) = (captures.get(1), captures.get(2), captures.get(3))
    else {
      warn!("Link \"{}\" matched the title pattern without a year, paper and type", title);
      return None;
    };
    let kind = match PaperType::from_str(kind.as_str()) {
      Ok(kind) => kind,
      Err(e) => {
        warn!("Link \"{}\" matched the title pattern but: {}", title, e);
        return None;
      },
    };
    Some(PaperLink::new(year.as_str(), paper.as_str(), kind, url))
  }
}

#[async_trait]
impl DocumentSource for HtmlSource {
  fn base_url(&self) -> &str { &self.raw_base_url }

  fn parse_links(&self, html: &str) -> Result<Vec<PaperLink>> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for element in document.select(&self.link_selector) {
      let Some(href) = element.value().attr("href") else { continue };
      let title = element.text().collect::<String>();
      let title = title.trim();

      let url = match self.base_url.join(href) {
        Ok(url) => url,
        Err(e) => {
          warn!("Skipping link \"{}\" with unusable href {:?}: {}", title, href, e);
          continue;
        },
      };

      match self.link_from_title(title, url) {
        Some(link) => links.push(link),
        None => trace!("Discarding link \"{}\"", title),
      }
    }

    debug!("Found {} paper links", links.len());
    Ok(links)
  }

  fn parse_document(&self, html: &str) -> Result<Vec<Question>> {
    let document = Html::parse_document(html);
    let questions = (1..)
      .zip(document.select(&self.question_selector))
      .map(|(number, element)| Question::from_text(number, &element.text().collect::<String>()))
      .collect::<Vec<_>>();

    trace!("Extracted {} questions", questions.len());
    Ok(questions)
  }
}

fn parse_selector(selector: &str) -> Result<Selector> {
  Selector::parse(selector).map_err(|e| ExamaiError::Selector(format!("{selector}: {e}")))
}
