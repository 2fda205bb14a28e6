//! Paper links, extracted questions and processed-paper records.
//!
//! A [`PaperLink`] is what the index page tells us about a document. Processing the linked page
//! turns it into a [`ProcessedPaper`], which carries either the extracted [`Question`]s or the
//! error that stopped extraction. Processed papers are the unit that gets stored.
//!
//! Records serialize to camelCase JSON:
//!
//! ```json
//! {
//!   "year": "2023",
//!   "paper": "Paper 1",
//!   "type": "Question Paper",
//!   "url": "https://example.com/past-papers/2023-paper-1-qp",
//!   "questions": [{ "number": 1, "content": "Describe ... [4 marks]", "marks": 4, "type": "description" }],
//!   "processedAt": "2024-05-01T10:00:00Z"
//! }
//! ```

use super::*;

lazy_static! {
  static ref MARKS: Regex = Regex::new(r"(?i)([0-9]+)\s+marks?").unwrap();
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Kind of document a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaperType {
  /// The examination paper itself
  #[serde(rename = "Question Paper")]
  QuestionPaper,
  /// The marking guidance for a paper
  #[serde(rename = "Mark Scheme")]
  MarkScheme,
}

impl Display for PaperType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PaperType::QuestionPaper => write!(f, "Question Paper"),
      PaperType::MarkScheme => write!(f, "Mark Scheme"),
    }
  }
}

impl FromStr for PaperType {
  type Err = ExamaiError;

  /// Parses a document-type label, ignoring case and runs of whitespace.
  ///
  /// ```
  /// use std::str::FromStr;
  ///
  /// use examai::paper::PaperType;
  ///
  /// assert_eq!(PaperType::from_str("mark   SCHEME").unwrap(), PaperType::MarkScheme);
  /// assert!(PaperType::from_str("Examiner Report").is_err());
  /// ```
  fn from_str(s: &str) -> Result<Self> {
    match normalize_whitespace(s).to_lowercase().as_str() {
      "question paper" => Ok(PaperType::QuestionPaper),
      "mark scheme" => Ok(PaperType::MarkScheme),
      _ => Err(ExamaiError::InvalidPaperType(s.to_string())),
    }
  }
}

/// Keyword-based classification of a question's command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
  /// Contains "evaluate"
  Evaluation,
  /// Contains "discuss"
  Discussion,
  /// Contains "explain"
  Explanation,
  /// Contains "describe"
  Description,
  /// None of the keywords matched
  Other,
}

impl QuestionType {
  /// Classifies question text by the first keyword found, checked in the order
  /// evaluate, discuss, explain, describe. Matching is case-insensitive and works on substrings,
  /// so "Evaluation of ..." counts as evaluate.
  ///
  /// ```
  /// use examai::paper::QuestionType;
  ///
  /// assert_eq!(QuestionType::classify("Evaluate the following study."), QuestionType::Evaluation);
  /// assert_eq!(QuestionType::classify("Outline one weakness."), QuestionType::Other);
  /// ```
  pub fn classify(content: &str) -> Self {
    let content = content.to_lowercase();
    [
      ("evaluate", QuestionType::Evaluation),
      ("discuss", QuestionType::Discussion),
      ("explain", QuestionType::Explanation),
      ("describe", QuestionType::Description),
    ]
    .into_iter()
    .find(|(keyword, _)| content.contains(keyword))
    .map_or(QuestionType::Other, |(_, kind)| kind)
  }
}

impl Display for QuestionType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      QuestionType::Evaluation => "evaluation",
      QuestionType::Discussion => "discussion",
      QuestionType::Explanation => "explanation",
      QuestionType::Description => "description",
      QuestionType::Other => "other",
    };
    write!(f, "{name}")
  }
}

/// Reference to a document discovered on the index page.
///
/// The `url` is the natural key: two links with the same `url` describe the same stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperLink {
  /// Four-digit examination year, e.g. "2023"
  pub year:  String,
  /// Paper identifier, e.g. "Paper 1"
  pub paper: String,
  /// Question paper or mark scheme
  #[serde(rename = "type")]
  pub kind:  PaperType,
  /// Absolute URL of the document page
  pub url:   String,
}

impl PaperLink {
  /// Creates a link, collapsing whitespace inside the paper identifier.
  pub fn new(
    year: impl Into<String>,
    paper: &str,
    kind: PaperType,
    url: impl Into<String>,
  ) -> Self {
    Self { year: year.into(), paper: normalize_whitespace(paper), kind, url: url.into() }
  }
}

/// A single question extracted from a paper page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  /// 1-based position within the paper
  pub number:  u32,
  /// Trimmed visible text of the question
  pub content: String,
  /// Marks available, 0 when the text does not say
  pub marks:   u32,
  /// Command-word classification
  #[serde(rename = "type")]
  pub kind:    QuestionType,
}

impl Question {
  /// Builds a question from its position and raw text, deriving marks and type from the text.
  pub fn from_text(number: u32, text: &str) -> Self {
    let content = text.trim().to_string();
    Self { number, marks: extract_marks(&content), kind: QuestionType::classify(&content), content }
  }
}

/// What happened when a paper page was processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
  /// The page was fetched and parsed.
  #[serde(rename_all = "camelCase")]
  Processed {
    /// Extracted questions in page order (possibly empty)
    questions:    Vec<Question>,
    /// When processing finished
    processed_at: DateTime<Utc>,
  },
  /// Fetching or parsing failed; the message is kept instead of any questions.
  Failed {
    /// Human readable failure message
    error: String,
  },
}

/// A [`PaperLink`] together with the outcome of processing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedPaper {
  /// The link this record was produced from
  #[serde(flatten)]
  pub link:    PaperLink,
  /// Extracted questions or the processing error
  #[serde(flatten)]
  pub outcome: Outcome,
}

impl ProcessedPaper {
  /// Record for a successfully processed page, stamped with the current time.
  pub fn processed(link: PaperLink, questions: Vec<Question>) -> Self {
    Self { link, outcome: Outcome::Processed { questions, processed_at: Utc::now() } }
  }

  /// Degraded record for a page that could not be fetched or parsed.
  pub fn failed(link: PaperLink, error: impl Display) -> Self {
    Self { link, outcome: Outcome::Failed { error: error.to_string() } }
  }

  /// The record's key.
  pub fn url(&self) -> &str { &self.link.url }

  /// Extracted questions, or `None` for a failed record.
  pub fn questions(&self) -> Option<&[Question]> {
    match &self.outcome {
      Outcome::Processed { questions, .. } => Some(questions),
      Outcome::Failed { .. } => None,
    }
  }

  /// The processing error, if any.
  pub fn error(&self) -> Option<&str> {
    match &self.outcome {
      Outcome::Failed { error } => Some(error),
      Outcome::Processed { .. } => None,
    }
  }

  /// Whether processing failed.
  pub fn is_failed(&self) -> bool { matches!(self.outcome, Outcome::Failed { .. }) }

  /// Sum of the marks of every extracted question.
  pub fn total_marks(&self) -> u32 {
    self.questions().map_or(0, |questions| questions.iter().map(|q| q.marks).sum())
  }
}

/// Returns the first integer followed by "mark" or "marks" in `content`, or 0. Counts too large
/// for a `u32` saturate at `u32::MAX`.
///
/// ```
/// use examai::paper::extract_marks;
///
/// assert_eq!(extract_marks("This question is worth 12 marks"), 12);
/// assert_eq!(extract_marks("Outline the study."), 0);
/// ```
pub fn extract_marks(content: &str) -> u32 {
  // the group is all ASCII digits, so parsing only fails on overflow
  MARKS.captures(content).map(|cap| cap[1].parse().unwrap_or(u32::MAX)).unwrap_or(0)
}

/// Trims and collapses every run of whitespace into a single space.
pub(crate) fn normalize_whitespace(s: &str) -> String {
  WHITESPACE.replace_all(s.trim(), " ").into_owned()
}
