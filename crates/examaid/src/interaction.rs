//! Terminal prompts and output formatting.

use chrono::Local;
use dialoguer::{Confirm, Input};

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for progress messages
pub static WORKING_PREFIX: &str = "» ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Prefix for a list item
pub static ITEM_PREFIX: &str = "├─";
/// Prefix for the last item of a list
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Continuation line under a list item
pub static CONTINUE_PREFIX: &str = "│  ";

/// Something a command wants to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// One record with its questions
  Paper(&'a ProcessedPaper),
  /// A one-line-per-record listing
  Papers(&'a [ProcessedPaper]),
  /// Storage totals
  Summary(&'a StorageSummary),
  /// A step that is about to run
  Working(&'a str),
  /// A finished operation
  Success(&'a str),
  /// Something the user should know about
  Warning(&'a str),
  /// A failure
  Error(&'a str),
  /// Neutral information
  Info(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Asks the user to type `expected` back, returning whether they did.
  fn confirm_typed(&self, message: &str, expected: &str) -> Result<bool>;
  /// Shows `content`.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Interactive terminal backed by dialoguer and console.
pub struct Terminal {
  /// Answer every prompt with yes instead of asking
  accept_defaults: bool,
}

impl Terminal {
  /// Creates a terminal, optionally answering every prompt automatically.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).yellow(), message))
        .default(false)
        .wait_for_newline(true)
        .interact()?,
    )
  }

  fn confirm_typed(&self, message: &str, expected: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    let input = Input::<String>::new()
      .with_prompt(format!(
        "{}{} (type {})",
        style(PROMPT_PREFIX).red(),
        message,
        style(expected).red().bold()
      ))
      .interact_text()?;
    Ok(input.trim() == expected)
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Paper(paper) => print_paper(paper),
      ResponseContent::Papers(papers) => print_papers(papers),
      ResponseContent::Summary(summary) => print_summary(summary),
      ResponseContent::Working(message) => println!("{}{}", style(WORKING_PREFIX).cyan(), message),
      ResponseContent::Success(message) =>
        println!("{}{}", style(SUCCESS_PREFIX).green(), style(message).green()),
      ResponseContent::Warning(message) =>
        println!("{}{}", style(WARNING_PREFIX).yellow(), style(message).yellow()),
      ResponseContent::Error(message) =>
        eprintln!("{}{}", style(ERROR_PREFIX).red(), style(message).red()),
      ResponseContent::Info(message) => println!("{}{}", style(INFO_PREFIX).blue(), message),
    }
    Ok(())
  }
}

/// `2023 Paper 1 Mark Scheme`
fn title(paper: &ProcessedPaper) -> String {
  format!("{} {} {}", paper.link.year, paper.link.paper, paper.link.kind)
}

fn print_paper(paper: &ProcessedPaper) {
  println!("{}", style(title(paper)).bold());
  println!("{}{}", CONTINUE_PREFIX, style(paper.url()).blue().underlined());

  match &paper.outcome {
    Outcome::Failed { error } => {
      println!("{}{}", style(ERROR_PREFIX).red(), style(format!("Processing failed: {error}")).red())
    },
    Outcome::Processed { questions, processed_at } => {
      println!(
        "{}Processed {} ({} questions, {} marks)",
        CONTINUE_PREFIX,
        processed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        questions.len(),
        paper.total_marks()
      );
      for (i, question) in questions.iter().enumerate() {
        let prefix = if i + 1 == questions.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
        println!(
          "{} {} {} {}",
          prefix,
          style(format!("Q{}", question.number)).cyan(),
          style(format!("[{} marks, {}]", question.marks, question.kind)).dim(),
          question.content
        );
      }
    },
  }
}

fn print_papers(papers: &[ProcessedPaper]) {
  for (i, paper) in papers.iter().enumerate() {
    let prefix = if i + 1 == papers.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
    let detail = match paper.questions() {
      Some(questions) => style(format!("{} questions", questions.len())).green(),
      None => style("failed".to_string()).red(),
    };
    println!("{} {} ({}) {}", prefix, style(title(paper)).bold(), detail, style(paper.url()).dim());
  }
}

fn print_summary(summary: &StorageSummary) {
  println!("{} {}", style("Total records:").bold(), summary.total);
  println!("{} {}", style(format!("{}:", PaperType::QuestionPaper)).bold(), summary.question_papers);
  println!("{} {}", style(format!("{}:", PaperType::MarkScheme)).bold(), summary.mark_schemes);
  println!("{} {}", style("Failed:").bold(), summary.failed);
  if !summary.by_year.is_empty() {
    println!("{}", style("By year:").bold());
    let last = summary.by_year.len() - 1;
    for (i, (year, count)) in summary.by_year.iter().enumerate() {
      let prefix = if i == last { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
      println!("{prefix} {year}: {count}");
    }
  }
}
