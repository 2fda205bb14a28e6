//! Module for listing stored papers.

use super::*;

/// Document type accepted by `--type`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
  /// Question papers
  Question,
  /// Mark schemes
  Mark,
}

impl From<KindArg> for PaperType {
  fn from(kind: KindArg) -> Self {
    match kind {
      KindArg::Question => PaperType::QuestionPaper,
      KindArg::Mark => PaperType::MarkScheme,
    }
  }
}

/// Filters for `examai list`; both apply when both are given.
#[derive(Args, Clone)]
pub struct ListOptions {
  /// Only papers from this year
  #[arg(long)]
  pub year: Option<String>,
  /// Only question papers or only mark schemes
  #[arg(long = "type", value_enum)]
  pub kind: Option<KindArg>,
}

/// Function for the [`Commands::List`] in the CLI.
pub async fn list<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  list_options: ListOptions,
) -> Result<()> {
  let ListOptions { year, kind } = list_options;
  let storage = PaperStorage::from_config(config).await?;

  let mut papers = match (&year, kind) {
    (Some(year), _) => storage.get_papers_by_year(year).await,
    (None, Some(kind)) => storage.get_papers_by_type(kind.into()).await,
    (None, None) => storage.get_all_papers().await,
  };
  if let (Some(_), Some(kind)) = (&year, kind) {
    let kind = PaperType::from(kind);
    papers.retain(|paper| paper.link.kind == kind);
  }

  if papers.is_empty() {
    return interaction.reply(ResponseContent::Info("No papers found"));
  }
  interaction.reply(ResponseContent::Papers(&papers))?;
  interaction.reply(ResponseContent::Info(&format!("{} papers", papers.len())))
}
