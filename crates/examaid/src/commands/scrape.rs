//! Module for running a scrape from the command line.

use super::*;

/// Filters and flags for `examai scrape`.
#[derive(Args, Clone)]
pub struct ScrapeArgs {
  /// Only scrape papers from this year, e.g. 2023
  #[arg(long)]
  pub year:     Option<String>,
  /// Only scrape this paper, e.g. "Paper 1"
  #[arg(long)]
  pub paper:    Option<String>,
  /// Print the results without storing them
  #[arg(long)]
  pub no_store: bool,
}

/// Function for the [`Commands::Scrape`] in the CLI.
pub async fn scrape<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  scrape_args: ScrapeArgs,
) -> Result<()> {
  let ScrapeArgs { year, paper, no_store } = scrape_args;
  let mut options = ScrapeOptions::new();
  if let Some(year) = year {
    options = options.with_year(year);
  }
  if let Some(paper) = paper {
    options = options.with_paper(paper);
  }

  let mut scraper = Scraper::from_config(config)?;
  interaction.reply(ResponseContent::Working(&format!(
    "Scraping {}",
    scraper.source().base_url()
  )))?;
  let papers = scraper.scrape_past_papers(&options).await?;

  if papers.is_empty() {
    return interaction.reply(ResponseContent::Info("No papers matched"));
  }
  interaction.reply(ResponseContent::Papers(&papers))?;

  let failed = papers.iter().filter(|paper| paper.is_failed()).count();
  if failed > 0 {
    interaction.reply(ResponseContent::Warning(&format!(
      "{failed} of {} papers could not be processed",
      papers.len()
    )))?;
  }

  if no_store {
    return interaction.reply(ResponseContent::Info("Nothing stored (--no-store)"));
  }

  let storage = PaperStorage::from_config(config).await?;
  for paper in &papers {
    storage.store_paper(paper).await?;
  }
  debug!("Stored {} papers in {}", papers.len(), config.database_path.display());
  interaction.reply(ResponseContent::Success(&format!("Stored {} papers", papers.len())))
}
