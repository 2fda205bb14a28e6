use super::*;

/// Arguments for `examai get`.
#[derive(Args, Clone)]
pub struct GetOptions {
  /// URL of the stored paper
  pub url: String,
}

/// Function for the [`Commands::Get`] in the CLI.
pub async fn get<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  get_options: GetOptions,
) -> Result<()> {
  let storage = PaperStorage::from_config(config).await?;
  match storage.get_paper(&get_options.url).await {
    Some(paper) => {
      debug!("Found paper: {:?}", paper);
      interaction.reply(ResponseContent::Paper(&paper))
    },
    None => interaction.reply(ResponseContent::Warning(&format!(
      "Paper not found: {}",
      get_options.url
    ))),
  }
}
