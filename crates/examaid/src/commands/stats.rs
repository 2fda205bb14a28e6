use super::*;

/// Function for the [`Commands::Stats`] in the CLI.
pub async fn stats<I: UserInteraction>(interaction: &I, config: &Config) -> Result<()> {
  let storage = PaperStorage::from_config(config).await?;
  interaction.reply(ResponseContent::Summary(&storage.summary().await))
}
