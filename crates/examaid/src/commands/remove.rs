use super::*;

/// Arguments for `examai remove`.
#[derive(Args, Clone)]
pub struct RemoveOptions {
  /// URL of the stored paper
  pub url: String,
}

/// Function for the [`Commands::Remove`] in the CLI.
pub async fn remove<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  remove_options: RemoveOptions,
) -> Result<()> {
  let RemoveOptions { url } = remove_options;
  let storage = PaperStorage::from_config(config).await?;

  let Some(paper) = storage.get_paper(&url).await else {
    return interaction.reply(ResponseContent::Warning(&format!("Paper not found: {url}")));
  };
  interaction.reply(ResponseContent::Paper(&paper))?;

  if !interaction.confirm("Remove this paper?")? {
    return interaction.reply(ResponseContent::Info("Operation cancelled"));
  }
  storage.delete_paper(&url).await?;
  interaction.reply(ResponseContent::Success(&format!("Removed {url}")))
}
