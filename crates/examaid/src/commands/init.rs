//! Module for setting up an examai configuration and its stores.

use super::*;

/// Options for `examai init`.
#[derive(Args, Clone)]
pub struct InitOptions {
  /// Where to keep the SQLite database
  #[arg(long)]
  pub database_path: Option<PathBuf>,
  /// Where to keep the JSON mirror
  #[arg(long)]
  pub mirror_path:   Option<PathBuf>,
  /// Index page to scrape instead of the default
  #[arg(long)]
  pub base_url:      Option<String>,
}

/// Function for the [`Commands::Init`] in the CLI.
pub async fn init<I: UserInteraction>(
  interaction: &I,
  config_path: &Path,
  init_options: InitOptions,
) -> Result<()> {
  let InitOptions { database_path, mirror_path, base_url } = init_options;

  if config_path.exists()
    && !interaction.confirm(&format!(
      "A configuration already exists at {}, do you want to overwrite it?",
      config_path.display()
    ))?
  {
    interaction.reply(ResponseContent::Info("Keeping the existing configuration"))?;
    return Ok(());
  }

  let mut config = Config::default();
  if let Some(path) = database_path {
    config = config.with_database_path(path);
  }
  if let Some(path) = mirror_path {
    config = config.with_mirror_path(path);
  }
  if let Some(url) = base_url {
    let source = config.source.clone().with_base_url(url);
    config = config.with_source(source);
  }

  // reject a bad base URL before anything is written
  config.source.build()?;
  config.save(config_path)?;
  PaperStorage::from_config(&config).await?;

  interaction.reply(ResponseContent::Success(&format!(
    "Created examai configuration\n  Config path: {}\n  Database path: {}\n  Mirror path: {}",
    config_path.display(),
    config.database_path.display(),
    config.mirror_path.display(),
  )))
}
