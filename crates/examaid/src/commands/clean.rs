//! Module for removing the examai database and mirror.

use super::*;

/// Every existing file that belongs to the stores: the database, its SQLite side files
/// (`-wal`, `-shm`, `-journal`) and the mirror.
fn data_files(config: &Config) -> Result<Vec<PathBuf>> {
  let mut files = vec![config.database_path.clone()];
  let side_files =
    format!("{}-*", glob::Pattern::escape(&config.database_path.display().to_string()));
  files.extend(glob::glob(&side_files)?.flatten());
  files.push(config.mirror_path.clone());
  files.retain(|path| path.is_file());
  Ok(files)
}

/// Function for the [`Commands::Clean`] in the CLI.
pub async fn clean<I: UserInteraction>(interaction: &I, config: &Config) -> Result<()> {
  let files = data_files(config)?;
  if files.is_empty() {
    return interaction.reply(ResponseContent::Info("Nothing to clean"));
  }

  for file in &files {
    interaction.reply(ResponseContent::Warning(&format!("Found {}", file.display())))?;
  }
  if !interaction.confirm("Are you sure you want to delete these files?")?
    || !interaction.confirm_typed("Confirm deletion", "DELETE")?
  {
    return interaction.reply(ResponseContent::Info("Operation cancelled"));
  }

  for file in &files {
    trace!("Removing {}", file.display());
    std::fs::remove_file(file)?;
  }
  interaction.reply(ResponseContent::Success("Database and mirror files cleaned"))
}
